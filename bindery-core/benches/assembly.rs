//! Assembly benchmarks

use bindery_core::types::{BookContent, Chapter};
use bindery_core::{Assembler, RandomIds};
use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn book_with(chapters: usize) -> BookContent {
    let mut book = BookContent::new("Benchmark", "Criterion");
    let paragraph = "<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit.</p>\n".repeat(50);
    for i in 1..=chapters {
        book.add_chapter(Chapter::new(format!("Chapter {i}"), paragraph.clone()));
    }
    book
}

fn assembly_benchmark(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("work dir");
    let assembler = Assembler::new(dir.path(), Arc::new(RandomIds));

    for chapters in [1, 25, 100] {
        let book = book_with(chapters);
        c.bench_function(&format!("assemble_{chapters}_chapters"), |b| {
            b.iter(|| {
                let artifact = assembler.assemble(&book).expect("assemble");
                std::hint::black_box(artifact.len())
            })
        });
    }
}

criterion_group!(benches, assembly_benchmark);
criterion_main!(benches);
