//! Core types for book requests and resolved books

mod book;
mod chapter;
mod format;
mod request;

pub use book::{sniff_media_type, BookContent, CoverImage};
pub use chapter::Chapter;
pub use format::{BookFormat, GeneratedBook};
pub use request::{BookRequest, ChapterInput, CoverSource, GenerateBody};
