//! Bindery Core Library
//!
//! Turns a title, an author, an optional cover image and an ordered list of
//! chapters into an EPUB package, and optionally into MOBI through an external
//! converter. Chapters are supplied either as inline HTML or as URLs that are
//! run through a content-extraction service.

pub mod artifact;
pub mod assemble;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod ids;
pub mod inspect;
pub mod normalize;
pub mod pipeline;
pub mod types;
pub mod validate;

pub use assemble::Assembler;
pub use config::PipelineConfig;
pub use convert::{ConverterExit, ConverterRunner, MobiConverter, ProcessRunner};
pub use error::{
    AssemblyError, BinderyError, ConfigError, ConversionError, FetchError, InspectError, Result,
    ValidationError,
};
pub use fetch::{ContentSource, FetcherConfig, HttpFetcher};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use pipeline::BookGenerator;
pub use types::{
    BookContent, BookFormat, BookRequest, Chapter, ChapterInput, CoverImage, CoverSource,
    GenerateBody, GeneratedBook,
};
