//! Chapter type representing a single resolved chapter of a book

use serde::{Deserialize, Serialize};

/// A chapter whose content has been resolved to HTML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter title
    pub title: String,

    /// Chapter markup, embedded verbatim in the package
    pub content: String,
}

impl Chapter {
    /// Create a new chapter
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
