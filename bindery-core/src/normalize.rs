//! Merging chapter inputs with fetched content

use crate::error::AssemblyError;
use crate::types::{Chapter, ChapterInput};

/// Build the ordered chapter list
///
/// `fetched[i]` holds the extracted markup for `inputs[i]` when that chapter
/// was supplied by URL. Inline HTML is used verbatim and wins over anything
/// fetched. Order is preserved exactly.
pub fn normalize(
    inputs: Vec<ChapterInput>,
    fetched: Vec<Option<String>>,
) -> Result<Vec<Chapter>, AssemblyError> {
    let mut fetched = fetched.into_iter();

    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let fetched = fetched.next().flatten();
            let content = input
                .html
                .or(fetched)
                .ok_or(AssemblyError::UnresolvedChapter(index + 1))?;
            Ok(Chapter::new(input.title, content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_sources_keep_order() {
        let inputs = vec![
            ChapterInput::html("one", "<p>inline</p>"),
            ChapterInput::url("two", "https://example.com/two"),
            ChapterInput::html("three", "<p>also inline</p>"),
        ];
        let fetched = vec![None, Some("<p>fetched</p>".to_string()), None];

        let chapters = normalize(inputs, fetched).unwrap();
        assert_eq!(
            chapters,
            vec![
                Chapter::new("one", "<p>inline</p>"),
                Chapter::new("two", "<p>fetched</p>"),
                Chapter::new("three", "<p>also inline</p>"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let inputs = vec![ChapterInput::html("same", "x"), ChapterInput::html("same", "x")];
        let chapters = normalize(inputs, vec![None, None]).unwrap();
        assert_eq!(chapters.len(), 2);
    }

    #[test]
    fn test_missing_content_is_reported() {
        let inputs = vec![
            ChapterInput::html("one", "x"),
            ChapterInput::url("two", "https://example.com/two"),
        ];
        let err = normalize(inputs, vec![None]).unwrap_err();
        assert!(matches!(err, AssemblyError::UnresolvedChapter(2)));
    }
}
