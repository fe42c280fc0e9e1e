//! Book generation handlers

use crate::error::ApiError;
use crate::extract::BookBody;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bindery_core::{BookFormat, BookRequest, GeneratedBook};

/// Longest title kept in the download filename
const MAX_FILENAME_LEN: usize = 100;

/// Generate an EPUB book
pub async fn generate_epub(
    State(state): State<AppState>,
    BookBody(body): BookBody,
) -> Result<Response, ApiError> {
    generate(state, body, BookFormat::Epub).await
}

/// Generate a MOBI book
pub async fn generate_mobi(
    State(state): State<AppState>,
    BookBody(body): BookBody,
) -> Result<Response, ApiError> {
    generate(state, body, BookFormat::Mobi).await
}

async fn generate(
    state: AppState,
    body: bindery_core::GenerateBody,
    format: BookFormat,
) -> Result<Response, ApiError> {
    let request = BookRequest::try_from(body)?;
    let book = state.generator.generate(request, format).await?;
    Ok(book_response(book))
}

/// Sanitize a title for the Content-Disposition header
fn sanitize_filename(name: &str, max_len: usize) -> String {
    let cleaned: String = name
        .chars()
        .take(max_len)
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_' || *c == '.')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "book".to_string()
    } else {
        cleaned.to_string()
    }
}

fn book_response(book: GeneratedBook) -> Response {
    let stem = book
        .filename
        .strip_suffix(&format!(".{}", book.format.extension()))
        .unwrap_or(&book.filename);
    let filename = format!(
        "{}.{}",
        sanitize_filename(stem, MAX_FILENAME_LEN),
        book.format.extension()
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, book.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        book.bytes,
    )
        .into_response()
}
