//! Request body extraction for the generate endpoints
//!
//! Bodies arrive either as JSON or as a urlencoded form. Forms cannot nest,
//! so their `chapters` and `chapter_html` fields carry JSON-encoded arrays.

use axum::extract::{FromRequest, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{async_trait, Form, Json};
use bindery_core::{ChapterInput, GenerateBody};
use serde::Deserialize;

/// A generate request body in either accepted encoding
#[derive(Debug)]
pub struct BookBody(pub GenerateBody);

/// Flat form shape
#[derive(Debug, Deserialize)]
struct FormBody {
    title: String,
    author: String,
    title_image_url: Option<String>,
    chapters: Option<String>,
    chapter_html: Option<String>,
}

impl TryFrom<FormBody> for GenerateBody {
    type Error = String;

    fn try_from(form: FormBody) -> Result<Self, Self::Error> {
        let chapters = form
            .chapters
            .map(|raw| serde_json::from_str::<Vec<ChapterInput>>(&raw))
            .transpose()
            .map_err(|e| format!("chapters must be a JSON array: {e}"))?;
        let chapter_html = form
            .chapter_html
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|e| format!("chapter_html must be a JSON array: {e}"))?;

        Ok(GenerateBody {
            title: form.title,
            author: form.author,
            title_image_url: form.title_image_url.filter(|url| !url.is_empty()),
            chapters,
            chapter_html,
        })
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for BookBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(form) = Form::<FormBody>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let body = GenerateBody::try_from(form)
                .map_err(|message| (StatusCode::BAD_REQUEST, message).into_response())?;
            Ok(BookBody(body))
        } else {
            let Json(body) = Json::<GenerateBody>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(BookBody(body))
        }
    }
}
