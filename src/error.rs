use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use once_cell::sync::OnceCell;
use tera::Context;
use thiserror::Error;

use crate::views;

/// Whether error pages include the underlying error detail. Set once at
/// startup; hidden in production.
static SHOW_DETAIL: OnceCell<bool> = OnceCell::new();

pub fn init(show_detail: bool) {
    let _ = SHOW_DETAIL.set(show_detail);
}

fn show_detail() -> bool {
    *SHOW_DETAIL.get().unwrap_or(&true)
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
            ),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }

        let mut ctx = Context::new();
        ctx.insert("title", &message);
        ctx.insert("status", &status.as_u16());
        if show_detail() && status == StatusCode::INTERNAL_SERVER_ERROR {
            ctx.insert("detail", &self.to_string());
        }

        match views::render("error.html", &ctx) {
            Ok(body) => (status, Html(body)).into_response(),
            // The error template itself failed; fall back to plain text.
            Err(e) => {
                tracing::error!("error page render failed: {}", e);
                (status, message).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        init(true);
        let response = AppError::NotFound("Category Not Found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn io_errors_map_to_500() {
        init(true);
        let err = AppError::Io(std::io::Error::other("disk on fire"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
