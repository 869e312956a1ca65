pub mod categories;
pub mod cookware;
pub mod cookware_instances;
pub mod home;
pub mod perishable_instances;
pub mod perishables;
pub mod recipes;

use axum::{
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tera::Context;

use crate::error::AppError;
use crate::views;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/categories", categories::router())
        .nest("/perishables", perishables::router())
        .nest("/perishableinstances", perishable_instances::router())
        .nest("/cookware", cookware::router())
        .nest("/cookwareinstances", cookware_instances::router())
        .nest("/recipes", recipes::router())
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Page Not Found".to_string())
}

pub(crate) fn render(template: &str, context: &Context) -> Result<Response, AppError> {
    Ok(Html(views::render(template, context)?).into_response())
}
