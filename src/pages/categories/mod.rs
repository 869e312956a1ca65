pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use axum::{routing::get, Router};
use serde::Serialize;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_categories))
        .route(
            "/create",
            get(create::create_form).post(create::create_category),
        )
        .route(
            "/{id}/delete",
            get(delete::delete_form).post(delete::delete_category),
        )
        .route(
            "/{id}/update",
            get(update::update_form).post(update::update_category),
        )
        .route("/{id}", get(detail::category_detail))
}

/// What the category form re-renders: the entered title plus the stored
/// image, if any.
#[derive(Debug, Default, Serialize)]
pub struct CategoryFormState {
    pub title: String,
    pub image: Option<String>,
}
