use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tera::Context;
use uuid::Uuid;

use super::CategoryFormState;
use crate::error::AppError;
use crate::forms::{self, Errors, FormData};
use crate::models::NewCategory;
use crate::pages::render;
use crate::schema::categories;
use crate::AppState;

pub async fn create_form() -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", "Create New Category");
    ctx.insert("category", &CategoryFormState::default());
    render("category_form.html", &ctx)
}

pub async fn create_category(
    State(app): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload_dir = &app.config.upload_dir;
    let form = FormData::read(multipart, upload_dir).await?;

    let mut errors = Errors::new();
    if let Some(msg) = &form.image_error {
        errors.push(msg.clone());
    }
    let title = forms::required_text(
        form.value("title"),
        3,
        "Category title must contain at least 3 characters",
        &mut errors,
    );

    if !errors.is_empty() {
        form.discard_image(upload_dir).await;
        let mut ctx = Context::new();
        ctx.insert("title", "Create New Category");
        ctx.insert("errors", &errors);
        ctx.insert("category", &CategoryFormState { title, image: None });
        return render("category_form.html", &ctx);
    }

    let mut conn = app.pool.get()?;
    let new_category = NewCategory {
        title: &title,
        image: form.image.as_deref(),
    };

    match diesel::insert_into(categories::table)
        .values(&new_category)
        .returning(categories::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => Ok(Redirect::to(&format!("/categories/{id}")).into_response()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            // A category with this title already exists; point at it
            form.discard_image(upload_dir).await;
            let existing: Uuid = categories::table
                .filter(categories::title.eq(&title))
                .select(categories::id)
                .first(&mut conn)?;
            Ok(Redirect::to(&format!("/categories/{existing}")).into_response())
        }
        Err(e) => {
            form.discard_image(upload_dir).await;
            Err(e.into())
        }
    }
}
