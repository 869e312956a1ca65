use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tera::Context;
use uuid::Uuid;

use super::CategoryFormState;
use crate::error::AppError;
use crate::forms::{self, Errors, FormData};
use crate::models::{Category, NewCategory};
use crate::pages::render;
use crate::schema::categories;
use crate::uploads;
use crate::AppState;

fn fetch_category(conn: &mut PgConnection, id: Uuid) -> Result<Category, AppError> {
    categories::table
        .find(id)
        .select(Category::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Category Not Found".to_string()))
}

pub async fn update_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let category = fetch_category(&mut conn, id)?;

    let mut ctx = Context::new();
    ctx.insert("title", &format!("Update Category - {}", category.title));
    ctx.insert(
        "category",
        &CategoryFormState {
            title: category.title.clone(),
            image: category.image.clone(),
        },
    );
    render("category_form.html", &ctx)
}

pub async fn update_category(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload_dir = &app.config.upload_dir;
    let mut conn = app.pool.get()?;
    let current = fetch_category(&mut conn, id)?;

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

    let rerender = |title: String, errors: &Errors| {
        let mut ctx = Context::new();
        ctx.insert("title", &format!("Update Category - {}", current.title));
        ctx.insert("errors", errors);
        ctx.insert(
            "category",
            &CategoryFormState {
                title,
                image: current.image.clone(),
            },
        );
        render("category_form.html", &ctx)
    };

    if !errors.is_empty() {
        form.discard_image(upload_dir).await;
        return rerender(title, &errors);
    }

    // The new image (if any) takes over; the old file is only removed
    // once the row is actually rewritten.
    let image = form.image.as_deref().or(current.image.as_deref());
    let changes = NewCategory {
        title: &title,
        image,
    };

    match diesel::update(categories::table.find(id))
        .set(&changes)
        .execute(&mut conn)
    {
        Ok(_) => {
            if form.image.is_some() {
                if let Some(old) = &current.image {
                    uploads::remove_image(upload_dir, old).await;
                }
            }
            Ok(Redirect::to(&format!("/categories/{id}")).into_response())
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            form.discard_image(upload_dir).await;
            let errors = vec!["A category with this title already exists".to_string()];
            rerender(title, &errors)
        }
        Err(e) => {
            form.discard_image(upload_dir).await;
            Err(e.into())
        }
    }
}
