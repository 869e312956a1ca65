use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Category, Perishable};
use crate::pages::render;
use crate::schema::{categories, perishables};
use crate::uploads;
use crate::AppState;

struct DeleteView {
    category: Category,
    blockers: Vec<Perishable>,
}

fn load_delete_view(conn: &mut PgConnection, id: Uuid) -> Result<Option<DeleteView>, AppError> {
    let Some(category) = categories::table
        .find(id)
        .select(Category::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let blockers = perishables::table
        .filter(perishables::category_id.eq(id))
        .order(perishables::title.asc())
        .select(Perishable::as_select())
        .load(conn)?;

    Ok(Some(DeleteView { category, blockers }))
}

fn confirmation_page(view: &DeleteView) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert(
        "title",
        &format!("Delete Category - {}", view.category.title),
    );
    ctx.insert("category", &view.category);
    ctx.insert("perishable_list", &view.blockers);
    render("category_delete.html", &ctx)
}

pub async fn delete_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    match load_delete_view(&mut conn, id)? {
        Some(view) => confirmation_page(&view),
        None => Ok(Redirect::to("/categories").into_response()),
    }
}

pub async fn delete_category(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some(view) = load_delete_view(&mut conn, id)? else {
        return Ok(Redirect::to("/categories").into_response());
    };

    // Re-checked here: perishables may have appeared since the
    // confirmation page was rendered
    if !view.blockers.is_empty() {
        return confirmation_page(&view);
    }

    diesel::delete(categories::table.find(id)).execute(&mut conn)?;
    if let Some(image) = &view.category.image {
        uploads::remove_image(&app.config.upload_dir, image).await;
    }
    Ok(Redirect::to("/categories").into_response())
}
