use axum::{
    extract::{Path, State},
    response::Response,
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Category, Perishable};
use crate::pages::render;
use crate::schema::{categories, perishables};
use crate::AppState;

pub async fn category_detail(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let category = categories::table
        .find(id)
        .select(Category::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Category Not Found".to_string()))?;

    let perishables_in_category = perishables::table
        .filter(perishables::category_id.eq(id))
        .order(perishables::title.asc())
        .select(Perishable::as_select())
        .load(&mut conn)?;

    let mut ctx = Context::new();
    ctx.insert(
        "title",
        &format!("Perishable Category Details: {}", category.title),
    );
    ctx.insert("category", &category);
    ctx.insert("category_perishables", &perishables_in_category);
    render("category_detail.html", &ctx)
}
