use axum::{
    extract::{Path, State},
    response::Response,
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Category, Perishable, PerishableInstance};
use crate::pages::render;
use crate::schema::{categories, perishable_instances, perishables};
use crate::AppState;

pub async fn instance_detail(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let instance = perishable_instances::table
        .find(id)
        .select(PerishableInstance::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Perishable Not Found".to_string()))?;

    // Two-level reference chain, resolved one fetch at a time
    let perishable = perishables::table
        .find(instance.perishable_id)
        .select(Perishable::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Perishable Type Not Found".to_string()))?;

    let category = match perishable.category_id {
        Some(category_id) => categories::table
            .find(category_id)
            .select(Category::as_select())
            .first(&mut conn)
            .optional()?,
        None => None,
    };

    let mut ctx = Context::new();
    ctx.insert("title", &format!("{} - {}", perishable.title, instance.id));
    ctx.insert("perishable_instance", &instance);
    ctx.insert("perishable_type", &perishable);
    ctx.insert("category", &category);
    render("perishableinstance_detail.html", &ctx)
}
