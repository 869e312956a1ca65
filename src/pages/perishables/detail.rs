use axum::{
    extract::{Path, State},
    response::Response,
};
use chrono::Utc;
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Category, Perishable, PerishableInstance};
use crate::pages::render;
use crate::schema::{categories, perishable_instances, perishables};
use crate::AppState;

pub async fn perishable_detail(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let perishable = perishables::table
        .find(id)
        .select(Perishable::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Perishable Type Not Found".to_string()))?;

    // Reference resolved with an explicit follow-up fetch
    let category = match perishable.category_id {
        Some(category_id) => categories::table
            .find(category_id)
            .select(Category::as_select())
            .first(&mut conn)
            .optional()?,
        None => None,
    };

    let instances: Vec<PerishableInstance> = perishable_instances::table
        .filter(perishable_instances::perishable_id.eq(id))
        .order(perishable_instances::date_last_use.asc())
        .select(PerishableInstance::as_select())
        .load(&mut conn)?;

    let now = Utc::now();
    let (fresh, expired): (Vec<_>, Vec<_>) =
        instances.into_iter().partition(|i| !i.is_expired(now));

    let mut ctx = Context::new();
    ctx.insert(
        "title",
        &format!("Perishable Type Details: {}", perishable.title),
    );
    ctx.insert("perishable_type", &perishable);
    ctx.insert("category", &category);
    ctx.insert("before_last_date_perishables", &fresh);
    ctx.insert("after_last_date_perishables", &expired);
    render("perishable_detail.html", &ctx)
}
