use axum::{
    extract::{Path, State},
    response::Response,
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Cookware, CookwareInstance};
use crate::pages::render;
use crate::schema::{cookware, cookware_instances};
use crate::AppState;

pub async fn cookware_detail(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let cookware_type = cookware::table
        .find(id)
        .select(Cookware::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Cookware Type Not Found".to_string()))?;

    let instances: Vec<CookwareInstance> = cookware_instances::table
        .filter(cookware_instances::cookware_id.eq(id))
        .order(cookware_instances::condition.desc())
        .select(CookwareInstance::as_select())
        .load(&mut conn)?;

    let mut ctx = Context::new();
    ctx.insert(
        "title",
        &format!("Cookware Type Details: {}", cookware_type.title),
    );
    ctx.insert("cookware_type", &cookware_type);
    ctx.insert("cookware_instances", &instances);
    render("cookware_detail.html", &ctx)
}
