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

pub async fn instance_detail(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let instance = cookware_instances::table
        .find(id)
        .select(CookwareInstance::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Cookware Not Found".to_string()))?;

    let cookware_type = cookware::table
        .find(instance.cookware_id)
        .select(Cookware::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Cookware Type Not Found".to_string()))?;

    let mut ctx = Context::new();
    ctx.insert("title", &format!("{} - {}", cookware_type.title, instance.id));
    ctx.insert("cookware_instance", &instance);
    ctx.insert("cookware_type", &cookware_type);
    render("cookwareinstance_detail.html", &ctx)
}
