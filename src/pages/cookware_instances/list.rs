use axum::{extract::State, response::Response};
use diesel::prelude::*;
use serde::Serialize;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::pages::render;
use crate::schema::{cookware, cookware_instances};
use crate::AppState;

#[derive(Debug, Serialize)]
struct InstanceRow {
    id: Uuid,
    title: String,
    condition: String,
}

pub async fn list_instances(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let rows: Vec<(Uuid, String, String)> = cookware_instances::table
        .inner_join(cookware::table)
        .order(cookware::title.asc())
        .select((
            cookware_instances::id,
            cookware::title,
            cookware_instances::condition,
        ))
        .load(&mut conn)?;

    let instance_list: Vec<InstanceRow> = rows
        .into_iter()
        .map(|(id, title, condition)| InstanceRow {
            id,
            title,
            condition,
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("title", "Cookware List");
    ctx.insert("cookwareinstance_list", &instance_list);
    ctx.insert("create_url", "/cookwareinstances/create");
    render("cookwareinstance_list.html", &ctx)
}
