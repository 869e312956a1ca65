use axum::{extract::State, response::Response};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::pages::render;
use crate::schema::{perishable_instances, perishables};
use crate::AppState;

#[derive(Debug, Serialize)]
struct InstanceRow {
    id: Uuid,
    title: String,
    date_last_use: DateTime<Utc>,
}

pub async fn list_instances(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let rows: Vec<(Uuid, String, DateTime<Utc>)> = perishable_instances::table
        .inner_join(perishables::table)
        .order(perishable_instances::date_last_use.asc())
        .select((
            perishable_instances::id,
            perishables::title,
            perishable_instances::date_last_use,
        ))
        .load(&mut conn)?;

    let instance_list: Vec<InstanceRow> = rows
        .into_iter()
        .map(|(id, title, date_last_use)| InstanceRow {
            id,
            title,
            date_last_use,
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("title", "Perishables List");
    ctx.insert("perishableinstance_list", &instance_list);
    ctx.insert("create_url", "/perishableinstances/create");
    render("perishableinstance_list.html", &ctx)
}
