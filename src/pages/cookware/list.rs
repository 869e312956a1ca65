use axum::{extract::State, response::Response};
use diesel::prelude::*;
use tera::Context;

use crate::error::AppError;
use crate::models::Cookware;
use crate::pages::render;
use crate::schema::cookware;
use crate::AppState;

pub async fn list_cookware(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let all_cookware = cookware::table
        .order(cookware::title.asc())
        .select(Cookware::as_select())
        .load(&mut conn)?;

    let mut ctx = Context::new();
    ctx.insert("title", "Cookware Types List");
    ctx.insert("cookware_list", &all_cookware);
    ctx.insert("create_url", "/cookware/create");
    render("cookware_list.html", &ctx)
}
