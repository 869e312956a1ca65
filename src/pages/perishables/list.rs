use axum::{extract::State, response::Response};
use diesel::prelude::*;
use tera::Context;

use crate::error::AppError;
use crate::models::Perishable;
use crate::pages::render;
use crate::schema::perishables;
use crate::AppState;

pub async fn list_perishables(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let all_perishables = perishables::table
        .order(perishables::title.asc())
        .select(Perishable::as_select())
        .load(&mut conn)?;

    let mut ctx = Context::new();
    ctx.insert("title", "Perishable Types List");
    ctx.insert("perishable_list", &all_perishables);
    ctx.insert("create_url", "/perishables/create");
    render("perishable_list.html", &ctx)
}
