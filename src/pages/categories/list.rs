use axum::{extract::State, response::Response};
use diesel::prelude::*;
use tera::Context;

use crate::error::AppError;
use crate::models::Category;
use crate::pages::render;
use crate::schema::categories;
use crate::AppState;

pub async fn list_categories(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let all_categories = categories::table
        .order(categories::title.asc())
        .select(Category::as_select())
        .load(&mut conn)?;

    let mut ctx = Context::new();
    ctx.insert("title", "Perishable Category List");
    ctx.insert("category_list", &all_categories);
    ctx.insert("create_url", "/categories/create");
    render("category_list.html", &ctx)
}
