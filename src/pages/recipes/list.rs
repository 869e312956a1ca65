use axum::{extract::State, response::Response};
use diesel::prelude::*;
use tera::Context;

use crate::error::AppError;
use crate::models::Recipe;
use crate::pages::render;
use crate::schema::recipes;
use crate::AppState;

pub async fn list_recipes(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let all_recipes = recipes::table
        .order(recipes::title.asc())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let mut ctx = Context::new();
    ctx.insert("title", "Recipes List");
    ctx.insert("recipe_list", &all_recipes);
    ctx.insert("create_url", "/recipes/create");
    render("recipe_list.html", &ctx)
}
