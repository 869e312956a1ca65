use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Recipe;
use crate::pages::render;
use crate::schema::recipes;
use crate::uploads;
use crate::AppState;

fn load_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Option<Recipe>, AppError> {
    Ok(recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?)
}

pub async fn delete_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some(recipe) = load_recipe(&mut conn, id)? else {
        return Ok(Redirect::to("/recipes").into_response());
    };

    let mut ctx = Context::new();
    ctx.insert("title", &format!("Delete Recipe - {}", recipe.title));
    ctx.insert("recipe", &recipe);
    render("recipe_delete.html", &ctx)
}

pub async fn delete_recipe(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some(recipe) = load_recipe(&mut conn, id)? else {
        return Ok(Redirect::to("/recipes").into_response());
    };

    diesel::delete(recipes::table.find(id)).execute(&mut conn)?;
    if let Some(image) = &recipe.image {
        uploads::remove_image(&app.config.upload_dir, image).await;
    }
    Ok(Redirect::to("/recipes").into_response())
}
