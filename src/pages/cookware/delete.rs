use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use serde::Serialize;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Cookware, CookwareInstance};
use crate::pages::render;
use crate::schema::{cookware, cookware_instances, recipes};
use crate::AppState;

#[derive(Debug, Serialize)]
struct RecipeRef {
    id: Uuid,
    title: String,
}

struct DeleteView {
    cookware: Cookware,
    instances: Vec<CookwareInstance>,
    recipes: Vec<RecipeRef>,
}

impl DeleteView {
    fn blocked(&self) -> bool {
        !self.instances.is_empty() || !self.recipes.is_empty()
    }
}

fn load_delete_view(conn: &mut PgConnection, id: Uuid) -> Result<Option<DeleteView>, AppError> {
    let Some(cookware_type) = cookware::table
        .find(id)
        .select(Cookware::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let instances = cookware_instances::table
        .filter(cookware_instances::cookware_id.eq(id))
        .order(cookware_instances::condition.desc())
        .select(CookwareInstance::as_select())
        .load(conn)?;

    let recipe_rows: Vec<(Uuid, String)> = recipes::table
        .filter(recipes::cookware_ids.contains(vec![Some(id)]))
        .order(recipes::title.asc())
        .select((recipes::id, recipes::title))
        .load(conn)?;

    Ok(Some(DeleteView {
        cookware: cookware_type,
        instances,
        recipes: recipe_rows
            .into_iter()
            .map(|(id, title)| RecipeRef { id, title })
            .collect(),
    }))
}

fn confirmation_page(view: &DeleteView) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert(
        "title",
        &format!("Delete Cookware Type - {}", view.cookware.title),
    );
    ctx.insert("cookware", &view.cookware);
    ctx.insert("cookwareinstance_list", &view.instances);
    ctx.insert("recipe_list", &view.recipes);
    render("cookware_delete.html", &ctx)
}

pub async fn delete_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    match load_delete_view(&mut conn, id)? {
        Some(view) => confirmation_page(&view),
        None => Ok(Redirect::to("/cookware").into_response()),
    }
}

pub async fn delete_cookware(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some(view) = load_delete_view(&mut conn, id)? else {
        return Ok(Redirect::to("/cookware").into_response());
    };

    if view.blocked() {
        return confirmation_page(&view);
    }

    diesel::delete(cookware::table.find(id)).execute(&mut conn)?;
    Ok(Redirect::to("/cookware").into_response())
}
