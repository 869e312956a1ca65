use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use serde::Serialize;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Perishable, PerishableInstance};
use crate::pages::render;
use crate::schema::{perishable_instances, perishables, recipes};
use crate::AppState;

#[derive(Debug, Serialize)]
struct RecipeRef {
    id: Uuid,
    title: String,
}

struct DeleteView {
    perishable: Perishable,
    instances: Vec<PerishableInstance>,
    recipes: Vec<RecipeRef>,
}

impl DeleteView {
    fn blocked(&self) -> bool {
        !self.instances.is_empty() || !self.recipes.is_empty()
    }
}

fn load_delete_view(conn: &mut PgConnection, id: Uuid) -> Result<Option<DeleteView>, AppError> {
    let Some(perishable) = perishables::table
        .find(id)
        .select(Perishable::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let instances = perishable_instances::table
        .filter(perishable_instances::perishable_id.eq(id))
        .order(perishable_instances::date_last_use.asc())
        .select(PerishableInstance::as_select())
        .load(conn)?;

    // JSONB containment finds recipes with an ingredient line for this
    // perishable
    let recipe_rows: Vec<(Uuid, String)> = recipes::table
        .filter(recipes::ingredients.contains(serde_json::json!([{ "perishable_id": id }])))
        .order(recipes::title.asc())
        .select((recipes::id, recipes::title))
        .load(conn)?;

    Ok(Some(DeleteView {
        perishable,
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
        &format!("Delete Perishable Type - {}", view.perishable.title),
    );
    ctx.insert("perishable_type", &view.perishable);
    ctx.insert("perishableinstance_list", &view.instances);
    ctx.insert("recipe_list", &view.recipes);
    render("perishable_delete.html", &ctx)
}

pub async fn delete_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    match load_delete_view(&mut conn, id)? {
        Some(view) => confirmation_page(&view),
        None => Ok(Redirect::to("/perishables").into_response()),
    }
}

pub async fn delete_perishable(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some(view) = load_delete_view(&mut conn, id)? else {
        return Ok(Redirect::to("/perishables").into_response());
    };

    if view.blocked() {
        return confirmation_page(&view);
    }

    diesel::delete(perishables::table.find(id)).execute(&mut conn)?;
    Ok(Redirect::to("/perishables").into_response())
}
