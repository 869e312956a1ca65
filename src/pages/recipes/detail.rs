use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    response::Response,
};
use diesel::prelude::*;
use serde::Serialize;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Cookware, Perishable, Recipe};
use crate::pages::render;
use crate::schema::{cookware, perishables, recipes};
use crate::AppState;

#[derive(Debug, Serialize)]
struct IngredientLine {
    perishable_id: Uuid,
    title: String,
    amount: f64,
    measure_type: String,
}

pub async fn recipe_detail(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let recipe = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Recipe Not Found".to_string()))?;

    let ingredients = recipe.parsed_ingredients();
    let perishable_ids: Vec<Uuid> = ingredients.iter().map(|i| i.perishable_id).collect();
    let perishable_rows: Vec<Perishable> = perishables::table
        .filter(perishables::id.eq_any(&perishable_ids))
        .select(Perishable::as_select())
        .load(&mut conn)?;
    let by_id: HashMap<Uuid, &Perishable> =
        perishable_rows.iter().map(|p| (p.id, p)).collect();

    // Lines whose perishable has since disappeared are skipped
    let ingredient_list: Vec<IngredientLine> = ingredients
        .iter()
        .filter_map(|line| {
            by_id.get(&line.perishable_id).map(|p| IngredientLine {
                perishable_id: p.id,
                title: p.title.clone(),
                amount: line.amount,
                measure_type: p.measure_type.clone(),
            })
        })
        .collect();

    let cookware_ids: Vec<Uuid> = recipe.cookware_ids.iter().filter_map(|c| *c).collect();
    let cookware_list: Vec<Cookware> = cookware::table
        .filter(cookware::id.eq_any(&cookware_ids))
        .order(cookware::title.asc())
        .select(Cookware::as_select())
        .load(&mut conn)?;

    let mut ctx = Context::new();
    ctx.insert("title", &format!("{} - Recipe", recipe.title));
    ctx.insert("recipe", &recipe);
    ctx.insert("ingredient_list", &ingredient_list);
    ctx.insert("cookware_list", &cookware_list);
    render("recipe_detail.html", &ctx)
}
