use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use super::create::form_page;
use super::{parse_form, IngredientEntry, RecipeFormState};
use crate::error::AppError;
use crate::forms::FormData;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;
use crate::uploads;
use crate::AppState;

fn fetch_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Recipe, AppError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Recipe Not Found".to_string()))
}

fn state_from(recipe: &Recipe) -> RecipeFormState {
    let mut ingredients: Vec<IngredientEntry> = recipe
        .parsed_ingredients()
        .iter()
        .map(|line| IngredientEntry {
            perishable: line.perishable_id.to_string(),
            amount: line.amount.to_string(),
        })
        .collect();
    if ingredients.is_empty() {
        ingredients.push(IngredientEntry::default());
    }

    RecipeFormState {
        title: recipe.title.clone(),
        description: recipe.description.clone().unwrap_or_default(),
        instructions: recipe.instructions.clone(),
        cookware_ids: recipe
            .cookware_ids
            .iter()
            .filter_map(|c| c.map(|id| id.to_string()))
            .collect(),
        ingredients,
        image: recipe.image.clone(),
    }
}

pub async fn update_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let recipe = fetch_recipe(&mut conn, id)?;
    let page_title = format!("Update Recipe - {}", recipe.title);
    form_page(&mut conn, &page_title, &state_from(&recipe), None)
}

pub async fn update_recipe(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload_dir = &app.config.upload_dir;
    let mut conn = app.pool.get()?;
    let current = fetch_recipe(&mut conn, id)?;
    let page_title = format!("Update Recipe - {}", current.title);

    let form = FormData::read(multipart, upload_dir).await?;
    let (mut state, errors, valid) = parse_form(&form);

    let Some(valid) = valid else {
        form.discard_image(upload_dir).await;
        state.image = current.image.clone();
        return form_page(&mut conn, &page_title, &state, Some(&errors));
    };

    let cookware_ids: Vec<Option<Uuid>> = valid.cookware_ids.iter().map(|c| Some(*c)).collect();
    let ingredients = serde_json::to_value(&valid.ingredients)?;
    let image = form.image.as_deref().or(current.image.as_deref());
    let changes = NewRecipe {
        title: &valid.title,
        description: valid.description.as_deref(),
        instructions: &valid.instructions,
        cookware_ids: &cookware_ids,
        ingredients,
        image,
    };

    match diesel::update(recipes::table.find(id))
        .set(&changes)
        .execute(&mut conn)
    {
        Ok(_) => {
            if form.image.is_some() {
                if let Some(old) = &current.image {
                    uploads::remove_image(upload_dir, old).await;
                }
            }
            Ok(Redirect::to(&format!("/recipes/{id}")).into_response())
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            form.discard_image(upload_dir).await;
            let errors = vec!["A recipe with this title already exists".to_string()];
            state.image = current.image.clone();
            form_page(&mut conn, &page_title, &state, Some(&errors))
        }
        Err(e) => {
            form.discard_image(upload_dir).await;
            Err(e.into())
        }
    }
}
