use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tera::Context;
use uuid::Uuid;

use super::{parse_form, RecipeFormState};
use crate::error::AppError;
use crate::forms::FormData;
use crate::models::{Cookware, NewRecipe, Perishable};
use crate::pages::render;
use crate::schema::{cookware, perishables, recipes};
use crate::AppState;

pub(super) fn form_page(
    conn: &mut PgConnection,
    page_title: &str,
    state: &RecipeFormState,
    errors: Option<&[String]>,
) -> Result<Response, AppError> {
    let perishable_list = perishables::table
        .order(perishables::title.asc())
        .select(Perishable::as_select())
        .load::<Perishable>(conn)?;
    let cookware_list = cookware::table
        .order(cookware::title.asc())
        .select(Cookware::as_select())
        .load::<Cookware>(conn)?;

    let mut ctx = Context::new();
    ctx.insert("title", page_title);
    ctx.insert("recipe", state);
    ctx.insert("perishable_list", &perishable_list);
    ctx.insert("cookware_list", &cookware_list);
    if let Some(errors) = errors {
        ctx.insert("errors", errors);
    }
    render("recipe_form.html", &ctx)
}

pub async fn create_form(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    form_page(
        &mut conn,
        "Create New Recipe",
        &RecipeFormState::default(),
        None,
    )
}

pub async fn create_recipe(
    State(app): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload_dir = &app.config.upload_dir;
    let form = FormData::read(multipart, upload_dir).await?;
    let (state, errors, valid) = parse_form(&form);

    let Some(valid) = valid else {
        form.discard_image(upload_dir).await;
        let mut conn = app.pool.get()?;
        return form_page(&mut conn, "Create New Recipe", &state, Some(&errors));
    };

    let cookware_ids: Vec<Option<Uuid>> = valid.cookware_ids.iter().map(|c| Some(*c)).collect();
    let ingredients = serde_json::to_value(&valid.ingredients)?;
    let new_recipe = NewRecipe {
        title: &valid.title,
        description: valid.description.as_deref(),
        instructions: &valid.instructions,
        cookware_ids: &cookware_ids,
        ingredients,
        image: form.image.as_deref(),
    };

    let mut conn = app.pool.get()?;
    match diesel::insert_into(recipes::table)
        .values(&new_recipe)
        .returning(recipes::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => Ok(Redirect::to(&format!("/recipes/{id}")).into_response()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            form.discard_image(upload_dir).await;
            let existing: Uuid = recipes::table
                .filter(recipes::title.eq(&valid.title))
                .select(recipes::id)
                .first(&mut conn)?;
            Ok(Redirect::to(&format!("/recipes/{existing}")).into_response())
        }
        Err(e) => {
            form.discard_image(upload_dir).await;
            Err(e.into())
        }
    }
}
