use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use super::{all_cookware, condition_names, parse_form, CookwareInstanceFormState};
use crate::error::AppError;
use crate::forms::FormData;
use crate::models::{CookwareInstance, NewCookwareInstance};
use crate::pages::render;
use crate::schema::cookware_instances;
use crate::uploads;
use crate::AppState;

fn fetch_instance(conn: &mut PgConnection, id: Uuid) -> Result<CookwareInstance, AppError> {
    cookware_instances::table
        .find(id)
        .select(CookwareInstance::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Cookware Not Found".to_string()))
}

fn form_page(
    conn: &mut PgConnection,
    state: &CookwareInstanceFormState,
    errors: Option<&[String]>,
) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", "Update Cookware");
    ctx.insert("cookwareinstance", state);
    ctx.insert("cookware_list", &all_cookware(conn)?);
    ctx.insert("conditions", &condition_names());
    if let Some(errors) = errors {
        ctx.insert("errors", errors);
    }
    render("cookwareinstance_form.html", &ctx)
}

pub async fn update_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let instance = fetch_instance(&mut conn, id)?;

    let state = CookwareInstanceFormState {
        cookware_id: instance.cookware_id.to_string(),
        description: instance.description.clone().unwrap_or_default(),
        date_bought: instance
            .date_bought
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        weight: instance.weight.map(|w| w.to_string()).unwrap_or_default(),
        condition: instance.condition.clone(),
        image: instance.image.clone(),
    };
    form_page(&mut conn, &state, None)
}

pub async fn update_instance(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload_dir = &app.config.upload_dir;
    let mut conn = app.pool.get()?;
    let current = fetch_instance(&mut conn, id)?;

    let form = FormData::read(multipart, upload_dir).await?;
    let (mut state, errors, valid) = parse_form(&form);

    let Some(valid) = valid else {
        form.discard_image(upload_dir).await;
        state.image = current.image.clone();
        return form_page(&mut conn, &state, Some(&errors));
    };

    let image = form.image.as_deref().or(current.image.as_deref());
    let changes = NewCookwareInstance {
        cookware_id: valid.cookware_id,
        description: valid.description.as_deref(),
        date_bought: valid.date_bought,
        weight: valid.weight,
        condition: valid.condition,
        image,
    };

    match diesel::update(cookware_instances::table.find(id))
        .set(&changes)
        .execute(&mut conn)
    {
        Ok(_) => {
            if form.image.is_some() {
                if let Some(old) = &current.image {
                    uploads::remove_image(upload_dir, old).await;
                }
            }
            Ok(Redirect::to(&format!("/cookwareinstances/{id}")).into_response())
        }
        Err(e) => {
            form.discard_image(upload_dir).await;
            Err(e.into())
        }
    }
}
