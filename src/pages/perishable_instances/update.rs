use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use super::{all_perishables, parse_form, InstanceFormState};
use crate::error::AppError;
use crate::forms::FormData;
use crate::models::{NewPerishableInstance, PerishableInstance};
use crate::pages::render;
use crate::schema::perishable_instances;
use crate::uploads;
use crate::AppState;

fn fetch_instance(conn: &mut PgConnection, id: Uuid) -> Result<PerishableInstance, AppError> {
    perishable_instances::table
        .find(id)
        .select(PerishableInstance::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Perishable Not Found".to_string()))
}

fn form_page(
    conn: &mut PgConnection,
    page_title: &str,
    state: &InstanceFormState,
    errors: Option<&[String]>,
) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", page_title);
    ctx.insert("perishableinstance", state);
    ctx.insert("perishable_list", &all_perishables(conn)?);
    if let Some(errors) = errors {
        ctx.insert("errors", errors);
    }
    render("perishableinstance_form.html", &ctx)
}

pub async fn update_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let instance = fetch_instance(&mut conn, id)?;

    let state = InstanceFormState {
        perishable_id: instance.perishable_id.to_string(),
        amount: instance.amount.to_string(),
        place_bought: instance.place_bought.clone().unwrap_or_default(),
        date_bought: instance.date_bought.format("%Y-%m-%d").to_string(),
        date_last_use: instance.date_last_use.format("%Y-%m-%d").to_string(),
        image: instance.image.clone(),
    };
    form_page(&mut conn, "Update Perishable", &state, None)
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
        return form_page(&mut conn, "Update Perishable", &state, Some(&errors));
    };

    let image = form.image.as_deref().or(current.image.as_deref());
    let changes = NewPerishableInstance {
        perishable_id: valid.perishable_id,
        amount: valid.amount,
        place_bought: valid.place_bought.as_deref(),
        // An update keeps the stored dates unless the form supplies new ones
        date_bought: valid.date_bought.unwrap_or(current.date_bought),
        date_last_use: valid.date_last_use.unwrap_or(current.date_last_use),
        image,
    };

    match diesel::update(perishable_instances::table.find(id))
        .set(&changes)
        .execute(&mut conn)
    {
        Ok(_) => {
            if form.image.is_some() {
                if let Some(old) = &current.image {
                    uploads::remove_image(upload_dir, old).await;
                }
            }
            Ok(Redirect::to(&format!("/perishableinstances/{id}")).into_response())
        }
        Err(e) => {
            form.discard_image(upload_dir).await;
            Err(e.into())
        }
    }
}
