use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use super::{all_perishables, parse_form, InstanceFormState};
use crate::error::AppError;
use crate::forms::FormData;
use crate::models::{default_last_use, NewPerishableInstance};
use crate::pages::render;
use crate::schema::perishable_instances;
use crate::AppState;

fn form_page(
    conn: &mut PgConnection,
    state: &InstanceFormState,
    errors: Option<&[String]>,
) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", "Create New Perishable");
    ctx.insert("perishableinstance", state);
    ctx.insert("perishable_list", &all_perishables(conn)?);
    if let Some(errors) = errors {
        ctx.insert("errors", errors);
    }
    render("perishableinstance_form.html", &ctx)
}

pub async fn create_form(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    form_page(&mut conn, &InstanceFormState::default(), None)
}

pub async fn create_instance(
    State(app): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload_dir = &app.config.upload_dir;
    let form = FormData::read(multipart, upload_dir).await?;
    let (state, errors, valid) = parse_form(&form);

    let Some(valid) = valid else {
        form.discard_image(upload_dir).await;
        let mut conn = app.pool.get()?;
        return form_page(&mut conn, &state, Some(&errors));
    };

    let now = Utc::now();
    let new_instance = NewPerishableInstance {
        perishable_id: valid.perishable_id,
        amount: valid.amount,
        place_bought: valid.place_bought.as_deref(),
        date_bought: valid.date_bought.unwrap_or(now),
        date_last_use: valid.date_last_use.unwrap_or_else(|| default_last_use(now)),
        image: form.image.as_deref(),
    };

    let mut conn = app.pool.get()?;
    match diesel::insert_into(perishable_instances::table)
        .values(&new_instance)
        .returning(perishable_instances::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => Ok(Redirect::to(&format!("/perishableinstances/{id}")).into_response()),
        Err(e) => {
            form.discard_image(upload_dir).await;
            Err(e.into())
        }
    }
}
