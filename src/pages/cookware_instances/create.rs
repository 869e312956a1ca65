use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use super::{all_cookware, condition_names, parse_form, CookwareInstanceFormState};
use crate::error::AppError;
use crate::forms::FormData;
use crate::models::NewCookwareInstance;
use crate::pages::render;
use crate::schema::cookware_instances;
use crate::AppState;

fn form_page(
    conn: &mut PgConnection,
    state: &CookwareInstanceFormState,
    errors: Option<&[String]>,
) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", "Create New Cookware");
    ctx.insert("cookwareinstance", state);
    ctx.insert("cookware_list", &all_cookware(conn)?);
    ctx.insert("conditions", &condition_names());
    if let Some(errors) = errors {
        ctx.insert("errors", errors);
    }
    render("cookwareinstance_form.html", &ctx)
}

pub async fn create_form(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let state = CookwareInstanceFormState {
        condition: "Usable".to_string(),
        ..Default::default()
    };
    form_page(&mut conn, &state, None)
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

    let new_instance = NewCookwareInstance {
        cookware_id: valid.cookware_id,
        description: valid.description.as_deref(),
        date_bought: valid.date_bought,
        weight: valid.weight,
        condition: valid.condition,
        image: form.image.as_deref(),
    };

    let mut conn = app.pool.get()?;
    match diesel::insert_into(cookware_instances::table)
        .values(&new_instance)
        .returning(cookware_instances::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => Ok(Redirect::to(&format!("/cookwareinstances/{id}")).into_response()),
        Err(e) => {
            form.discard_image(upload_dir).await;
            Err(e.into())
        }
    }
}
