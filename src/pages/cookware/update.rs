use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tera::Context;
use uuid::Uuid;

use super::{parse_form, CookwareFormState};
use crate::error::AppError;
use crate::forms::FormData;
use crate::models::{Cookware, NewCookware};
use crate::pages::render;
use crate::schema::cookware;
use crate::AppState;

fn fetch_cookware(conn: &mut PgConnection, id: Uuid) -> Result<Cookware, AppError> {
    cookware::table
        .find(id)
        .select(Cookware::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Cookware Type Not Found".to_string()))
}

fn form_page(
    page_title: &str,
    state: &CookwareFormState,
    errors: Option<&[String]>,
) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", page_title);
    ctx.insert("cookware", state);
    if let Some(errors) = errors {
        ctx.insert("errors", errors);
    }
    render("cookware_form.html", &ctx)
}

pub async fn update_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let cookware_type = fetch_cookware(&mut conn, id)?;

    let state = CookwareFormState {
        title: cookware_type.title.clone(),
        description: cookware_type.description.clone().unwrap_or_default(),
    };
    form_page(
        &format!("Update Cookware Type - {}", cookware_type.title),
        &state,
        None,
    )
}

pub async fn update_cookware(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let current = fetch_cookware(&mut conn, id)?;
    let page_title = format!("Update Cookware Type - {}", current.title);

    let form = FormData::from_fields(fields);
    let (state, errors, valid) = parse_form(&form);

    let Some(valid) = valid else {
        return form_page(&page_title, &state, Some(&errors));
    };

    let changes = NewCookware {
        title: &valid.title,
        description: valid.description.as_deref(),
    };

    match diesel::update(cookware::table.find(id))
        .set(&changes)
        .execute(&mut conn)
    {
        Ok(_) => Ok(Redirect::to(&format!("/cookware/{id}")).into_response()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            let errors = vec!["A cookware type with this title already exists".to_string()];
            form_page(&page_title, &state, Some(&errors))
        }
        Err(e) => Err(e.into()),
    }
}
