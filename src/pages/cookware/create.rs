use axum::{
    extract::State,
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
use crate::models::NewCookware;
use crate::pages::render;
use crate::schema::cookware;
use crate::AppState;

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

pub async fn create_form() -> Result<Response, AppError> {
    form_page(
        "Create New Cookware Type",
        &CookwareFormState::default(),
        None,
    )
}

pub async fn create_cookware(
    State(app): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::from_fields(fields);
    let (state, errors, valid) = parse_form(&form);

    let Some(valid) = valid else {
        return form_page("Create New Cookware Type", &state, Some(&errors));
    };

    let mut conn = app.pool.get()?;
    let new_cookware = NewCookware {
        title: &valid.title,
        description: valid.description.as_deref(),
    };

    match diesel::insert_into(cookware::table)
        .values(&new_cookware)
        .returning(cookware::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => Ok(Redirect::to(&format!("/cookware/{id}")).into_response()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            let existing: Uuid = cookware::table
                .filter(cookware::title.eq(&valid.title))
                .select(cookware::id)
                .first(&mut conn)?;
            Ok(Redirect::to(&format!("/cookware/{existing}")).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
