use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tera::Context;
use uuid::Uuid;

use super::{all_categories, measure_type_names, parse_form, PerishableFormState};
use crate::error::AppError;
use crate::forms::FormData;
use crate::models::NewPerishable;
use crate::pages::render;
use crate::schema::perishables;
use crate::AppState;

fn form_page(
    app: &crate::App,
    page_title: &str,
    state: &PerishableFormState,
    errors: Option<&[String]>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let mut ctx = Context::new();
    ctx.insert("title", page_title);
    ctx.insert("perishable", state);
    ctx.insert("category_list", &all_categories(&mut conn)?);
    ctx.insert("measure_types", &measure_type_names());
    if let Some(errors) = errors {
        ctx.insert("errors", errors);
    }
    render("perishable_form.html", &ctx)
}

pub async fn create_form(State(app): State<AppState>) -> Result<Response, AppError> {
    form_page(
        &app,
        "Create New Perishable Type",
        &PerishableFormState::default(),
        None,
    )
}

pub async fn create_perishable(
    State(app): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::from_fields(fields);
    let (state, errors, valid) = parse_form(&form);

    let Some(valid) = valid else {
        return form_page(&app, "Create New Perishable Type", &state, Some(&errors));
    };

    let mut conn = app.pool.get()?;
    let new_perishable = NewPerishable {
        title: &valid.title,
        measure_type: valid.measure_type,
        description: valid.description.as_deref(),
        category_id: valid.category_id,
    };

    match diesel::insert_into(perishables::table)
        .values(&new_perishable)
        .returning(perishables::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => Ok(Redirect::to(&format!("/perishables/{id}")).into_response()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            let existing: Uuid = perishables::table
                .filter(perishables::title.eq(&valid.title))
                .select(perishables::id)
                .first(&mut conn)?;
            Ok(Redirect::to(&format!("/perishables/{existing}")).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
