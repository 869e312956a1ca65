use axum::{
    extract::{Path, State},
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
use crate::models::{NewPerishable, Perishable};
use crate::pages::render;
use crate::schema::perishables;
use crate::AppState;

fn fetch_perishable(conn: &mut PgConnection, id: Uuid) -> Result<Perishable, AppError> {
    perishables::table
        .find(id)
        .select(Perishable::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Perishable Type Not Found".to_string()))
}

fn form_page(
    conn: &mut PgConnection,
    page_title: &str,
    state: &PerishableFormState,
    errors: Option<&[String]>,
) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", page_title);
    ctx.insert("perishable", state);
    ctx.insert("category_list", &all_categories(conn)?);
    ctx.insert("measure_types", &measure_type_names());
    if let Some(errors) = errors {
        ctx.insert("errors", errors);
    }
    render("perishable_form.html", &ctx)
}

pub async fn update_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let perishable = fetch_perishable(&mut conn, id)?;

    let state = PerishableFormState {
        title: perishable.title.clone(),
        description: perishable.description.clone().unwrap_or_default(),
        measure_type: perishable.measure_type.clone(),
        category_id: perishable
            .category_id
            .map(|c| c.to_string())
            .unwrap_or_default(),
    };
    form_page(
        &mut conn,
        &format!("Update Perishable Type - {}", perishable.title),
        &state,
        None,
    )
}

pub async fn update_perishable(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let current = fetch_perishable(&mut conn, id)?;
    let page_title = format!("Update Perishable Type - {}", current.title);

    let form = FormData::from_fields(fields);
    let (state, errors, valid) = parse_form(&form);

    let Some(valid) = valid else {
        return form_page(&mut conn, &page_title, &state, Some(&errors));
    };

    let changes = NewPerishable {
        title: &valid.title,
        measure_type: valid.measure_type,
        description: valid.description.as_deref(),
        category_id: valid.category_id,
    };

    match diesel::update(perishables::table.find(id))
        .set(&changes)
        .execute(&mut conn)
    {
        Ok(_) => Ok(Redirect::to(&format!("/perishables/{id}")).into_response()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            let errors = vec!["A perishable type with this title already exists".to_string()];
            form_page(&mut conn, &page_title, &state, Some(&errors))
        }
        Err(e) => Err(e.into()),
    }
}
