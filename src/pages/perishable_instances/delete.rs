use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::PerishableInstance;
use crate::pages::render;
use crate::schema::{perishable_instances, perishables};
use crate::uploads;
use crate::AppState;

fn load_instance(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<(PerishableInstance, String)>, AppError> {
    let found = perishable_instances::table
        .inner_join(perishables::table)
        .filter(perishable_instances::id.eq(id))
        .select((PerishableInstance::as_select(), perishables::title))
        .first::<(PerishableInstance, String)>(conn)
        .optional()?;
    Ok(found)
}

pub async fn delete_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some((instance, perishable_title)) = load_instance(&mut conn, id)? else {
        return Ok(Redirect::to("/perishableinstances").into_response());
    };

    let mut ctx = Context::new();
    ctx.insert(
        "title",
        &format!("Delete Perishable - {perishable_title}"),
    );
    ctx.insert("perishable_instance", &instance);
    ctx.insert("perishable_title", &perishable_title);
    render("perishableinstance_delete.html", &ctx)
}

pub async fn delete_instance(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some((instance, _)) = load_instance(&mut conn, id)? else {
        return Ok(Redirect::to("/perishableinstances").into_response());
    };

    diesel::delete(perishable_instances::table.find(id)).execute(&mut conn)?;
    if let Some(image) = &instance.image {
        uploads::remove_image(&app.config.upload_dir, image).await;
    }
    Ok(Redirect::to("/perishableinstances").into_response())
}
