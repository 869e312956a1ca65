use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use diesel::prelude::*;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::CookwareInstance;
use crate::pages::render;
use crate::schema::{cookware, cookware_instances};
use crate::uploads;
use crate::AppState;

fn load_instance(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<(CookwareInstance, String)>, AppError> {
    let found = cookware_instances::table
        .inner_join(cookware::table)
        .filter(cookware_instances::id.eq(id))
        .select((CookwareInstance::as_select(), cookware::title))
        .first::<(CookwareInstance, String)>(conn)
        .optional()?;
    Ok(found)
}

pub async fn delete_form(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some((instance, cookware_title)) = load_instance(&mut conn, id)? else {
        return Ok(Redirect::to("/cookwareinstances").into_response());
    };

    let mut ctx = Context::new();
    ctx.insert("title", &format!("Delete Cookware - {cookware_title}"));
    ctx.insert("cookware_instance", &instance);
    ctx.insert("cookware_title", &cookware_title);
    render("cookwareinstance_delete.html", &ctx)
}

pub async fn delete_instance(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;
    let Some((instance, _)) = load_instance(&mut conn, id)? else {
        return Ok(Redirect::to("/cookwareinstances").into_response());
    };

    diesel::delete(cookware_instances::table.find(id)).execute(&mut conn)?;
    if let Some(image) = &instance.image {
        uploads::remove_image(&app.config.upload_dir, image).await;
    }
    Ok(Redirect::to("/cookwareinstances").into_response())
}
