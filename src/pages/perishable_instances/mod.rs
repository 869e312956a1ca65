pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::forms::{self, Errors, FormData};
use crate::models::Perishable;
use crate::schema::perishables;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_instances))
        .route(
            "/create",
            get(create::create_form).post(create::create_instance),
        )
        .route(
            "/{id}/delete",
            get(delete::delete_form).post(delete::delete_instance),
        )
        .route(
            "/{id}/update",
            get(update::update_form).post(update::update_instance),
        )
        .route("/{id}", get(detail::instance_detail))
}

/// Entered values for the perishable form, kept as raw strings so a
/// failed submission re-renders exactly what was typed.
#[derive(Debug, Default, Serialize)]
pub struct InstanceFormState {
    pub perishable_id: String,
    pub amount: String,
    pub place_bought: String,
    pub date_bought: String,
    pub date_last_use: String,
    pub image: Option<String>,
}

pub struct ValidatedInstance {
    pub perishable_id: Uuid,
    pub amount: f64,
    pub place_bought: Option<String>,
    pub date_bought: Option<DateTime<Utc>>,
    pub date_last_use: Option<DateTime<Utc>>,
}

pub fn parse_form(form: &FormData) -> (InstanceFormState, Errors, Option<ValidatedInstance>) {
    let mut errors = Errors::new();
    if let Some(msg) = &form.image_error {
        errors.push(msg.clone());
    }

    let perishable_id = forms::required_id(
        form.value("perishable"),
        "Must choose a perishable type",
        &mut errors,
    );
    let amount = forms::required_number(form.value("amount"), "Must specify an amount", &mut errors);
    let place_bought = forms::optional_text(
        form.value("place-bought"),
        3,
        "Place must contain at least 3 characters",
        &mut errors,
    );
    let date_bought = forms::optional_date(form.value("date-bought"), "Invalid date bought", &mut errors);
    let date_last_use =
        forms::optional_date(form.value("date-last-use"), "Invalid last-use date", &mut errors);

    let state = InstanceFormState {
        perishable_id: form.value("perishable").unwrap_or("").trim().to_string(),
        amount: form.value("amount").unwrap_or("").trim().to_string(),
        place_bought: place_bought.clone().unwrap_or_default(),
        date_bought: form.value("date-bought").unwrap_or("").trim().to_string(),
        date_last_use: form.value("date-last-use").unwrap_or("").trim().to_string(),
        image: None,
    };

    let valid = match (errors.is_empty(), perishable_id) {
        (true, Some(perishable_id)) => Some(ValidatedInstance {
            perishable_id,
            amount,
            place_bought,
            date_bought,
            date_last_use,
        }),
        _ => None,
    };

    (state, errors, valid)
}

pub fn all_perishables(conn: &mut PgConnection) -> Result<Vec<Perishable>, AppError> {
    Ok(perishables::table
        .order(perishables::title.asc())
        .select(Perishable::as_select())
        .load(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::from_fields(
            pairs
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn dates_are_optional_and_default_later() {
        let id = Uuid::new_v4();
        let f = form(&[("perishable", &id.to_string()), ("amount", "3")]);
        let (_, errors, valid) = parse_form(&f);
        assert!(errors.is_empty());
        let valid = valid.unwrap();
        assert_eq!(valid.perishable_id, id);
        assert_eq!(valid.amount, 3.0);
        assert_eq!(valid.date_bought, None);
        assert_eq!(valid.date_last_use, None);
    }

    #[test]
    fn explicit_dates_are_honored() {
        let id = Uuid::new_v4();
        let f = form(&[
            ("perishable", &id.to_string()),
            ("amount", "1.5"),
            ("date-bought", "2024-03-01"),
            ("date-last-use", "2024-03-04"),
        ]);
        let (_, errors, valid) = parse_form(&f);
        assert!(errors.is_empty());
        let valid = valid.unwrap();
        assert_eq!(
            valid.date_bought,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            valid.date_last_use,
            Some(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn missing_selection_and_amount_both_error() {
        let f = form(&[("perishable", ""), ("amount", "")]);
        let (_, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(
            errors,
            vec!["Must choose a perishable type", "Must specify an amount"]
        );
    }
}
