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
use crate::models::{Condition, Cookware};
use crate::schema::cookware;
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

#[derive(Debug, Default, Serialize)]
pub struct CookwareInstanceFormState {
    pub cookware_id: String,
    pub description: String,
    pub date_bought: String,
    pub weight: String,
    pub condition: String,
    pub image: Option<String>,
}

pub struct ValidatedCookwareInstance {
    pub cookware_id: Uuid,
    pub description: Option<String>,
    pub date_bought: Option<DateTime<Utc>>,
    pub weight: Option<f64>,
    pub condition: &'static str,
}

pub fn parse_form(
    form: &FormData,
) -> (CookwareInstanceFormState, Errors, Option<ValidatedCookwareInstance>) {
    let mut errors = Errors::new();
    if let Some(msg) = &form.image_error {
        errors.push(msg.clone());
    }

    let cookware_id = forms::required_id(
        form.value("cookware"),
        "Must choose a cookware type",
        &mut errors,
    );
    let description = forms::optional_text(
        form.value("description"),
        3,
        "Description must contain at least 3 characters",
        &mut errors,
    );
    let date_bought =
        forms::optional_date(form.value("date-bought"), "Invalid date bought", &mut errors);
    let weight = forms::optional_number(form.value("weight"), "Invalid weight", &mut errors);
    let condition_raw = form.value("condition").unwrap_or("").trim().to_string();
    let condition = match Condition::parse(&condition_raw) {
        Some(c) => Some(c),
        None => {
            errors.push("Must choose a condition".to_string());
            None
        }
    };

    let state = CookwareInstanceFormState {
        cookware_id: form.value("cookware").unwrap_or("").trim().to_string(),
        description: description.clone().unwrap_or_default(),
        date_bought: form.value("date-bought").unwrap_or("").trim().to_string(),
        weight: form.value("weight").unwrap_or("").trim().to_string(),
        condition: condition_raw,
        image: None,
    };

    let valid = match (errors.is_empty(), cookware_id, condition) {
        (true, Some(cookware_id), Some(condition)) => Some(ValidatedCookwareInstance {
            cookware_id,
            description,
            date_bought,
            weight,
            condition: condition.as_str(),
        }),
        _ => None,
    };

    (state, errors, valid)
}

pub fn all_cookware(conn: &mut PgConnection) -> Result<Vec<Cookware>, AppError> {
    Ok(cookware::table
        .order(cookware::title.asc())
        .select(Cookware::as_select())
        .load(conn)?)
}

pub fn condition_names() -> Vec<&'static str> {
    Condition::ALL.iter().map(|c| c.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::from_fields(
            pairs
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn minimal_form_passes() {
        let id = Uuid::new_v4();
        let f = form(&[("cookware", &id.to_string()), ("condition", "Usable")]);
        let (_, errors, valid) = parse_form(&f);
        assert!(errors.is_empty());
        let valid = valid.unwrap();
        assert_eq!(valid.cookware_id, id);
        assert_eq!(valid.condition, "Usable");
        assert_eq!(valid.weight, None);
        assert_eq!(valid.date_bought, None);
    }

    #[test]
    fn unknown_condition_is_rejected() {
        let id = Uuid::new_v4();
        let f = form(&[("cookware", &id.to_string()), ("condition", "Broken")]);
        let (state, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(errors, vec!["Must choose a condition"]);
        assert_eq!(state.condition, "Broken");
    }

    #[test]
    fn missing_type_and_condition_both_error() {
        let f = form(&[("cookware", ""), ("condition", "")]);
        let (_, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(
            errors,
            vec!["Must choose a cookware type", "Must choose a condition"]
        );
    }
}
