pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use axum::{routing::get, Router};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::forms::{self, Errors, FormData};
use crate::models::{Category, MeasureType};
use crate::schema::categories;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_perishables))
        .route(
            "/create",
            get(create::create_form).post(create::create_perishable),
        )
        .route(
            "/{id}/delete",
            get(delete::delete_form).post(delete::delete_perishable),
        )
        .route(
            "/{id}/update",
            get(update::update_form).post(update::update_perishable),
        )
        .route("/{id}", get(detail::perishable_detail))
}

#[derive(Debug, Default, Serialize)]
pub struct PerishableFormState {
    pub title: String,
    pub description: String,
    pub measure_type: String,
    pub category_id: String,
}

pub struct ValidatedPerishable {
    pub title: String,
    pub description: Option<String>,
    pub measure_type: &'static str,
    pub category_id: Option<Uuid>,
}

/// Apply the perishable-type form rules, returning both the entered
/// state (for re-rendering) and, when everything passed, the validated
/// values.
pub fn parse_form(form: &FormData) -> (PerishableFormState, Errors, Option<ValidatedPerishable>) {
    let mut errors = Errors::new();

    let title = forms::required_text(
        form.value("title"),
        3,
        "Title must contain at least 3 characters",
        &mut errors,
    );
    let description = forms::optional_text(
        form.value("description"),
        3,
        "Description must contain at least 3 characters",
        &mut errors,
    );
    let measure_raw = form.value("measure-type").unwrap_or("").trim().to_string();
    let measure_type = match MeasureType::parse(&measure_raw) {
        Some(m) => Some(m),
        None => {
            errors.push("Must choose a measurement type".to_string());
            None
        }
    };
    let category_id = forms::optional_id(form.value("category"), "Invalid category", &mut errors);

    let state = PerishableFormState {
        title: title.clone(),
        description: description.clone().unwrap_or_default(),
        measure_type: measure_raw,
        category_id: form.value("category").unwrap_or("").trim().to_string(),
    };

    let valid = if errors.is_empty() {
        measure_type.map(|m| ValidatedPerishable {
            title,
            description,
            measure_type: m.as_str(),
            category_id,
        })
    } else {
        None
    };

    (state, errors, valid)
}

pub fn all_categories(conn: &mut PgConnection) -> Result<Vec<Category>, AppError> {
    Ok(categories::table
        .order(categories::title.asc())
        .select(Category::as_select())
        .load(conn)?)
}

pub fn measure_type_names() -> Vec<&'static str> {
    MeasureType::ALL.iter().map(|m| m.as_str()).collect()
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
    fn valid_form_passes() {
        let id = Uuid::new_v4();
        let f = form(&[
            ("title", " Apples "),
            ("description", "Crisp ones"),
            ("measure-type", "weight"),
            ("category", &id.to_string()),
        ]);
        let (state, errors, valid) = parse_form(&f);
        assert!(errors.is_empty());
        let valid = valid.unwrap();
        assert_eq!(valid.title, "Apples");
        assert_eq!(valid.measure_type, "weight");
        assert_eq!(valid.category_id, Some(id));
        assert_eq!(state.title, "Apples");
    }

    #[test]
    fn short_title_is_rejected_but_kept_for_rerender() {
        let f = form(&[("title", "ab"), ("measure-type", "units")]);
        let (state, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(errors, vec!["Title must contain at least 3 characters"]);
        assert_eq!(state.title, "ab");
    }

    #[test]
    fn measurement_type_is_mandatory() {
        let f = form(&[("title", "Apples"), ("measure-type", "")]);
        let (_, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(errors, vec!["Must choose a measurement type"]);
    }

    #[test]
    fn empty_category_means_none() {
        let f = form(&[("title", "Apples"), ("measure-type", "volume"), ("category", "")]);
        let (_, errors, valid) = parse_form(&f);
        assert!(errors.is_empty());
        assert_eq!(valid.unwrap().category_id, None);
    }
}
