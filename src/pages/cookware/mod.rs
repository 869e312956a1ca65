pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use axum::{routing::get, Router};
use serde::Serialize;

use crate::forms::{self, Errors, FormData};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_cookware))
        .route(
            "/create",
            get(create::create_form).post(create::create_cookware),
        )
        .route(
            "/{id}/delete",
            get(delete::delete_form).post(delete::delete_cookware),
        )
        .route(
            "/{id}/update",
            get(update::update_form).post(update::update_cookware),
        )
        .route("/{id}", get(detail::cookware_detail))
}

#[derive(Debug, Default, Serialize)]
pub struct CookwareFormState {
    pub title: String,
    pub description: String,
}

pub struct ValidatedCookware {
    pub title: String,
    pub description: Option<String>,
}

pub fn parse_form(form: &FormData) -> (CookwareFormState, Errors, Option<ValidatedCookware>) {
    let mut errors = Errors::new();

    let title = forms::required_text(
        form.value("title"),
        3,
        "Cookware type title must contain at least 3 characters",
        &mut errors,
    );
    let description = forms::optional_text(
        form.value("description"),
        3,
        "Description must contain at least 3 characters",
        &mut errors,
    );

    let state = CookwareFormState {
        title: title.clone(),
        description: description.clone().unwrap_or_default(),
    };

    let valid = if errors.is_empty() {
        Some(ValidatedCookware { title, description })
    } else {
        None
    };

    (state, errors, valid)
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
    fn title_alone_is_enough() {
        let f = form(&[("title", "Skillet"), ("description", "")]);
        let (_, errors, valid) = parse_form(&f);
        assert!(errors.is_empty());
        let valid = valid.unwrap();
        assert_eq!(valid.title, "Skillet");
        assert_eq!(valid.description, None);
    }

    #[test]
    fn short_title_is_rejected() {
        let f = form(&[("title", "Po")]);
        let (state, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(
            errors,
            vec!["Cookware type title must contain at least 3 characters"]
        );
        assert_eq!(state.title, "Po");
    }

    #[test]
    fn short_description_is_rejected() {
        let f = form(&[("title", "Skillet"), ("description", "ab")]);
        let (_, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(errors, vec!["Description must contain at least 3 characters"]);
    }
}
