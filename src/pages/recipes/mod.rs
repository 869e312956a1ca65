pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use axum::{routing::get, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::forms::{self, Errors, FormData};
use crate::models::RecipeIngredient;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes))
        .route(
            "/create",
            get(create::create_form).post(create::create_recipe),
        )
        .route(
            "/{id}/delete",
            get(delete::delete_form).post(delete::delete_recipe),
        )
        .route(
            "/{id}/update",
            get(update::update_form).post(update::update_recipe),
        )
        .route("/{id}", get(detail::recipe_detail))
}

/// One ingredient row as entered, raw strings for re-rendering.
#[derive(Debug, Default, Clone, Serialize)]
pub struct IngredientEntry {
    pub perishable: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeFormState {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub cookware_ids: Vec<String>,
    pub ingredients: Vec<IngredientEntry>,
    pub image: Option<String>,
}

impl Default for RecipeFormState {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            instructions: String::new(),
            cookware_ids: Vec::new(),
            // The form's row-cloning script needs at least one row to copy
            ingredients: vec![IngredientEntry::default()],
            image: None,
        }
    }
}

pub struct ValidatedRecipe {
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub cookware_ids: Vec<Uuid>,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Pair the repeated `ingredients[][perishable]` and
/// `ingredients[][amount]` parameters positionally, padding the shorter
/// list, and drop rows where both halves are empty.
fn ingredient_rows(form: &FormData) -> Vec<IngredientEntry> {
    let perishables = form.values("ingredients[][perishable]");
    let amounts = form.values("ingredients[][amount]");
    let len = perishables.len().max(amounts.len());

    (0..len)
        .map(|i| IngredientEntry {
            perishable: perishables.get(i).unwrap_or(&"").trim().to_string(),
            amount: amounts.get(i).unwrap_or(&"").trim().to_string(),
        })
        .filter(|row| !row.perishable.is_empty() || !row.amount.is_empty())
        .collect()
}

pub fn parse_form(form: &FormData) -> (RecipeFormState, Errors, Option<ValidatedRecipe>) {
    let mut errors = Errors::new();
    if let Some(msg) = &form.image_error {
        errors.push(msg.clone());
    }

    let title = forms::required_text(form.value("title"), 1, "Title must not be empty.", &mut errors);
    let description = forms::optional_text(
        form.value("description"),
        3,
        "Description must contain at least 3 characters",
        &mut errors,
    );
    let instructions = forms::required_text(
        form.value("instructions"),
        5,
        "Instructions must contain at least 5 characters",
        &mut errors,
    );

    let cookware_raw: Vec<String> = form
        .values("cookware[]")
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    let mut cookware_ids = Vec::with_capacity(cookware_raw.len());
    for value in &cookware_raw {
        match value.parse::<Uuid>() {
            Ok(id) => cookware_ids.push(id),
            Err(_) => errors.push("Cookware must be selected or removed".to_string()),
        }
    }

    let rows = ingredient_rows(form);
    if rows.is_empty() {
        errors.push("Must contain at least one ingredient".to_string());
    }
    let mut ingredients = Vec::with_capacity(rows.len());
    for row in &rows {
        let perishable_id = match row.perishable.parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push("Perishable must be selected or removed".to_string());
                None
            }
        };
        let amount = match row.amount.parse::<f64>() {
            Ok(a) if a != 0.0 => Some(a),
            _ => {
                errors.push("Amount must not be empty or 0".to_string());
                None
            }
        };
        if let (Some(perishable_id), Some(amount)) = (perishable_id, amount) {
            ingredients.push(RecipeIngredient {
                perishable_id,
                amount,
            });
        }
    }

    let state = RecipeFormState {
        title: title.clone(),
        description: description.clone().unwrap_or_default(),
        instructions: instructions.clone(),
        cookware_ids: cookware_raw,
        ingredients: if rows.is_empty() {
            vec![IngredientEntry::default()]
        } else {
            rows
        },
        image: None,
    };

    let valid = if errors.is_empty() {
        Some(ValidatedRecipe {
            title,
            description,
            instructions,
            cookware_ids,
            ingredients,
        })
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
    fn full_recipe_passes() {
        let perishable = Uuid::new_v4();
        let pan = Uuid::new_v4();
        let f = form(&[
            ("title", "Pancakes"),
            ("description", "Weekend staple"),
            ("instructions", "Mix everything, then fry."),
            ("cookware[]", &pan.to_string()),
            ("ingredients[][perishable]", &perishable.to_string()),
            ("ingredients[][amount]", "2.5"),
        ]);
        let (_, errors, valid) = parse_form(&f);
        assert!(errors.is_empty());
        let valid = valid.unwrap();
        assert_eq!(valid.title, "Pancakes");
        assert_eq!(valid.cookware_ids, vec![pan]);
        assert_eq!(
            valid.ingredients,
            vec![RecipeIngredient {
                perishable_id: perishable,
                amount: 2.5
            }]
        );
    }

    #[test]
    fn no_ingredient_rows_is_an_error() {
        let f = form(&[
            ("title", "Pancakes"),
            ("instructions", "Mix everything, then fry."),
        ]);
        let (state, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(errors, vec!["Must contain at least one ingredient"]);
        // The re-rendered form still gets one row to clone
        assert_eq!(state.ingredients.len(), 1);
    }

    #[test]
    fn blank_rows_are_dropped_but_half_filled_rows_error() {
        let perishable = Uuid::new_v4();
        let f = form(&[
            ("title", "Pancakes"),
            ("instructions", "Mix everything, then fry."),
            ("ingredients[][perishable]", &perishable.to_string()),
            ("ingredients[][amount]", "1"),
            ("ingredients[][perishable]", ""),
            ("ingredients[][amount]", ""),
            ("ingredients[][perishable]", ""),
            ("ingredients[][amount]", "3"),
        ]);
        let (state, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(errors, vec!["Perishable must be selected or removed"]);
        assert_eq!(state.ingredients.len(), 2);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let perishable = Uuid::new_v4();
        let f = form(&[
            ("title", "Pancakes"),
            ("instructions", "Mix everything, then fry."),
            ("ingredients[][perishable]", &perishable.to_string()),
            ("ingredients[][amount]", "0"),
        ]);
        let (_, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(errors, vec!["Amount must not be empty or 0"]);
    }

    #[test]
    fn empty_title_and_short_instructions() {
        let perishable = Uuid::new_v4();
        let f = form(&[
            ("title", "  "),
            ("instructions", "Mix"),
            ("ingredients[][perishable]", &perishable.to_string()),
            ("ingredients[][amount]", "1"),
        ]);
        let (_, errors, valid) = parse_form(&f);
        assert!(valid.is_none());
        assert_eq!(
            errors,
            vec![
                "Title must not be empty.",
                "Instructions must contain at least 5 characters"
            ]
        );
    }
}
