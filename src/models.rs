use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a perishable type is measured out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureType {
    Weight,
    Volume,
    Units,
}

impl MeasureType {
    pub const ALL: [MeasureType; 3] = [MeasureType::Weight, MeasureType::Volume, MeasureType::Units];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureType::Weight => "weight",
            MeasureType::Volume => "volume",
            MeasureType::Units => "units",
        }
    }

    pub fn parse(s: &str) -> Option<MeasureType> {
        Self::ALL.iter().copied().find(|m| m.as_str() == s)
    }
}

/// Condition of an individual piece of cookware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Usable,
    Maintenance,
    NoLongerUsable,
}

impl Condition {
    pub const ALL: [Condition; 3] = [
        Condition::Usable,
        Condition::Maintenance,
        Condition::NoLongerUsable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Usable => "Usable",
            Condition::Maintenance => "Maintenance",
            Condition::NoLongerUsable => "No Longer Usable",
        }
    }

    pub fn parse(s: &str) -> Option<Condition> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

/// Default last-use date for a newly bought perishable: a week from now.
pub fn default_last_use(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(7)
}

#[derive(Queryable, Selectable, Debug, Serialize)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(treat_none_as_null = true)]
pub struct NewCategory<'a> {
    pub title: &'a str,
    pub image: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug, Serialize)]
#[diesel(table_name = crate::schema::perishables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Perishable {
    pub id: Uuid,
    pub title: String,
    pub measure_type: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::perishables)]
#[diesel(treat_none_as_null = true)]
pub struct NewPerishable<'a> {
    pub title: &'a str,
    pub measure_type: &'a str,
    pub description: Option<&'a str>,
    pub category_id: Option<Uuid>,
}

#[derive(Queryable, Selectable, Debug, Serialize)]
#[diesel(table_name = crate::schema::perishable_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PerishableInstance {
    pub id: Uuid,
    pub perishable_id: Uuid,
    pub amount: f64,
    pub place_bought: Option<String>,
    pub date_bought: DateTime<Utc>,
    pub date_last_use: DateTime<Utc>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PerishableInstance {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.date_last_use < now
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::perishable_instances)]
#[diesel(treat_none_as_null = true)]
pub struct NewPerishableInstance<'a> {
    pub perishable_id: Uuid,
    pub amount: f64,
    pub place_bought: Option<&'a str>,
    pub date_bought: DateTime<Utc>,
    pub date_last_use: DateTime<Utc>,
    pub image: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug, Serialize)]
#[diesel(table_name = crate::schema::cookware)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Cookware {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::cookware)]
#[diesel(treat_none_as_null = true)]
pub struct NewCookware<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug, Serialize)]
#[diesel(table_name = crate::schema::cookware_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CookwareInstance {
    pub id: Uuid,
    pub cookware_id: Uuid,
    pub description: Option<String>,
    pub date_bought: Option<DateTime<Utc>>,
    pub weight: Option<f64>,
    pub condition: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::cookware_instances)]
#[diesel(treat_none_as_null = true)]
pub struct NewCookwareInstance<'a> {
    pub cookware_id: Uuid,
    pub description: Option<&'a str>,
    pub date_bought: Option<DateTime<Utc>>,
    pub weight: Option<f64>,
    pub condition: &'a str,
    pub image: Option<&'a str>,
}

/// One ingredient line of a recipe, stored inside the recipe's JSONB column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub perishable_id: Uuid,
    pub amount: f64,
}

#[derive(Queryable, Selectable, Debug, Serialize)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub cookware_ids: Vec<Option<Uuid>>,
    pub ingredients: serde_json::Value,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    pub fn parsed_ingredients(&self) -> Vec<RecipeIngredient> {
        serde_json::from_value(self.ingredients.clone()).unwrap_or_default()
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct NewRecipe<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub instructions: &'a str,
    pub cookware_ids: &'a [Option<Uuid>],
    pub ingredients: serde_json::Value,
    pub image: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_last_use_is_a_week_out() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        assert_eq!(default_last_use(now), expected);
    }

    #[test]
    fn measure_type_round_trips() {
        for m in MeasureType::ALL {
            assert_eq!(MeasureType::parse(m.as_str()), Some(m));
        }
        assert_eq!(MeasureType::parse("pints"), None);
    }

    #[test]
    fn condition_round_trips() {
        for c in Condition::ALL {
            assert_eq!(Condition::parse(c.as_str()), Some(c));
        }
        assert_eq!(Condition::parse("usable"), None);
    }

    #[test]
    fn expiry_compares_last_use_against_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let instance = PerishableInstance {
            id: Uuid::new_v4(),
            perishable_id: Uuid::new_v4(),
            amount: 1.0,
            place_bought: None,
            date_bought: now,
            date_last_use: now - Duration::hours(1),
            image: None,
            created_at: now,
        };
        assert!(instance.is_expired(now));
        assert!(!instance.is_expired(now - Duration::hours(2)));
    }

    #[test]
    fn recipe_ingredients_parse_from_jsonb() {
        let id = Uuid::new_v4();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: "Test".into(),
            description: None,
            instructions: "Cook it".into(),
            cookware_ids: vec![],
            ingredients: serde_json::json!([{ "perishable_id": id, "amount": 2.5 }]),
            image: None,
            created_at: Utc::now(),
        };
        assert_eq!(
            recipe.parsed_ingredients(),
            vec![RecipeIngredient {
                perishable_id: id,
                amount: 2.5
            }]
        );
    }
}
