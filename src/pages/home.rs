use axum::{extract::State, response::Response};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use tera::Context;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Condition;
use crate::pages::render;
use crate::schema::{cookware, cookware_instances, perishable_instances, perishables, recipes};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct InstanceSummary {
    pub id: Uuid,
    pub title: String,
    pub date_last_use: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CookwareSummary {
    pub id: Uuid,
    pub title: String,
    pub condition: String,
}

#[derive(Debug, Serialize)]
struct RecipeSummary {
    id: Uuid,
    title: String,
}

/// Split perishable purchases into still-good and expired, preserving
/// the incoming order (already sorted by use-by date).
pub fn split_by_expiry(
    instances: Vec<InstanceSummary>,
    now: DateTime<Utc>,
) -> (Vec<InstanceSummary>, Vec<InstanceSummary>) {
    instances
        .into_iter()
        .partition(|i| i.date_last_use >= now)
}

/// Group cookware by condition. Rows with an unknown condition value are
/// dropped rather than guessed at.
pub fn split_by_condition(
    instances: Vec<CookwareSummary>,
) -> (Vec<CookwareSummary>, Vec<CookwareSummary>, Vec<CookwareSummary>) {
    let mut usable = Vec::new();
    let mut maintenance = Vec::new();
    let mut not_usable = Vec::new();
    for instance in instances {
        match Condition::parse(&instance.condition) {
            Some(Condition::Usable) => usable.push(instance),
            Some(Condition::Maintenance) => maintenance.push(instance),
            Some(Condition::NoLongerUsable) => not_usable.push(instance),
            None => {}
        }
    }
    (usable, maintenance, not_usable)
}

pub async fn index(State(app): State<AppState>) -> Result<Response, AppError> {
    let mut conn = app.pool.get()?;

    let perishable_rows: Vec<(Uuid, String, DateTime<Utc>)> = perishable_instances::table
        .inner_join(perishables::table)
        .order(perishable_instances::date_last_use.asc())
        .select((
            perishable_instances::id,
            perishables::title,
            perishable_instances::date_last_use,
        ))
        .load(&mut conn)?;

    let cookware_rows: Vec<(Uuid, String, String)> = cookware_instances::table
        .inner_join(cookware::table)
        .order(cookware::title.asc())
        .select((
            cookware_instances::id,
            cookware::title,
            cookware_instances::condition,
        ))
        .load(&mut conn)?;

    let recipe_rows: Vec<(Uuid, String)> = recipes::table
        .order(recipes::title.asc())
        .select((recipes::id, recipes::title))
        .load(&mut conn)?;

    let (fresh, expired) = split_by_expiry(
        perishable_rows
            .into_iter()
            .map(|(id, title, date_last_use)| InstanceSummary {
                id,
                title,
                date_last_use,
            })
            .collect(),
        Utc::now(),
    );

    let (usable, maintenance, not_usable) = split_by_condition(
        cookware_rows
            .into_iter()
            .map(|(id, title, condition)| CookwareSummary {
                id,
                title,
                condition,
            })
            .collect(),
    );

    let recipes_list: Vec<RecipeSummary> = recipe_rows
        .into_iter()
        .map(|(id, title)| RecipeSummary { id, title })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("title", "Home page");
    ctx.insert("before_last_date_perishables", &fresh);
    ctx.insert("after_last_date_perishables", &expired);
    ctx.insert("usable_cookware", &usable);
    ctx.insert("maintenance_cookware", &maintenance);
    ctx.insert("not_usable_cookware", &not_usable);
    ctx.insert("recipes_list", &recipes_list);
    render("index.html", &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn summary(title: &str, date_last_use: DateTime<Utc>) -> InstanceSummary {
        InstanceSummary {
            id: Uuid::new_v4(),
            title: title.to_string(),
            date_last_use,
        }
    }

    #[test]
    fn expiry_split_uses_now_as_the_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let (fresh, expired) = split_by_expiry(
            vec![
                summary("old milk", now - Duration::days(1)),
                summary("exactly due", now),
                summary("apples", now + Duration::days(3)),
            ],
            now,
        );
        assert_eq!(
            expired.iter().map(|i| i.title.as_str()).collect::<Vec<_>>(),
            vec!["old milk"]
        );
        assert_eq!(
            fresh.iter().map(|i| i.title.as_str()).collect::<Vec<_>>(),
            vec!["exactly due", "apples"]
        );
    }

    #[test]
    fn condition_split_covers_all_three_buckets() {
        let rows = ["Usable", "Maintenance", "No Longer Usable", "Usable", "???"]
            .iter()
            .map(|c| CookwareSummary {
                id: Uuid::new_v4(),
                title: "Pan".to_string(),
                condition: c.to_string(),
            })
            .collect();
        let (usable, maintenance, not_usable) = split_by_condition(rows);
        assert_eq!(usable.len(), 2);
        assert_eq!(maintenance.len(), 1);
        assert_eq!(not_usable.len(), 1);
    }
}
