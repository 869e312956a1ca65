//! Development fixtures. `--seed` wipes the six tables and repopulates
//! them, tracking generated ids in maps keyed by logical name so later
//! rows can reference earlier ones without depending on insert order.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    default_last_use, NewCategory, NewCookware, NewCookwareInstance, NewPerishable,
    NewPerishableInstance, NewRecipe, RecipeIngredient,
};
use crate::schema::{
    categories, cookware, cookware_instances, perishable_instances, perishables, recipes,
};

pub fn run(conn: &mut PgConnection) -> Result<(), AppError> {
    conn.transaction(|conn| {
        clear(conn)?;
        let category_ids = seed_categories(conn)?;
        let perishable_ids = seed_perishables(conn, &category_ids)?;
        let cookware_ids = seed_cookware(conn)?;
        seed_perishable_instances(conn, &perishable_ids)?;
        seed_cookware_instances(conn, &cookware_ids)?;
        seed_recipes(conn, &perishable_ids, &cookware_ids)?;
        Ok(())
    })
}

fn clear(conn: &mut PgConnection) -> Result<(), AppError> {
    diesel::delete(recipes::table).execute(conn)?;
    diesel::delete(perishable_instances::table).execute(conn)?;
    diesel::delete(cookware_instances::table).execute(conn)?;
    diesel::delete(perishables::table).execute(conn)?;
    diesel::delete(cookware::table).execute(conn)?;
    diesel::delete(categories::table).execute(conn)?;
    info!("cleared existing rows");
    Ok(())
}

fn seed_categories(conn: &mut PgConnection) -> Result<HashMap<&'static str, Uuid>, AppError> {
    let titles = [
        "Fruits",
        "Vegetables",
        "Meat",
        "Dairy",
        "Seasonigs",
        "Baked Goods",
    ];

    let mut ids = HashMap::new();
    for title in titles {
        let id = diesel::insert_into(categories::table)
            .values(&NewCategory { title, image: None })
            .returning(categories::id)
            .get_result::<Uuid>(conn)?;
        ids.insert(title, id);
    }
    info!(count = ids.len(), "seeded categories");
    Ok(ids)
}

fn seed_perishables(
    conn: &mut PgConnection,
    category_ids: &HashMap<&'static str, Uuid>,
) -> Result<HashMap<&'static str, Uuid>, AppError> {
    let rows: [(&str, Option<&str>, &str, Option<&str>); 15] = [
        (
            "Tomatoes",
            Some("Vegetables"),
            "weight",
            Some("Bright and slightly acidic flavor, around 22 calories per 100 grams."),
        ),
        (
            "Salt",
            None,
            "weight",
            Some("Salty flavor, virtually calorie-free as it is a mineral."),
        ),
        (
            "Beef",
            Some("Meat"),
            "weight",
            Some("Robust and savory flavor, approximately 250 calories per 100 grams."),
        ),
        (
            "Celery",
            Some("Vegetables"),
            "weight",
            Some("Crisp and mildly peppery, very low-calorie at about 16 calories per 100 grams."),
        ),
        (
            "Apples",
            Some("Fruits"),
            "weight",
            Some("Sweet and slightly tart flavor, approximately 52 calories per 100 grams."),
        ),
        (
            "Bananas",
            Some("Fruits"),
            "weight",
            Some("Sweet and creamy, around 89 calories per 100 grams."),
        ),
        (
            "Mango",
            Some("Fruits"),
            "weight",
            Some("Sweet and tropical flavor, about 60 calories per 100 grams."),
        ),
        (
            "Lettuce",
            Some("Vegetables"),
            "weight",
            Some("Mild and fresh, extremely low-calorie at about 5 calories per 100 grams."),
        ),
        (
            "Poultry",
            Some("Meat"),
            "weight",
            Some("Mild and savory, calories vary but generally range from 150 to 250 per 100 grams."),
        ),
        ("Milk", Some("Dairy"), "volume", None),
        (
            "Cheddar Cheese",
            Some("Dairy"),
            "weight",
            Some("Sharp and savory flavor, around 400 calories per 100 grams, with a significant amount of fat and protein."),
        ),
        (
            "Paprika",
            Some("Seasonigs"),
            "weight",
            Some("Mildly sweet and slightly smoky flavor, negligible in calories as it is primarily used as a seasoning."),
        ),
        (
            "Black Pepper",
            Some("Seasonigs"),
            "weight",
            Some("Pungent and mildly spicy flavor, virtually calorie-free in typical usage due to the small amounts used."),
        ),
        (
            "Sugar",
            Some("Seasonigs"),
            "weight",
            Some("Sweet flavor, high in calories at approximately 387 calories per 100 grams, serving as a common sweetener in various culinary applications."),
        ),
        (
            "Hamburger Buns",
            Some("Baked Goods"),
            "units",
            Some("Mildly sweet, around 250 calories per bun, providing a soft base for sandwiches."),
        ),
    ];

    let mut ids = HashMap::new();
    for (title, category, measure_type, description) in rows {
        let id = diesel::insert_into(perishables::table)
            .values(&NewPerishable {
                title,
                measure_type,
                description,
                category_id: category.and_then(|c| category_ids.get(c).copied()),
            })
            .returning(perishables::id)
            .get_result::<Uuid>(conn)?;
        ids.insert(title, id);
    }
    info!(count = ids.len(), "seeded perishable types");
    Ok(ids)
}

fn seed_cookware(conn: &mut PgConnection) -> Result<HashMap<&'static str, Uuid>, AppError> {
    let rows: [(&str, Option<&str>); 4] = [
        (
            "Cast Iron Skillet",
            Some("Versatile for frying, sautéing, and baking, providing even heat distribution."),
        ),
        (
            "Chef Knife",
            Some("A multipurpose knife for chopping, slicing, and dicing ingredients efficiently."),
        ),
        ("Small Saucepan", None),
        (
            "Large Saucepan",
            Some("Ideal for cooking larger batches of soups, stews, or boiling pasta."),
        ),
    ];

    let mut ids = HashMap::new();
    for (title, description) in rows {
        let id = diesel::insert_into(cookware::table)
            .values(&NewCookware { title, description })
            .returning(cookware::id)
            .get_result::<Uuid>(conn)?;
        ids.insert(title, id);
    }
    info!(count = ids.len(), "seeded cookware types");
    Ok(ids)
}

fn seed_perishable_instances(
    conn: &mut PgConnection,
    perishable_ids: &HashMap<&'static str, Uuid>,
) -> Result<(), AppError> {
    let now = Utc::now();
    let rows: [(&str, Option<i64>, Option<i64>, f64, Option<&str>); 5] = [
        ("Tomatoes", Some(0), Some(2), 500.0, Some("Rami Levi The King")),
        ("Hamburger Buns", None, None, 10.0, Some("Dabbah")),
        ("Cheddar Cheese", None, Some(10), 200.0, None),
        ("Poultry", None, None, 1500.0, Some("Keshet")),
        ("Lettuce", Some(2), None, 800.0, Some("Farmer's Market")),
    ];

    for (perishable, bought_offset, last_use_offset, amount, place_bought) in rows {
        let Some(&perishable_id) = perishable_ids.get(perishable) else {
            continue;
        };
        diesel::insert_into(perishable_instances::table)
            .values(&NewPerishableInstance {
                perishable_id,
                amount,
                place_bought,
                date_bought: bought_offset
                    .map(|d| now + Duration::days(d))
                    .unwrap_or(now),
                date_last_use: last_use_offset
                    .map(|d| now + Duration::days(d))
                    .unwrap_or_else(|| default_last_use(now)),
                image: None,
            })
            .execute(conn)?;
    }
    info!(count = rows.len(), "seeded perishables on hand");
    Ok(())
}

fn seed_cookware_instances(
    conn: &mut PgConnection,
    cookware_ids: &HashMap<&'static str, Uuid>,
) -> Result<(), AppError> {
    let now = Utc::now();
    let rows: [(&str, Option<&str>, Option<i64>, Option<f64>, &str); 6] = [
        (
            "Cast Iron Skillet",
            Some("Inherited from grandma. Will Outlive us all."),
            Some(-200_000),
            Some(2000.0),
            "Usable",
        ),
        ("Cast Iron Skillet", None, None, Some(1000.0), "Usable"),
        (
            "Small Saucepan",
            Some("About 500ml. Kinda crappy."),
            Some(-2000),
            Some(2000.0),
            "Maintenance",
        ),
        (
            "Chef Knife",
            Some("22\" sharp as a... knife."),
            Some(-1000),
            Some(300.0),
            "Usable",
        ),
        (
            "Large Saucepan",
            Some("Best for soups. Enamel coating."),
            Some(-200),
            Some(2000.0),
            "Usable",
        ),
        (
            "Large Saucepan",
            Some("Can heat in oven"),
            None,
            None,
            "No Longer Usable",
        ),
    ];

    for (cookware_type, description, bought_offset, weight, condition) in rows {
        let Some(&cookware_id) = cookware_ids.get(cookware_type) else {
            continue;
        };
        diesel::insert_into(cookware_instances::table)
            .values(&NewCookwareInstance {
                cookware_id,
                description,
                date_bought: bought_offset.map(|d| now + Duration::days(d)),
                weight,
                condition,
                image: None,
            })
            .execute(conn)?;
    }
    info!(count = rows.len(), "seeded cookware on hand");
    Ok(())
}

fn seed_recipes(
    conn: &mut PgConnection,
    perishable_ids: &HashMap<&'static str, Uuid>,
    cookware_ids: &HashMap<&'static str, Uuid>,
) -> Result<(), AppError> {
    let rows: [(&str, Option<&str>, &str, &str, &[(&str, f64)]); 2] = [
        (
            "Salad",
            Some("Can always be made."),
            "Cut Up Vegetables.\nPlate Nicely.",
            "Chef Knife",
            &[("Tomatoes", 100.0), ("Lettuce", 100.0)],
        ),
        (
            "Hamburger",
            None,
            "Mince beef and make patty.\nFry patty.\nToast bun.\nAssemble with lettuce and tomatoes on top.",
            "Cast Iron Skillet",
            &[
                ("Beef", 250.0),
                ("Hamburger Buns", 1.0),
                ("Tomatoes", 50.0),
                ("Lettuce", 50.0),
            ],
        ),
    ];

    for (title, description, instructions, cookware_type, ingredient_rows) in rows {
        let recipe_cookware: Vec<Option<Uuid>> = cookware_ids
            .get(cookware_type)
            .map(|id| vec![Some(*id)])
            .unwrap_or_default();
        let ingredients: Vec<RecipeIngredient> = ingredient_rows
            .iter()
            .filter_map(|(name, amount)| {
                perishable_ids.get(name).map(|id| RecipeIngredient {
                    perishable_id: *id,
                    amount: *amount,
                })
            })
            .collect();

        diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                title,
                description,
                instructions,
                cookware_ids: &recipe_cookware,
                ingredients: serde_json::to_value(&ingredients)?,
                image: None,
            })
            .execute(conn)?;
    }
    info!(count = rows.len(), "seeded recipes");
    Ok(())
}
