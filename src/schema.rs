diesel::table! {
    categories (id) {
        id -> Uuid,
        title -> Varchar,
        image -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    perishables (id) {
        id -> Uuid,
        title -> Varchar,
        measure_type -> Varchar,
        description -> Nullable<Text>,
        category_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    perishable_instances (id) {
        id -> Uuid,
        perishable_id -> Uuid,
        amount -> Double,
        place_bought -> Nullable<Varchar>,
        date_bought -> Timestamptz,
        date_last_use -> Timestamptz,
        image -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    cookware (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    cookware_instances (id) {
        id -> Uuid,
        cookware_id -> Uuid,
        description -> Nullable<Text>,
        date_bought -> Nullable<Timestamptz>,
        weight -> Nullable<Double>,
        condition -> Varchar,
        image -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipes (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        instructions -> Text,
        cookware_ids -> Array<Nullable<Uuid>>,
        ingredients -> Jsonb,
        image -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(perishables -> categories (category_id));
diesel::joinable!(perishable_instances -> perishables (perishable_id));
diesel::joinable!(cookware_instances -> cookware (cookware_id));

diesel::allow_tables_to_appear_in_same_query!(
    categories,
    perishables,
    perishable_instances,
    cookware,
    cookware_instances,
    recipes,
);
