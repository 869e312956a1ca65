use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Build the connection pool and bring the schema up to date.
pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("failed to create database pool");

    let mut conn = pool
        .get()
        .expect("failed to check out a connection for migrations");
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .expect("failed to run database migrations");
    if !applied.is_empty() {
        tracing::info!("applied {} pending migration(s)", applied.len());
    }

    pool
}
