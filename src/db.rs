use rocket_db_pools::{sqlx, Database};
use sqlx::migrate::Migrator;
use sqlx::PgPool;

#[derive(Database)]
#[database("placeload")]
pub struct PlaceloadDb(sqlx::PgPool);

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply any pending migrations. Idempotent; already-applied migrations are
/// skipped and checksum drift aborts startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    log::info!("checking database migration state");

    MIGRATOR.run(pool).await?;

    log::info!("database migrations up to date");
    Ok(())
}
