//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables are generated
//! from the entity definitions with `Schema::create_table_from_entity`, so the schema always
//! matches the Rust structs. The tracker only reads these tables; creation exists so a fresh
//! database (or a test database) can be bootstrapped.

use crate::config::settings::Settings;
use crate::entities::{BankAccount, BankAccountBalance, Currency, Payable, PaymentRecord};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Used when neither `DATABASE_URL` nor the settings file name a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/ap_tracker.sqlite?mode=rwc";

/// Resolves the database URL: `DATABASE_URL` from the environment wins, then the settings
/// file, then [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn get_database_url(settings: &Settings) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| settings.database_url.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;
    info!("Database connection established");
    Ok(db)
}

/// Creates every table the tracker reads, skipping those that already exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Currency).await?;
    create_table(db, Payable).await?;
    create_table(db, PaymentRecord).await?;
    create_table(db, BankAccount).await?;
    create_table(db, BankAccountBalance).await?;
    info!("Database tables ready");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
