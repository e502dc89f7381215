//! Database module
//!
//! This module handles database connections, migrations, repositories and the
//! session store the engine writes through.

pub mod connection;
pub mod repositories;
pub mod store;

use sqlx::PgPool;

pub use connection::*;
pub use store::{MemoryStore, PgStore, SessionStore};
#[cfg(test)]
pub use store::MockSessionStore;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
