//! Write and read operations over the contacts store.
//!
//! Every write validates its form first, then runs in one transaction on a
//! pooled connection. A rejected form performs no writes.

mod companies;
mod details;
mod groups;
mod locations;
mod notes;
mod people;
mod special_dates;

pub use details::{DetailFormSets, OwnerDetails};
pub use groups::GroupMembers;
pub use locations::DEFAULT_LOCATIONS;

use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{error, warn};

use super::error::ContactsError;
use crate::core::config::ContactsConfig;
use crate::core::shared::utils::{create_conn, run_migrations, DbConn, DbPool};

#[derive(Clone)]
pub struct ContactsService {
    pool: DbPool,
}

impl std::fmt::Debug for ContactsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactsService")
            .field("pool_size", &self.pool.max_size())
            .finish()
    }
}

impl ContactsService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open the configured database, applying migrations when enabled.
    pub fn from_config(config: &ContactsConfig) -> Result<Self, ContactsError> {
        let pool = create_conn(config)?;
        if config.database.run_migrations {
            run_migrations(&pool).map_err(|e| ContactsError::Migration(e.to_string()))?;
        }
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn conn(&self) -> Result<DbConn, ContactsError> {
        self.pool.get().map_err(|e| {
            error!("Failed to get database connection: {e}");
            ContactsError::from(e)
        })
    }

    fn read<T, F>(&self, f: F) -> Result<T, ContactsError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ContactsError>,
    {
        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        f(conn)
    }

    /// Run `f` in a transaction. Validation failures are logged as warnings,
    /// database failures as errors.
    fn write<T, F>(&self, action: &str, f: F) -> Result<T, ContactsError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ContactsError>,
    {
        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        conn.transaction(f).inspect_err(|e| {
            if e.is_user_error() {
                warn!("Rejected {action}: {e}");
            } else {
                error!("Failed to {action}: {e}");
            }
        })
    }
}
