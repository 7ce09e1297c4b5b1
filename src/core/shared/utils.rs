use crate::core::config::ContactsConfig;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};
use unicode_normalization::UnicodeNormalization;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite leaves foreign keys off per connection, so every pooled connection
/// switches them on before use.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        diesel::sql_query("PRAGMA busy_timeout = 5000")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

pub fn create_conn(config: &ContactsConfig) -> Result<DbPool, diesel::r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(config.database.url.as_str());
    let builder = Pool::builder().connection_customizer(Box::new(SqlitePragmas));

    // Each in-memory connection is its own database: keep exactly one alive.
    let builder = if config.is_in_memory() {
        builder
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        builder.max_size(config.database.pool_size)
    };

    debug!("Opening database pool for {}", config.database.url);
    builder.build(manager)
}

/// Run database migrations
pub fn run_migrations(pool: &DbPool) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in &applied {
        info!("Applied migration {version}");
    }
    Ok(applied.len())
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Generate a URL-safe slug from a name. Accented letters lose their marks;
/// anything else outside ASCII is dropped.
pub fn slugify(name: &str) -> String {
    name.nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else if c.is_whitespace() || c == '-' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalise an optional free-text input: blank becomes `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Acme"), "acme");
        assert_eq!(slugify("Acme  Widgets, Inc."), "acme-widgets-inc");
        assert_eq!(slugify("  --Hello--World-- "), "hello-world");
        assert_eq!(slugify("snake_case name"), "snake_case-name");
        assert_eq!(slugify("Zoë Ärger"), "zoe-arger");
        assert_eq!(slugify("Müller"), "muller");
        assert_eq!(slugify("ﬁne\u{a0}Café"), "fine-cafe");
        assert_eq!(slugify("株式会社"), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ")), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_in_memory_pool_runs_migrations() {
        let pool = create_conn(&ContactsConfig::in_memory()).expect("pool");
        let applied = run_migrations(&pool).expect("migrations");
        assert_eq!(applied, 1);
        assert_eq!(run_migrations(&pool).expect("second run"), 0);
    }
}
