//! Пул соединений sea-orm для базы рецептов.
//!
//! Бэкенд определяется схемой `DATABASE_URL` (`mysql://`, `postgres://`,
//! `sqlite:`). Размер пула и таймауты переопределяются через
//! `DATABASE_MAX_CONNECTIONS`, `DATABASE_MIN_CONNECTIONS`,
//! `DATABASE_CONNECT_TIMEOUT_SECS`, `DATABASE_ACQUIRE_TIMEOUT_SECS`,
//! `DATABASE_IDLE_TIMEOUT_SECS` и `DATABASE_SQL_LOG`.

use std::{env, io, time::Duration};

use anyhow::Context;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use url::Url;

use crate::config::DatabaseSettings;

pub type DB = DatabaseConnection;

const POOL_MAX_CONNECTIONS: u32 = 20;
const POOL_MIN_CONNECTIONS: u32 = 2;
const POOL_TIMEOUT_SECS: u64 = 8;
const POOL_IDLE_SECS: u64 = 600;

impl DatabaseSettings {
    /// `sqlite::memory:` существует только внутри одного соединения.
    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with("sqlite:") && self.url.contains(":memory:")
    }

    pub fn pool_options(&self) -> ConnectOptions {
        let (max, min) = if self.is_in_memory() {
            (1, 1)
        } else {
            let max = self.max_connections.unwrap_or(POOL_MAX_CONNECTIONS);
            (max, self.min_connections.unwrap_or(POOL_MIN_CONNECTIONS).min(max))
        };
        let secs = |value: Option<u64>, default: u64| Duration::from_secs(value.unwrap_or(default));

        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(max)
            .min_connections(min)
            .connect_timeout(secs(self.connect_timeout_secs, POOL_TIMEOUT_SECS))
            .acquire_timeout(secs(self.acquire_timeout_secs, POOL_TIMEOUT_SECS))
            .idle_timeout(secs(self.idle_timeout_secs, POOL_IDLE_SECS))
            .sqlx_logging(self.sql_log.unwrap_or(false));
        options
    }

    /// URL для логов, пароль скрыт.
    pub fn redacted_url(&self) -> String {
        match Url::parse(&self.url) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.to_string()
            }
            Err(_) => "<unparsable DATABASE_URL>".to_string(),
        }
    }
}

/// Connects using `DATABASE_URL` and the pool variables above.
pub async fn connect() -> io::Result<DB> {
    let url = env::var("DATABASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "DATABASE_URL must point at the recipe database (mysql://, postgres:// or sqlite:)",
        )
    })?;
    connect_with_settings(&DatabaseSettings::default_from_url(url)).await
}

/// Opens the pool and checks it answers before handing it out.
pub async fn connect_with_settings(settings: &DatabaseSettings) -> io::Result<DB> {
    let target = settings.redacted_url();
    let db = Database::connect(settings.pool_options())
        .await
        .map_err(|e| io::Error::other(format!("cannot open {}: {}", target, e)))?;
    ping(&db)
        .await
        .map_err(|e| io::Error::other(format!("{}: {:#}", target, e)))?;

    log::info!("{:?} database ready at {}", db.get_database_backend(), target);
    Ok(db)
}

pub async fn ping(db: &DB) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "SELECT 1"))
        .await
        .with_context(|| format!("{:?} did not answer SELECT 1", backend))?;
    Ok(())
}
