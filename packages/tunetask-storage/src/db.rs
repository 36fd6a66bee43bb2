use std::{str::FromStr, time::Duration};

use sqlx::{
	SqlitePool,
	sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::{Result, schema};

/// Pooled handle to the task database. Owned by whoever builds the service; never global.
pub struct Db {
	pub pool: SqlitePool,
}
impl Db {
	pub async fn connect(cfg: &tunetask_config::Sqlite) -> Result<Self> {
		let busy_timeout = Duration::from_millis(cfg.busy_timeout_ms);
		let pool = if cfg.is_memory() {
			// Every connection to `:memory:` opens its own database, so the pool holds exactly one
			// connection for the lifetime of the handle.
			let options = SqliteConnectOptions::from_str("sqlite::memory:")?.busy_timeout(busy_timeout);

			SqlitePoolOptions::new()
				.max_connections(1)
				.min_connections(1)
				.idle_timeout(None)
				.max_lifetime(None)
				.connect_with(options)
				.await?
		} else {
			let options = SqliteConnectOptions::new()
				.filename(&cfg.path)
				.create_if_missing(true)
				.journal_mode(SqliteJournalMode::Wal)
				.busy_timeout(busy_timeout);

			SqlitePoolOptions::new().max_connections(cfg.pool_max_conns).connect_with(options).await?
		};

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let mut tx = self.pool.begin().await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
