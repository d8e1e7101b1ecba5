// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::str::FromStr;

use ruleauth_config::DatabaseConfig;
use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use crate::error::DbError;

/// Open the configured SQLite database in WAL mode, creating the file if
/// needed.
///
/// # Errors
/// Returns `DbError::Config` for settings that fail validation,
/// `DbError::Internal` if the URL cannot be parsed and `DbError::Sqlx` if the
/// connection fails.
#[tracing::instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, DbError> {
	config.validate()?;

	let options = SqliteConnectOptions::from_str(&config.url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL '{}': {e}", config.url)))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.busy_timeout(config.busy_timeout)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(config.max_connections)
		.connect_with(options)
		.await?;

	tracing::debug!(
		url = %config.url,
		busy_timeout_ms = config.busy_timeout.as_millis() as u64,
		"database pool created"
	);
	Ok(pool)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	fn file_config(dir: &tempfile::TempDir) -> DatabaseConfig {
		DatabaseConfig {
			url: format!("sqlite:{}", dir.path().join("auth.db").display()),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn test_creates_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let config = file_config(&dir);

		let pool = create_pool(&config).await.unwrap();
		sqlx::query("SELECT 1").execute(&pool).await.unwrap();
		assert!(dir.path().join("auth.db").exists());
	}

	#[tokio::test]
	async fn test_applies_pool_size_and_busy_timeout() {
		let dir = tempfile::tempdir().unwrap();
		let config = DatabaseConfig {
			max_connections: 2,
			busy_timeout: Duration::from_millis(250),
			..file_config(&dir)
		};

		let pool = create_pool(&config).await.unwrap();
		assert_eq!(pool.options().get_max_connections(), 2);
		let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
			.fetch_one(&pool)
			.await
			.unwrap();
		assert_eq!(timeout, 250);
	}

	#[tokio::test]
	async fn test_rejects_invalid_settings_before_connecting() {
		let config = DatabaseConfig {
			max_connections: 0,
			..Default::default()
		};
		let err = create_pool(&config).await.unwrap_err();
		assert!(matches!(err, DbError::Config(_)));
	}
}
