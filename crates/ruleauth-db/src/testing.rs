// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema and seed helpers for tests against an in-memory database.

use std::str::FromStr;

use ruleauth_config::TablesConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::DbError;

/// Single-connection in-memory pool. Every connection to `:memory:` is a
/// separate database, so the pool never opens a second one.
pub async fn create_test_pool() -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(":memory:")?;
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect_with(options)
		.await?;
	Ok(pool)
}

/// Creates the rule, group and membership tables under the configured names.
pub async fn create_auth_tables(pool: &SqlitePool, tables: &TablesConfig) -> Result<(), DbError> {
	tables.validate()?;

	sqlx::query(&format!(
		r#"
		CREATE TABLE IF NOT EXISTS "{}" (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			name TEXT NOT NULL UNIQUE,
			title TEXT NOT NULL DEFAULT '',
			status INTEGER NOT NULL DEFAULT 1,
			condition TEXT NOT NULL DEFAULT ''
		)
		"#,
		tables.rule_table
	))
	.execute(pool)
	.await?;

	sqlx::query(&format!(
		r#"
		CREATE TABLE IF NOT EXISTS "{}" (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			title TEXT NOT NULL DEFAULT '',
			status INTEGER NOT NULL DEFAULT 1,
			rules TEXT NOT NULL DEFAULT ''
		)
		"#,
		tables.group_table
	))
	.execute(pool)
	.await?;

	sqlx::query(&format!(
		r#"
		CREATE TABLE IF NOT EXISTS "{}" (
			uid INTEGER NOT NULL,
			group_id INTEGER NOT NULL,
			UNIQUE(uid, group_id)
		)
		"#,
		tables.group_access_table
	))
	.execute(pool)
	.await?;

	Ok(())
}

/// Creates a user table keyed by `uid` with a mix of column types.
pub async fn create_user_table(pool: &SqlitePool, table: &str) -> Result<(), DbError> {
	if !ruleauth_config::is_sql_identifier(table) {
		return Err(DbError::InvalidIdentifier(table.to_string()));
	}

	sqlx::query(&format!(
		r#"
		CREATE TABLE IF NOT EXISTS "{table}" (
			uid INTEGER PRIMARY KEY,
			name TEXT NOT NULL,
			score INTEGER NOT NULL DEFAULT 0,
			balance REAL,
			title TEXT
		)
		"#
	))
	.execute(pool)
	.await?;

	Ok(())
}

/// In-memory pool with the default table names created.
pub async fn create_auth_test_pool() -> Result<SqlitePool, DbError> {
	let tables = TablesConfig::default();
	let pool = create_test_pool().await?;
	create_auth_tables(&pool, &tables).await?;
	create_user_table(&pool, &tables.user_table).await?;
	Ok(pool)
}

pub async fn insert_rule(
	pool: &SqlitePool,
	tables: &TablesConfig,
	id: i64,
	name: &str,
	condition: &str,
	active: bool,
) -> Result<(), DbError> {
	sqlx::query(&format!(
		r#"INSERT INTO "{}" (id, name, status, condition) VALUES (?, ?, ?, ?)"#,
		tables.rule_table
	))
	.bind(id)
	.bind(name)
	.bind(i64::from(active))
	.bind(condition)
	.execute(pool)
	.await?;
	Ok(())
}

pub async fn insert_group(
	pool: &SqlitePool,
	tables: &TablesConfig,
	id: i64,
	title: &str,
	rules: &str,
	active: bool,
) -> Result<(), DbError> {
	sqlx::query(&format!(
		r#"INSERT INTO "{}" (id, title, status, rules) VALUES (?, ?, ?, ?)"#,
		tables.group_table
	))
	.bind(id)
	.bind(title)
	.bind(i64::from(active))
	.bind(rules)
	.execute(pool)
	.await?;
	Ok(())
}

pub async fn insert_membership(
	pool: &SqlitePool,
	tables: &TablesConfig,
	uid: i64,
	group_id: i64,
) -> Result<(), DbError> {
	sqlx::query(&format!(
		r#"INSERT INTO "{}" (uid, group_id) VALUES (?, ?)"#,
		tables.group_access_table
	))
	.bind(uid)
	.bind(group_id)
	.execute(pool)
	.await?;
	Ok(())
}

pub async fn insert_user(
	pool: &SqlitePool,
	tables: &TablesConfig,
	uid: i64,
	name: &str,
	score: i64,
) -> Result<(), DbError> {
	sqlx::query(&format!(
		r#"INSERT INTO "{}" (uid, name, score) VALUES (?, ?, ?)"#,
		tables.user_table
	))
	.bind(uid)
	.bind(name)
	.bind(score)
	.execute(pool)
	.await?;
	Ok(())
}
