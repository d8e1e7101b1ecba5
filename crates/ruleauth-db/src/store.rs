// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed [`AuthorizationStore`].
//!
//! Expected schema (table names are configurable):
//! - groups: `id, title, status, rules`
//! - memberships: `uid, group_id`
//! - rules: `id, name, status, condition`
//! - users: any columns; every column becomes a condition attribute

use std::collections::BTreeSet;

use async_trait::async_trait;
use ruleauth_condition::{AttributeValue, UserAttributes};
use ruleauth_config::{is_sql_identifier, RuleAuthConfig, TablesConfig};
use ruleauth_core::{AuthorizationStore, GroupGrant, RuleId, RuleRecord, StoreError, UserId};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tokio::sync::OnceCell;

use crate::error::DbError;
use crate::pool::create_pool;

/// Reads groups, rules and user rows with plain SQL.
#[derive(Debug)]
pub struct SqliteAuthorizationStore {
	pool: SqlitePool,
	tables: TablesConfig,
	primary_key: OnceCell<Option<String>>,
}

impl SqliteAuthorizationStore {
	/// Create a store over an existing pool.
	///
	/// # Errors
	/// Returns `DbError::Config` if a table name is not a plain identifier.
	pub fn new(pool: SqlitePool, tables: TablesConfig) -> Result<Self, DbError> {
		tables.validate()?;
		Ok(Self {
			pool,
			tables,
			primary_key: OnceCell::new(),
		})
	}

	/// Open the configured database and build a store over it.
	pub async fn connect(config: &RuleAuthConfig) -> Result<Self, DbError> {
		let pool = create_pool(&config.database).await?;
		Self::new(pool, config.tables.clone())
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	pub fn tables(&self) -> &TablesConfig {
		&self.tables
	}

	/// Active groups `user_id` belongs to, ordered by group id.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn fetch_groups(&self, user_id: UserId) -> Result<Vec<GroupGrant>, DbError> {
		let sql = format!(
			r#"
			SELECT g.id, COALESCE(g.title, '') AS title, COALESCE(g.rules, '') AS rules
			FROM "{access}" a
			INNER JOIN "{group}" g ON a.group_id = g.id
			WHERE a.uid = ? AND g.status = 1
			ORDER BY g.id
			"#,
			access = self.tables.group_access_table,
			group = self.tables.group_table,
		);

		let rows = sqlx::query(&sql)
			.bind(user_id.get())
			.fetch_all(&self.pool)
			.await?;

		let groups = rows
			.iter()
			.map(|row| -> Result<GroupGrant, sqlx::Error> {
				Ok(GroupGrant::new(
					row.try_get::<i64, _>("id")?,
					row.try_get::<String, _>("title")?,
					row.try_get::<String, _>("rules")?,
				))
			})
			.collect::<Result<Vec<_>, sqlx::Error>>()?;

		tracing::debug!(count = groups.len(), "groups fetched");
		Ok(groups)
	}

	/// Active rules among `ids`, ordered by rule id.
	#[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
	pub async fn fetch_rules(&self, ids: &BTreeSet<RuleId>) -> Result<Vec<RuleRecord>, DbError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let placeholders = vec!["?"; ids.len()].join(", ");
		let sql = format!(
			r#"
			SELECT id, name, COALESCE("condition", '') AS "condition"
			FROM "{rule}"
			WHERE status = 1 AND id IN ({placeholders})
			ORDER BY id
			"#,
			rule = self.tables.rule_table,
		);

		let mut query = sqlx::query(&sql);
		for id in ids {
			query = query.bind(id.get());
		}
		let rows = query.fetch_all(&self.pool).await?;

		let rules = rows
			.iter()
			.map(|row| -> Result<RuleRecord, sqlx::Error> {
				Ok(RuleRecord::new(
					row.try_get::<i64, _>("id")?,
					row.try_get::<String, _>("name")?,
					row.try_get::<String, _>("condition")?,
				))
			})
			.collect::<Result<Vec<_>, sqlx::Error>>()?;

		tracing::debug!(found = rules.len(), "rules fetched");
		Ok(rules)
	}

	/// The user table's single primary key column, looked up once.
	///
	/// Tables without a declared key or with a composite key yield `None`.
	pub async fn primary_key(&self) -> Result<Option<String>, DbError> {
		let key = self
			.primary_key
			.get_or_try_init(|| self.lookup_primary_key())
			.await?;
		Ok(key.clone())
	}

	async fn lookup_primary_key(&self) -> Result<Option<String>, DbError> {
		let sql = format!(r#"PRAGMA table_info("{}")"#, self.tables.user_table);
		let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

		let mut keys = Vec::new();
		for row in &rows {
			if row.try_get::<i64, _>("pk")? > 0 {
				keys.push(row.try_get::<String, _>("name")?);
			}
		}

		let key = match keys.len() {
			1 => keys.pop(),
			_ => None,
		};
		tracing::debug!(table = %self.tables.user_table, primary_key = ?key, "primary key resolved");
		Ok(key)
	}

	/// The user row whose `primary_key` column equals `user_id`, with every
	/// column in table order.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn fetch_user(
		&self,
		user_id: UserId,
		primary_key: &str,
	) -> Result<Option<UserAttributes>, DbError> {
		if !is_sql_identifier(primary_key) {
			return Err(DbError::InvalidIdentifier(primary_key.to_string()));
		}

		let sql = format!(
			r#"SELECT * FROM "{user}" WHERE "{primary_key}" = ? LIMIT 1"#,
			user = self.tables.user_table,
		);
		let row = sqlx::query(&sql)
			.bind(user_id.get())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(row_to_attributes).transpose()
	}
}

fn row_to_attributes(row: &SqliteRow) -> Result<UserAttributes, DbError> {
	let mut attributes = UserAttributes::new();
	for column in row.columns() {
		let value = column_value(row, column.ordinal())?;
		attributes.insert(column.name(), value);
	}
	Ok(attributes)
}

fn column_value(row: &SqliteRow, index: usize) -> Result<AttributeValue, DbError> {
	let raw = row.try_get_raw(index)?;
	if raw.is_null() {
		return Ok(AttributeValue::Null);
	}

	let value = match raw.type_info().name() {
		"INTEGER" => AttributeValue::Integer(row.try_get(index)?),
		"REAL" => AttributeValue::Float(row.try_get(index)?),
		"BLOB" => {
			let bytes: Vec<u8> = row.try_get(index)?;
			AttributeValue::Text(String::from_utf8_lossy(&bytes).into_owned())
		}
		_ => AttributeValue::Text(row.try_get(index)?),
	};
	Ok(value)
}

#[async_trait]
impl AuthorizationStore for SqliteAuthorizationStore {
	async fn active_groups_for_user(&self, user_id: UserId) -> Result<Vec<GroupGrant>, StoreError> {
		Ok(self.fetch_groups(user_id).await?)
	}

	async fn active_rules_by_ids(
		&self,
		ids: &BTreeSet<RuleId>,
	) -> Result<Vec<RuleRecord>, StoreError> {
		Ok(self.fetch_rules(ids).await?)
	}

	async fn attribute_primary_key(&self) -> Result<Option<String>, StoreError> {
		Ok(self.primary_key().await?)
	}

	async fn user_attributes(
		&self,
		user_id: UserId,
		primary_key: &str,
	) -> Result<Option<UserAttributes>, StoreError> {
		Ok(self.fetch_user(user_id, primary_key).await?)
	}
}
