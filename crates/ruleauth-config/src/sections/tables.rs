// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Table names used by the SQL store.
//!
//! Names are interpolated into SQL, so [`TablesConfig::validate`] rejects
//! anything that is not a plain identifier.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_GROUP_TABLE: &str = "auth_group";
pub const DEFAULT_GROUP_ACCESS_TABLE: &str = "auth_group_access";
pub const DEFAULT_RULE_TABLE: &str = "auth_rule";
pub const DEFAULT_USER_TABLE: &str = "user";

/// Table configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablesConfig {
	/// Groups: `id, title, status, rules`.
	pub group_table: String,
	/// Memberships: `uid, group_id`.
	pub group_access_table: String,
	/// Rules: `id, name, title, status, condition`.
	pub rule_table: String,
	/// Source of the attributes conditions refer to.
	pub user_table: String,
}

impl Default for TablesConfig {
	fn default() -> Self {
		Self {
			group_table: DEFAULT_GROUP_TABLE.to_string(),
			group_access_table: DEFAULT_GROUP_ACCESS_TABLE.to_string(),
			rule_table: DEFAULT_RULE_TABLE.to_string(),
			user_table: DEFAULT_USER_TABLE.to_string(),
		}
	}
}

impl TablesConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (key, name) in [
			("tables.group_table", &self.group_table),
			("tables.group_access_table", &self.group_access_table),
			("tables.rule_table", &self.rule_table),
			("tables.user_table", &self.user_table),
		] {
			if !is_sql_identifier(name) {
				return Err(ConfigError::Validation(format!(
					"{key} must be a plain SQL identifier, got '{name}'"
				)));
			}
		}
		Ok(())
	}
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_sql_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		_ => false,
	}
}

/// Table configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TablesConfigLayer {
	#[serde(default)]
	pub group_table: Option<String>,
	#[serde(default)]
	pub group_access_table: Option<String>,
	#[serde(default)]
	pub rule_table: Option<String>,
	#[serde(default)]
	pub user_table: Option<String>,
}

impl TablesConfigLayer {
	pub fn merge(&mut self, other: TablesConfigLayer) {
		if other.group_table.is_some() {
			self.group_table = other.group_table;
		}
		if other.group_access_table.is_some() {
			self.group_access_table = other.group_access_table;
		}
		if other.rule_table.is_some() {
			self.rule_table = other.rule_table;
		}
		if other.user_table.is_some() {
			self.user_table = other.user_table;
		}
	}

	pub fn finalize(self) -> TablesConfig {
		TablesConfig {
			group_table: self
				.group_table
				.unwrap_or_else(|| DEFAULT_GROUP_TABLE.to_string()),
			group_access_table: self
				.group_access_table
				.unwrap_or_else(|| DEFAULT_GROUP_ACCESS_TABLE.to_string()),
			rule_table: self
				.rule_table
				.unwrap_or_else(|| DEFAULT_RULE_TABLE.to_string()),
			user_table: self
				.user_table
				.unwrap_or_else(|| DEFAULT_USER_TABLE.to_string()),
		}
	}
}
