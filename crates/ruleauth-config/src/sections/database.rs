// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Connection settings for the SQLite authorization store.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./ruleauth.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Resolved database settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
	/// `sqlite:` URL of the database holding the rule, group and user tables.
	pub url: String,
	/// Upper bound on pooled connections.
	pub max_connections: u32,
	/// How long a read waits on a locked database before it fails.
	pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		DatabaseConfigLayer::default().finalize()
	}
}

impl DatabaseConfig {
	/// Checks the store can actually be opened with these settings.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.url.starts_with("sqlite:") {
			return Err(ConfigError::Validation(format!(
				"database url '{}' is not a sqlite: url",
				self.url
			)));
		}
		if self.max_connections == 0 {
			return Err(ConfigError::Validation(
				"database max_connections must be at least 1".to_string(),
			));
		}
		Ok(())
	}
}

/// Database settings from one source; `busy_timeout_ms` is in milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub max_connections: Option<u32>,
	#[serde(default)]
	pub busy_timeout_ms: Option<u64>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		self.url = other.url.or(self.url.take());
		self.max_connections = other.max_connections.or(self.max_connections);
		self.busy_timeout_ms = other.busy_timeout_ms.or(self.busy_timeout_ms);
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			url: self.url.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
			max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
			busy_timeout: Duration::from_millis(self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS)),
		}
	}
}
