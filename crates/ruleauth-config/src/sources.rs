// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where configuration layers come from.
//!
//! Every source produces an [`AuthConfigLayer`]. [`load_from_sources`]
//! stacks them by [`Precedence`], so a field set by a higher source replaces
//! the same field from a lower one and leaves the rest alone.
//!
//! [`load_from_sources`]: crate::load_from_sources

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::AuthConfigLayer;
use crate::sections::{
	AuthenticationMode, AuthorizationConfigLayer, DatabaseConfigLayer, TablesConfigLayer,
};

/// Stacking order; higher wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<AuthConfigLayer, ConfigError>;
}

/// Sets nothing. Every field falls back to its section default when the
/// merged layer is finalized.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<AuthConfigLayer, ConfigError> {
		Ok(AuthConfigLayer::default())
	}
}

pub const SYSTEM_CONFIG_PATH: &str = "/etc/ruleauth/auth.toml";

/// A TOML file with optional `[authorization]`, `[tables]` and `[database]`
/// tables.
pub struct TomlSource {
	path: PathBuf,
	required: bool,
}

impl TomlSource {
	/// A file that may be absent; a missing file contributes nothing.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// A file that must exist.
	pub fn required(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}

	/// The optional system-wide file at [`SYSTEM_CONFIG_PATH`].
	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<AuthConfigLayer, ConfigError> {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(e) if e.kind() == ErrorKind::NotFound && !self.required => {
				debug!(path = %self.path.display(), "no config file, skipping");
				return Ok(AuthConfigLayer::default());
			}
			Err(source) => {
				return Err(ConfigError::FileRead {
					path: self.path.clone(),
					source,
				})
			}
		};

		let layer = toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
			path: self.path.clone(),
			source,
		})?;
		trace!(path = %self.path.display(), "config file parsed");
		Ok(layer)
	}
}

pub const DEFAULT_ENV_PREFIX: &str = "RULEAUTH";

/// Environment variables named `<PREFIX>_<FIELD>`.
///
/// | variable | field |
/// |---|---|
/// | `_ENABLED` | `authorization.enabled` |
/// | `_AUTHENTICATION_MODE` | `authorization.authentication_mode` |
/// | `_STRICT_SUBSTITUTION` | `authorization.strict_substitution` |
/// | `_TABLE_GROUP`, `_TABLE_GROUP_ACCESS`, `_TABLE_RULE`, `_TABLE_USER` | `tables.*` |
/// | `_DATABASE_URL` | `database.url` |
/// | `_DATABASE_MAX_CONNECTIONS` | `database.max_connections` |
/// | `_DATABASE_BUSY_TIMEOUT_MS` | `database.busy_timeout_ms` |
///
/// Empty variables count as unset.
pub struct EnvSource {
	prefix: String,
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::with_prefix(DEFAULT_ENV_PREFIX)
	}
}

impl EnvSource {
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	fn key(&self, field: &str) -> String {
		format!("{}_{field}", self.prefix)
	}

	fn text(&self, field: &str) -> Option<String> {
		std::env::var(self.key(field)).ok().filter(|v| !v.is_empty())
	}

	fn parsed<T>(&self, field: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
		T::Err: ToString,
	{
		self
			.text(field)
			.map(|raw| {
				raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
					key: self.key(field),
					message: e.to_string(),
				})
			})
			.transpose()
	}

	fn flag(&self, field: &str) -> Result<Option<bool>, ConfigError> {
		let Some(raw) = self.text(field) else {
			return Ok(None);
		};
		match raw.to_ascii_lowercase().as_str() {
			"1" | "true" | "yes" | "on" => Ok(Some(true)),
			"0" | "false" | "no" | "off" => Ok(Some(false)),
			_ => Err(ConfigError::InvalidValue {
				key: self.key(field),
				message: format!("expected a boolean, got '{raw}'"),
			}),
		}
	}

	fn authorization(&self) -> Result<AuthorizationConfigLayer, ConfigError> {
		Ok(AuthorizationConfigLayer {
			enabled: self.flag("ENABLED")?,
			authentication_mode: self.parsed::<AuthenticationMode>("AUTHENTICATION_MODE")?,
			strict_substitution: self.flag("STRICT_SUBSTITUTION")?,
		})
	}

	fn tables(&self) -> TablesConfigLayer {
		TablesConfigLayer {
			group_table: self.text("TABLE_GROUP"),
			group_access_table: self.text("TABLE_GROUP_ACCESS"),
			rule_table: self.text("TABLE_RULE"),
			user_table: self.text("TABLE_USER"),
		}
	}

	fn database(&self) -> Result<DatabaseConfigLayer, ConfigError> {
		Ok(DatabaseConfigLayer {
			url: self.text("DATABASE_URL"),
			max_connections: self.parsed("DATABASE_MAX_CONNECTIONS")?,
			busy_timeout_ms: self.parsed("DATABASE_BUSY_TIMEOUT_MS")?,
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<AuthConfigLayer, ConfigError> {
		debug!(prefix = %self.prefix, "reading environment");
		Ok(AuthConfigLayer {
			authorization: Some(self.authorization()?),
			tables: Some(self.tables()),
			database: Some(self.database()?),
		})
	}
}
