// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration for the ruleauth authorization engine.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`RULEAUTH_*`)
//!
//! # Usage
//!
//! ```ignore
//! use ruleauth_config::load_config;
//!
//! let config = load_config()?;
//! println!("authorization enabled: {}", config.authorization.enabled);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::AuthConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, DEFAULT_ENV_PREFIX,
	SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleAuthConfig {
	pub authorization: AuthorizationConfig,
	pub tables: TablesConfig,
	pub database: DatabaseConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`RULEAUTH_*`)
/// 2. Config file (`/etc/ruleauth/auth.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<RuleAuthConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::default()),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<RuleAuthConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource::default())])
}

/// Load configuration with a custom config file path, which must exist.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<RuleAuthConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::required(config_path)),
		Box::new(EnvSource::default()),
	])
}

/// Merge the given sources in precedence order and finalize.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<RuleAuthConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = AuthConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: AuthConfigLayer) -> Result<RuleAuthConfig, ConfigError> {
	let authorization = layer.authorization.unwrap_or_default().finalize();
	let tables = layer.tables.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();

	tables.validate()?;
	database.validate()?;

	info!(
		enabled = authorization.enabled,
		authentication_mode = %authorization.authentication_mode,
		strict_substitution = authorization.strict_substitution,
		group_table = %tables.group_table,
		group_access_table = %tables.group_access_table,
		rule_table = %tables.rule_table,
		user_table = %tables.user_table,
		database_url = %database.url,
		max_connections = database.max_connections,
		"Authorization configuration loaded"
	);

	Ok(RuleAuthConfig {
		authorization,
		tables,
		database,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_defaults_only() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, RuleAuthConfig::default());
	}

	#[test]
	fn test_file_overrides_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[authorization]
enabled = false
strict_substitution = true

[database]
url = "sqlite::memory:"
"#
		)
		.unwrap();

		let config = load_from_sources(vec![
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert!(!config.authorization.enabled);
		assert!(config.authorization.strict_substitution);
		assert_eq!(config.database.url, "sqlite::memory:");
		assert_eq!(config.tables, TablesConfig::default());
	}

	#[test]
	fn test_explicit_file_must_exist() {
		let err = load_config_with_file("/nonexistent/ruleauth.toml").unwrap_err();
		assert!(matches!(err, ConfigError::FileRead { .. }));
	}

	#[test]
	fn test_zero_pool_size_fails_validation() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[database]
max_connections = 0").unwrap();

		let err = load_from_sources(vec![Box::new(TomlSource::new(file.path()))]).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn test_invalid_table_name_fails_validation() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[tables]\ngroup_table = \"auth group\"").unwrap();

		let err = load_from_sources(vec![Box::new(TomlSource::new(file.path()))]).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}
}
