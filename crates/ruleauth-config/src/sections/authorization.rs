// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization behaviour configuration.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Where granted rule lists are memoized between checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAuthenticationMode")]
pub enum AuthenticationMode {
	/// Recompute from storage once per resolver lifetime.
	#[default]
	Realtime,
	/// Also persist the granted list in the session store and trust it on
	/// later checks.
	Session,
}

impl fmt::Display for AuthenticationMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AuthenticationMode::Realtime => write!(f, "realtime"),
			AuthenticationMode::Session => write!(f, "session"),
		}
	}
}

impl FromStr for AuthenticationMode {
	type Err = String;

	/// Accepts the mode names and the legacy numeric codes (`1` realtime,
	/// `2` session).
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"realtime" | "1" => Ok(AuthenticationMode::Realtime),
			"session" | "2" => Ok(AuthenticationMode::Session),
			other => Err(format!(
				"unknown authentication mode '{other}', expected 'realtime' or 'session'"
			)),
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAuthenticationMode {
	Code(i64),
	Name(String),
}

impl TryFrom<RawAuthenticationMode> for AuthenticationMode {
	type Error = String;

	fn try_from(raw: RawAuthenticationMode) -> Result<Self, Self::Error> {
		match raw {
			RawAuthenticationMode::Code(code) => code.to_string().parse(),
			RawAuthenticationMode::Name(name) => name.parse(),
		}
	}
}

/// Authorization configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationConfig {
	/// When false every check passes without consulting storage.
	pub enabled: bool,
	pub authentication_mode: AuthenticationMode,
	/// Substitute attribute names only at identifier boundaries.
	pub strict_substitution: bool,
}

impl Default for AuthorizationConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			authentication_mode: AuthenticationMode::Realtime,
			strict_substitution: false,
		}
	}
}

/// Authorization configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub authentication_mode: Option<AuthenticationMode>,
	#[serde(default)]
	pub strict_substitution: Option<bool>,
}

impl AuthorizationConfigLayer {
	pub fn merge(&mut self, other: AuthorizationConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.authentication_mode.is_some() {
			self.authentication_mode = other.authentication_mode;
		}
		if other.strict_substitution.is_some() {
			self.strict_substitution = other.strict_substitution;
		}
	}

	pub fn finalize(self) -> AuthorizationConfig {
		AuthorizationConfig {
			enabled: self.enabled.unwrap_or(true),
			authentication_mode: self.authentication_mode.unwrap_or_default(),
			strict_substitution: self.strict_substitution.unwrap_or(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = AuthorizationConfigLayer::default().finalize();
		assert_eq!(config, AuthorizationConfig::default());
		assert!(config.enabled);
		assert_eq!(config.authentication_mode, AuthenticationMode::Realtime);
		assert!(!config.strict_substitution);
	}

	#[test]
	fn test_merge_overrides_only_set_fields() {
		let mut base = AuthorizationConfigLayer {
			enabled: Some(false),
			authentication_mode: Some(AuthenticationMode::Session),
			strict_substitution: None,
		};
		base.merge(AuthorizationConfigLayer {
			enabled: Some(true),
			..Default::default()
		});
		let config = base.finalize();
		assert!(config.enabled);
		assert_eq!(config.authentication_mode, AuthenticationMode::Session);
	}

	#[test]
	fn test_mode_parsing_accepts_names_and_codes() {
		assert_eq!("Session".parse::<AuthenticationMode>(), Ok(AuthenticationMode::Session));
		assert_eq!("realtime".parse::<AuthenticationMode>(), Ok(AuthenticationMode::Realtime));
		assert_eq!("1".parse::<AuthenticationMode>(), Ok(AuthenticationMode::Realtime));
		assert_eq!("2".parse::<AuthenticationMode>(), Ok(AuthenticationMode::Session));
		assert!("login".parse::<AuthenticationMode>().is_err());
	}

	#[test]
	fn test_mode_deserializes_from_toml_string_or_integer() {
		let layer: AuthorizationConfigLayer = toml::from_str("authentication_mode = 2").unwrap();
		assert_eq!(layer.authentication_mode, Some(AuthenticationMode::Session));

		let layer: AuthorizationConfigLayer =
			toml::from_str("authentication_mode = \"realtime\"").unwrap();
		assert_eq!(layer.authentication_mode, Some(AuthenticationMode::Realtime));

		assert!(toml::from_str::<AuthorizationConfigLayer>("authentication_mode = 3").is_err());
	}
}
