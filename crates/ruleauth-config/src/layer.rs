// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as read from a single source.

use serde::Deserialize;

use crate::sections::{AuthorizationConfigLayer, DatabaseConfigLayer, TablesConfigLayer};

/// One source's view of the configuration. Absent sections stay `None` so
/// lower-precedence sources show through when merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub authorization: Option<AuthorizationConfigLayer>,
	#[serde(default)]
	pub tables: Option<TablesConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
}

fn merge_section<T>(slot: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T)) {
	let Some(incoming) = other else {
		return;
	};
	if let Some(current) = slot {
		merge(current, incoming);
	} else {
		*slot = Some(incoming);
	}
}

impl AuthConfigLayer {
	/// Overlays `other` on top of `self`.
	pub fn merge(&mut self, other: AuthConfigLayer) {
		merge_section(
			&mut self.authorization,
			other.authorization,
			AuthorizationConfigLayer::merge,
		);
		merge_section(&mut self.tables, other.tables, TablesConfigLayer::merge);
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_keeps_lower_layer_sections() {
		let mut base: AuthConfigLayer = toml::from_str(
			r#"
			[tables]
			user_table = "member"
			rule_table = "rules"
			"#,
		)
		.unwrap();
		let overlay: AuthConfigLayer = toml::from_str(
			r#"
			[tables]
			rule_table = "permissions"

			[authorization]
			enabled = false
			"#,
		)
		.unwrap();

		base.merge(overlay);

		let tables = base.tables.unwrap().finalize();
		assert_eq!(tables.user_table, "member");
		assert_eq!(tables.rule_table, "permissions");
		assert!(!base.authorization.unwrap().finalize().enabled);
		assert!(base.database.is_none());
	}
}
