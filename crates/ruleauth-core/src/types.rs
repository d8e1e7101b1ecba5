// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for rule-based authorization.
//!
//! - **ID newtypes**: [`UserId`], [`GroupId`], [`RuleId`] wrap the integer keys
//!   of the backing tables so they cannot be mixed up
//! - **Store rows**: [`GroupGrant`] and [`RuleRecord`] as returned by an
//!   [`AuthorizationStore`](crate::AuthorizationStore)
//! - **Results**: [`GrantedRules`], the lower-cased names a user satisfies
//! - **Check inputs**: [`RuleNames`] and [`Relation`]

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(
			Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
		)]
		#[serde(transparent)]
		pub struct $name(i64);

		impl $name {
			/// Create a new ID from its integer key.
			pub const fn new(id: i64) -> Self {
				Self(id)
			}

			/// Get the inner integer key.
			pub const fn get(self) -> i64 {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<i64> for $name {
			fn from(id: i64) -> Self {
				Self(id)
			}
		}

		impl From<$name> for i64 {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Identifier of the user being authorized.");
define_id_type!(GroupId, "Identifier of a user group.");
define_id_type!(RuleId, "Identifier of a permission rule.");

// =============================================================================
// Store Rows
// =============================================================================

/// An active rule as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
	pub id: RuleId,
	pub name: String,
	/// Condition expression; empty means the rule passes on membership alone.
	pub condition: String,
}

impl RuleRecord {
	pub fn new(id: impl Into<RuleId>, name: impl Into<String>, condition: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			condition: condition.into(),
		}
	}

	/// True when the rule carries a condition. Whitespace-only conditions
	/// count as present and fail evaluation as empty.
	pub fn is_conditional(&self) -> bool {
		!self.condition.is_empty()
	}
}

/// An active group the user belongs to, with its raw rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupGrant {
	pub id: GroupId,
	pub title: String,
	/// Comma-separated rule ids, e.g. `"1,2,5"`.
	pub rules: String,
}

impl GroupGrant {
	pub fn new(id: impl Into<GroupId>, title: impl Into<String>, rules: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			rules: rules.into(),
		}
	}

	/// Parses [`rules`](Self::rules) into a de-duplicated id set.
	///
	/// # Errors
	///
	/// Returns [`AuthError::InvalidGroupRules`] if a segment is not an integer.
	pub fn rule_ids(&self) -> Result<BTreeSet<RuleId>, AuthError> {
		parse_rule_ids(&self.rules).map_err(|segment| AuthError::InvalidGroupRules {
			group_id: self.id,
			segment,
		})
	}
}

/// Splits a comma-separated id list. Surrounding commas, whitespace and empty
/// segments are ignored; the first non-integer segment is returned as the error.
pub fn parse_rule_ids(list: &str) -> Result<BTreeSet<RuleId>, String> {
	list.trim_matches(',')
		.split(',')
		.map(str::trim)
		.filter(|segment| !segment.is_empty())
		.map(|segment| {
			segment
				.parse::<i64>()
				.map(RuleId::new)
				.map_err(|_| segment.to_string())
		})
		.collect()
}

// =============================================================================
// Granted Rules
// =============================================================================

/// Lower-cased names of the rules a user currently satisfies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedRules(BTreeSet<String>);

impl GrantedRules {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a rule name, lower-casing it.
	pub fn insert(&mut self, name: &str) {
		self.0.insert(name.to_lowercase());
	}

	/// Exact membership test. Callers are expected to pass lower-cased names.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains(name)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}

impl<S: AsRef<str>> FromIterator<S> for GrantedRules {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut granted = GrantedRules::new();
		for name in iter {
			granted.insert(name.as_ref());
		}
		granted
	}
}

// =============================================================================
// Check Inputs
// =============================================================================

/// How multiple requested rules combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
	/// Any one requested rule suffices.
	#[default]
	Or,
	/// Every requested rule is required.
	And,
}

impl fmt::Display for Relation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Relation::Or => write!(f, "or"),
			Relation::And => write!(f, "and"),
		}
	}
}

impl FromStr for Relation {
	type Err = AuthError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"or" => Ok(Relation::Or),
			"and" => Ok(Relation::And),
			_ => Err(AuthError::InvalidRelation(s.to_string())),
		}
	}
}

/// Rule names requested by a check.
///
/// A delimited string such as `"Admin,Edit"` is lower-cased and split on
/// commas. A list is taken verbatim: mixed-case entries in a list will not
/// match the lower-cased granted names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleNames {
	Delimited(String),
	List(Vec<String>),
}

impl RuleNames {
	pub fn normalize(&self) -> Vec<String> {
		match self {
			RuleNames::Delimited(names) => names.to_lowercase().split(',').map(str::to_string).collect(),
			RuleNames::List(names) => names.clone(),
		}
	}
}

impl From<&str> for RuleNames {
	fn from(names: &str) -> Self {
		RuleNames::Delimited(names.to_string())
	}
}

impl From<String> for RuleNames {
	fn from(names: String) -> Self {
		RuleNames::Delimited(names)
	}
}

impl From<Vec<String>> for RuleNames {
	fn from(names: Vec<String>) -> Self {
		RuleNames::List(names)
	}
}

impl From<Vec<&str>> for RuleNames {
	fn from(names: Vec<&str>) -> Self {
		RuleNames::List(names.into_iter().map(str::to_string).collect())
	}
}

impl From<&[&str]> for RuleNames {
	fn from(names: &[&str]) -> Self {
		RuleNames::List(names.iter().map(|n| n.to_string()).collect())
	}
}

impl<const N: usize> From<[&str; N]> for RuleNames {
	fn from(names: [&str; N]) -> Self {
		RuleNames::List(names.iter().map(|n| n.to_string()).collect())
	}
}
