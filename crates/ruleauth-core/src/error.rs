// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for authorization checks.
//!
//! Everything here aborts the whole check. A rule whose condition cannot be
//! evaluated is not an error at this level; it is denied and reported in
//! [`RuleResolution::failures`](crate::RuleResolution::failures).

use thiserror::Error;

use crate::types::GroupId;

/// Failure reported by an [`AuthorizationStore`](crate::AuthorizationStore)
/// or [`SessionStore`](crate::SessionStore).
#[derive(Debug, Error)]
pub enum StoreError {
	/// The backend could not be reached or the query failed.
	#[error("authorization store unavailable: {0}")]
	Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

	/// The backend returned rows the core cannot interpret.
	#[error("invalid stored data: {0}")]
	InvalidData(String),
}

impl StoreError {
	pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
		StoreError::Backend(Box::new(err))
	}
}

#[derive(Debug, Error)]
pub enum AuthError {
	#[error("invalid relation '{0}', expected 'or' or 'and'")]
	InvalidRelation(String),

	#[error("group {group_id} has a malformed rule list entry '{segment}'")]
	InvalidGroupRules { group_id: GroupId, segment: String },

	#[error(transparent)]
	Store(#[from] StoreError),

	#[error("configuration error: {0}")]
	Config(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
