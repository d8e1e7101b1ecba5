// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use ruleauth_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Invalid identifier: {0}")]
	InvalidIdentifier(String),

	#[error("Invalid configuration: {0}")]
	Config(#[from] ruleauth_config::ConfigError),

	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<DbError> for StoreError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::InvalidIdentifier(message) | DbError::Internal(message) => {
				StoreError::InvalidData(message)
			}
			other => StoreError::backend(other),
		}
	}
}
