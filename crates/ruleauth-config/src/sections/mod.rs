// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod authorization;
mod database;
mod tables;

pub use authorization::{AuthenticationMode, AuthorizationConfig, AuthorizationConfigLayer};
pub use database::{
	DatabaseConfig, DatabaseConfigLayer, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DATABASE_URL,
	DEFAULT_MAX_CONNECTIONS,
};
pub use tables::{
	is_sql_identifier, TablesConfig, TablesConfigLayer, DEFAULT_GROUP_ACCESS_TABLE,
	DEFAULT_GROUP_TABLE, DEFAULT_RULE_TABLE, DEFAULT_USER_TABLE,
};
