// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage interface consumed by the authorization resolver.

use std::collections::BTreeSet;

use async_trait::async_trait;
use ruleauth_condition::UserAttributes;

use crate::error::StoreError;
use crate::types::{GroupGrant, RuleId, RuleRecord, UserId};

/// Attribute lookup key used when the store does not declare one.
pub const DEFAULT_PRIMARY_KEY: &str = "uid";

/// Read-only access to groups, rules and user attributes.
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
	/// Active groups the user is a member of. Unknown users yield no groups.
	async fn active_groups_for_user(&self, user_id: UserId) -> Result<Vec<GroupGrant>, StoreError>;

	/// Active rules among `ids`. Missing or inactive ids are skipped.
	async fn active_rules_by_ids(&self, ids: &BTreeSet<RuleId>)
		-> Result<Vec<RuleRecord>, StoreError>;

	/// Name of the attribute that identifies a user in the attribute source,
	/// or `None` to fall back to [`DEFAULT_PRIMARY_KEY`].
	async fn attribute_primary_key(&self) -> Result<Option<String>, StoreError>;

	/// The attribute row whose `primary_key` equals `user_id`.
	async fn user_attributes(
		&self,
		user_id: UserId,
		primary_key: &str,
	) -> Result<Option<UserAttributes>, StoreError>;
}
