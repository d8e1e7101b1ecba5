// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session-scoped persistence of granted rule lists.
//!
//! Only consulted when the resolver runs in
//! [`AuthenticationMode::Session`](ruleauth_config::AuthenticationMode::Session).

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{GrantedRules, UserId};

/// Key under which a user's granted rules are stored.
pub fn session_key(user_id: UserId) -> String {
	format!("_auth_list_{user_id}")
}

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn get(&self, key: &str) -> Result<Option<GrantedRules>, StoreError>;
	async fn set(&self, key: &str, value: &GrantedRules) -> Result<(), StoreError>;
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
	entries: RwLock<HashMap<String, GrantedRules>>,
}

impl InMemorySessionStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn len(&self) -> usize {
		self.entries.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.entries.read().await.is_empty()
	}

	pub async fn remove(&self, key: &str) -> Option<GrantedRules> {
		self.entries.write().await.remove(key)
	}
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
	async fn get(&self, key: &str) -> Result<Option<GrantedRules>, StoreError> {
		Ok(self.entries.read().await.get(key).cloned())
	}

	async fn set(&self, key: &str, value: &GrantedRules) -> Result<(), StoreError> {
		self
			.entries
			.write()
			.await
			.insert(key.to_string(), value.clone());
		Ok(())
	}
}
