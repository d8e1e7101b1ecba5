// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory [`AuthorizationStore`] for tests and embedding.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use ruleauth_condition::UserAttributes;

use crate::error::StoreError;
use crate::store::AuthorizationStore;
use crate::types::{GroupGrant, GroupId, RuleId, RuleRecord, UserId};

#[derive(Debug, Clone)]
struct StoredRule {
	record: RuleRecord,
	active: bool,
}

#[derive(Debug, Clone)]
struct StoredGroup {
	grant: GroupGrant,
	active: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("in-memory store marked unavailable")]
struct Unavailable;

/// Store backed by plain maps, built with `with_*` methods.
///
/// Fetch counters record how often each query ran, which makes cache
/// behaviour observable from the outside.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationStore {
	rules: BTreeMap<RuleId, StoredRule>,
	groups: BTreeMap<GroupId, StoredGroup>,
	memberships: Vec<(UserId, GroupId)>,
	attributes: HashMap<UserId, UserAttributes>,
	primary_key: Option<String>,
	unavailable: AtomicBool,
	group_fetches: AtomicUsize,
	rule_fetches: AtomicUsize,
	attribute_fetches: AtomicUsize,
	last_primary_key: Mutex<Option<String>>,
}

impl InMemoryAuthorizationStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_rule(
		mut self,
		id: impl Into<RuleId>,
		name: impl Into<String>,
		condition: impl Into<String>,
	) -> Self {
		let record = RuleRecord::new(id, name, condition);
		self.rules.insert(record.id, StoredRule { record, active: true });
		self
	}

	pub fn with_inactive_rule(
		mut self,
		id: impl Into<RuleId>,
		name: impl Into<String>,
		condition: impl Into<String>,
	) -> Self {
		let record = RuleRecord::new(id, name, condition);
		self.rules.insert(record.id, StoredRule { record, active: false });
		self
	}

	pub fn with_group(
		mut self,
		id: impl Into<GroupId>,
		title: impl Into<String>,
		rules: impl Into<String>,
		active: bool,
	) -> Self {
		let grant = GroupGrant::new(id, title, rules);
		self.groups.insert(grant.id, StoredGroup { grant, active });
		self
	}

	pub fn with_membership(mut self, user_id: impl Into<UserId>, group_id: impl Into<GroupId>) -> Self {
		self.memberships.push((user_id.into(), group_id.into()));
		self
	}

	pub fn with_attributes(mut self, user_id: impl Into<UserId>, attributes: UserAttributes) -> Self {
		self.attributes.insert(user_id.into(), attributes);
		self
	}

	/// Declares the attribute primary key reported to the resolver.
	pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
		self.primary_key = Some(key.into());
		self
	}

	/// Makes every query fail with [`StoreError::Backend`] while set.
	pub fn set_unavailable(&self, unavailable: bool) {
		self.unavailable.store(unavailable, Ordering::SeqCst);
	}

	pub fn group_fetches(&self) -> usize {
		self.group_fetches.load(Ordering::SeqCst)
	}

	pub fn rule_fetches(&self) -> usize {
		self.rule_fetches.load(Ordering::SeqCst)
	}

	pub fn attribute_fetches(&self) -> usize {
		self.attribute_fetches.load(Ordering::SeqCst)
	}

	/// Primary key passed to the most recent attribute lookup.
	pub fn last_primary_key(&self) -> Option<String> {
		self
			.last_primary_key
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	fn check_available(&self) -> Result<(), StoreError> {
		if self.unavailable.load(Ordering::SeqCst) {
			return Err(StoreError::backend(Unavailable));
		}
		Ok(())
	}
}

#[async_trait]
impl AuthorizationStore for InMemoryAuthorizationStore {
	async fn active_groups_for_user(&self, user_id: UserId) -> Result<Vec<GroupGrant>, StoreError> {
		self.check_available()?;
		self.group_fetches.fetch_add(1, Ordering::SeqCst);

		Ok(
			self
				.memberships
				.iter()
				.filter(|(member, _)| *member == user_id)
				.filter_map(|(_, group_id)| self.groups.get(group_id))
				.filter(|group| group.active)
				.map(|group| group.grant.clone())
				.collect(),
		)
	}

	async fn active_rules_by_ids(
		&self,
		ids: &BTreeSet<RuleId>,
	) -> Result<Vec<RuleRecord>, StoreError> {
		self.check_available()?;
		self.rule_fetches.fetch_add(1, Ordering::SeqCst);

		Ok(
			ids
				.iter()
				.filter_map(|id| self.rules.get(id))
				.filter(|rule| rule.active)
				.map(|rule| rule.record.clone())
				.collect(),
		)
	}

	async fn attribute_primary_key(&self) -> Result<Option<String>, StoreError> {
		self.check_available()?;
		Ok(self.primary_key.clone())
	}

	async fn user_attributes(
		&self,
		user_id: UserId,
		primary_key: &str,
	) -> Result<Option<UserAttributes>, StoreError> {
		self.check_available()?;
		self.attribute_fetches.fetch_add(1, Ordering::SeqCst);
		*self
			.last_primary_key
			.lock()
			.unwrap_or_else(PoisonError::into_inner) = Some(primary_key.to_string());

		Ok(self.attributes.get(&user_id).cloned())
	}
}
