// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolution of a user's granted rule names from group membership.
//!
//! The resolver walks membership → groups → rule ids → rules → conditions and
//! memoizes every step per user for its own lifetime. Callers decide that
//! lifetime: build one resolver per request for fresh answers, or share one
//! across requests to trade freshness for fewer store round-trips.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use ruleauth_condition::{Evaluator, SubstitutionMode, UserAttributes};
use ruleauth_config::{AuthenticationMode, AuthorizationConfig};
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, instrument};

use crate::error::{AuthError, Result};
use crate::rules::{resolve_rules, RuleResolution};
use crate::session::{session_key, SessionStore};
use crate::store::{AuthorizationStore, DEFAULT_PRIMARY_KEY};
use crate::types::{GrantedRules, GroupGrant, RuleId, UserId};

pub struct AuthorizationResolver {
	store: Arc<dyn AuthorizationStore>,
	sessions: Option<Arc<dyn SessionStore>>,
	mode: AuthenticationMode,
	evaluator: Evaluator,
	groups: RwLock<HashMap<UserId, Vec<GroupGrant>>>,
	attributes: RwLock<HashMap<UserId, Option<UserAttributes>>>,
	granted: Mutex<HashMap<UserId, Arc<OnceCell<GrantedRules>>>>,
}

impl AuthorizationResolver {
	/// Creates a resolver for the configured authentication mode.
	///
	/// # Errors
	///
	/// Returns [`AuthError::Config`] when session mode is configured without a
	/// session store.
	pub fn new(
		store: Arc<dyn AuthorizationStore>,
		sessions: Option<Arc<dyn SessionStore>>,
		config: &AuthorizationConfig,
	) -> Result<Self> {
		if config.authentication_mode == AuthenticationMode::Session && sessions.is_none() {
			return Err(AuthError::Config(
				"session authentication mode requires a session store".to_string(),
			));
		}

		let mode = if config.strict_substitution {
			SubstitutionMode::WordBoundary
		} else {
			SubstitutionMode::Literal
		};

		Ok(Self {
			store,
			sessions,
			mode: config.authentication_mode,
			evaluator: Evaluator::new(mode),
			groups: RwLock::new(HashMap::new()),
			attributes: RwLock::new(HashMap::new()),
			granted: Mutex::new(HashMap::new()),
		})
	}

	/// Realtime resolver with default settings.
	pub fn realtime(store: Arc<dyn AuthorizationStore>) -> Self {
		Self {
			store,
			sessions: None,
			mode: AuthenticationMode::Realtime,
			evaluator: Evaluator::default(),
			groups: RwLock::new(HashMap::new()),
			attributes: RwLock::new(HashMap::new()),
			granted: Mutex::new(HashMap::new()),
		}
	}

	pub fn authentication_mode(&self) -> AuthenticationMode {
		self.mode
	}

	/// Lower-cased names of the rules `user_id` currently satisfies.
	///
	/// Computed at most once per user per resolver; concurrent callers for the
	/// same user wait for the first computation. Failures are not cached.
	#[instrument(level = "debug", skip(self), fields(user_id = %user_id))]
	pub async fn granted_rules(&self, user_id: UserId) -> Result<GrantedRules> {
		let cell = {
			let mut cells = self.granted.lock().await;
			Arc::clone(cells.entry(user_id).or_default())
		};

		if let Some(granted) = cell.get() {
			debug!(count = granted.len(), "granted rules cache hit");
			return Ok(granted.clone());
		}

		let granted = cell.get_or_try_init(|| self.load_granted(user_id)).await?;
		Ok(granted.clone())
	}

	async fn load_granted(&self, user_id: UserId) -> Result<GrantedRules> {
		let sessions = match self.mode {
			AuthenticationMode::Session => self.sessions.as_ref(),
			AuthenticationMode::Realtime => None,
		};
		let key = session_key(user_id);

		if let Some(sessions) = sessions {
			if let Some(granted) = sessions.get(&key).await? {
				debug!(count = granted.len(), "granted rules restored from session");
				return Ok(granted);
			}
		}

		let resolution = self.resolve(user_id).await?;

		if let Some(sessions) = sessions {
			sessions.set(&key, &resolution.granted).await?;
		}

		Ok(resolution.granted)
	}

	/// Runs the full resolution against the store, bypassing the granted-rule
	/// cache and the session store. Group and attribute lookups still use
	/// their caches. Condition failures are returned for diagnostics.
	#[instrument(level = "debug", skip(self), fields(user_id = %user_id))]
	pub async fn resolve(&self, user_id: UserId) -> Result<RuleResolution> {
		let groups = self.groups(user_id).await?;
		if groups.is_empty() {
			debug!("user has no active groups");
			return Ok(RuleResolution::default());
		}

		let mut ids: BTreeSet<RuleId> = BTreeSet::new();
		for group in &groups {
			ids.extend(group.rule_ids()?);
		}
		if ids.is_empty() {
			debug!(groups = groups.len(), "active groups grant no rules");
			return Ok(RuleResolution::default());
		}

		let rules = self.store.active_rules_by_ids(&ids).await?;
		debug!(requested = ids.len(), found = rules.len(), "fetched rules");

		let attributes = if rules.iter().any(|r| r.is_conditional()) {
			self.attributes(user_id).await?
		} else {
			None
		};

		Ok(resolve_rules(&rules, attributes.as_ref(), &self.evaluator))
	}

	/// Active groups of `user_id`, cached per user.
	pub async fn groups(&self, user_id: UserId) -> Result<Vec<GroupGrant>> {
		if let Some(groups) = self.groups.read().await.get(&user_id) {
			return Ok(groups.clone());
		}

		let groups = self.store.active_groups_for_user(user_id).await?;
		debug!(user_id = %user_id, count = groups.len(), "fetched groups");
		self.groups.write().await.insert(user_id, groups.clone());
		Ok(groups)
	}

	/// Attribute row of `user_id`, cached per user.
	pub async fn attributes(&self, user_id: UserId) -> Result<Option<UserAttributes>> {
		if let Some(attributes) = self.attributes.read().await.get(&user_id) {
			return Ok(attributes.clone());
		}

		let primary_key = self
			.store
			.attribute_primary_key()
			.await?
			.unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string());
		let attributes = self.store.user_attributes(user_id, &primary_key).await?;
		debug!(
			user_id = %user_id,
			primary_key = %primary_key,
			found = attributes.is_some(),
			"fetched user attributes"
		);
		self
			.attributes
			.write()
			.await
			.insert(user_id, attributes.clone());
		Ok(attributes)
	}

	/// Forgets everything cached for `user_id` in this resolver. Session
	/// entries are left alone.
	pub async fn invalidate(&self, user_id: UserId) {
		self.granted.lock().await.remove(&user_id);
		self.groups.write().await.remove(&user_id);
		self.attributes.write().await.remove(&user_id);
	}

	/// Forgets everything cached in this resolver.
	pub async fn clear(&self) {
		self.granted.lock().await.clear();
		self.groups.write().await.clear();
		self.attributes.write().await.clear();
	}
}
