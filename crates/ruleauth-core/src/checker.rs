// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Public entry point for authorization checks.

use std::sync::Arc;

use ruleauth_config::AuthorizationConfig;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::resolver::AuthorizationResolver;
use crate::session::SessionStore;
use crate::store::AuthorizationStore;
use crate::types::{Relation, RuleNames, UserId};

/// Answers "may this user use these rules?".
///
/// # Example
///
/// ```
/// # tokio_test::block_on(async {
/// use std::sync::Arc;
/// use ruleauth_core::{Checker, InMemoryAuthorizationStore, Relation, UserId};
///
/// let store = InMemoryAuthorizationStore::new()
/// 	.with_rule(1, "Admin", "")
/// 	.with_group(1, "admins", "1", true)
/// 	.with_membership(7, 1);
/// let checker = Checker::realtime(Arc::new(store));
///
/// assert!(checker.check("admin", UserId::new(7), Relation::Or).await.unwrap());
/// assert!(!checker.check("admin", UserId::new(8), Relation::Or).await.unwrap());
/// # });
/// ```
pub struct Checker {
	enabled: bool,
	resolver: Arc<AuthorizationResolver>,
}

impl Checker {
	pub fn new(resolver: Arc<AuthorizationResolver>, config: &AuthorizationConfig) -> Self {
		Self {
			enabled: config.enabled,
			resolver,
		}
	}

	/// Builds the resolver and checker from one configuration section.
	///
	/// # Errors
	///
	/// Fails when the resolver cannot be built for the configured mode.
	pub fn from_config(
		store: Arc<dyn AuthorizationStore>,
		sessions: Option<Arc<dyn SessionStore>>,
		config: &AuthorizationConfig,
	) -> Result<Self> {
		let resolver = AuthorizationResolver::new(store, sessions, config)?;
		Ok(Self::new(Arc::new(resolver), config))
	}

	/// Enabled checker over a realtime resolver.
	pub fn realtime(store: Arc<dyn AuthorizationStore>) -> Self {
		Self {
			enabled: true,
			resolver: Arc::new(AuthorizationResolver::realtime(store)),
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn resolver(&self) -> &Arc<AuthorizationResolver> {
		&self.resolver
	}

	/// Checks `names` for `user_id`.
	///
	/// With [`Relation::Or`] any granted name suffices; with [`Relation::And`]
	/// every requested name must be granted. A disabled checker allows
	/// everything without touching storage.
	///
	/// # Errors
	///
	/// Storage failures and malformed group data propagate; they are never
	/// reported as a denial.
	#[instrument(skip(self, names), fields(user_id = %user_id, relation = %relation))]
	pub async fn check(
		&self,
		names: impl Into<RuleNames>,
		user_id: UserId,
		relation: Relation,
	) -> Result<bool> {
		if !self.enabled {
			debug!("authorization disabled, allowing");
			return Ok(true);
		}

		let requested = names.into().normalize();
		let granted = self.resolver.granted_rules(user_id).await?;

		let matched = requested.iter().filter(|name| granted.contains(name.as_str())).count();
		let allowed = match relation {
			Relation::Or => matched > 0,
			Relation::And => matched == requested.len(),
		};

		debug!(
			requested = requested.len(),
			matched,
			allowed,
			"authorization check complete"
		);
		Ok(allowed)
	}

	/// Like [`check`](Self::check) with the relation given as text
	/// (`"or"`/`"and"`, any case).
	///
	/// # Errors
	///
	/// Returns [`AuthError::InvalidRelation`](crate::AuthError::InvalidRelation)
	/// for any other relation on an enabled checker.
	pub async fn check_str(
		&self,
		names: impl Into<RuleNames>,
		user_id: UserId,
		relation: &str,
	) -> Result<bool> {
		if !self.enabled {
			return Ok(true);
		}
		let relation: Relation = relation.parse()?;
		self.check(names, user_id, relation).await
	}
}
