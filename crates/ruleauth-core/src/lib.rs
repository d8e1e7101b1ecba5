// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group and rule based authorization.
//!
//! Users belong to groups, groups grant rules, and a rule may carry a
//! condition over the user's own attributes. A check asks whether a user holds
//! one or all of a set of rule names:
//!
//! - [`Checker`] normalizes the requested names and applies `or`/`and`
//! - [`AuthorizationResolver`] loads groups, rules and attributes through an
//!   [`AuthorizationStore`] and memoizes the granted names per user
//! - [`resolve_rules`] evaluates rule conditions with
//!   [`ruleauth_condition::Evaluator`]
//!
//! Storage is pluggable. [`InMemoryAuthorizationStore`] is provided for tests
//! and embedding; the `ruleauth-db` crate provides a SQLite store.

pub mod checker;
pub mod error;
pub mod memory;
pub mod resolver;
pub mod rules;
pub mod session;
pub mod store;
pub mod types;

pub use checker::Checker;
pub use error::{AuthError, Result, StoreError};
pub use memory::InMemoryAuthorizationStore;
pub use resolver::AuthorizationResolver;
pub use rules::{resolve_rules, ConditionFailure, RuleResolution};
pub use session::{session_key, InMemorySessionStore, SessionStore};
pub use store::{AuthorizationStore, DEFAULT_PRIMARY_KEY};
pub use types::{
	parse_rule_ids, GrantedRules, GroupGrant, GroupId, Relation, RuleId, RuleNames, RuleRecord,
	UserId,
};

pub use ruleauth_condition::{AttributeValue, ConditionError, Evaluator, SubstitutionMode, UserAttributes};
pub use ruleauth_config::{AuthenticationMode, AuthorizationConfig};
