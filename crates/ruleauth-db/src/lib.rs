// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite storage for ruleauth.
//!
//! [`SqliteAuthorizationStore`] implements
//! [`AuthorizationStore`](ruleauth_core::AuthorizationStore) over a
//! [`SqlitePool`](sqlx::SqlitePool), using the table names from
//! [`TablesConfig`](ruleauth_config::TablesConfig).
//!
//! ```ignore
//! let config = ruleauth_config::load_config()?;
//! let store = SqliteAuthorizationStore::connect(&config).await?;
//! let checker = Checker::from_config(Arc::new(store), None, &config.authorization)?;
//! ```

pub mod error;
pub mod pool;
pub mod store;
pub mod testing;

pub use error::{DbError, Result};
pub use pool::create_pool;
pub use store::SqliteAuthorizationStore;
