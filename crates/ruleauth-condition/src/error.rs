// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Reasons a condition could not be evaluated.
///
/// Callers resolving rules treat every variant as "not satisfied"; the error
/// exists so the failure can be logged against the offending rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
	#[error("condition is empty")]
	Empty,

	#[error("condition `{condition}` ends with an operator")]
	DanglingOperator { condition: String },

	#[error("operator `{operator}` in `{condition}` is missing an operand")]
	MissingOperand { operator: String, condition: String },

	#[error("condition `{condition}` contains no operator")]
	NoOperator { condition: String },

	#[error("no attribute row available to evaluate `{condition}`")]
	MissingAttributes { condition: String },
}

pub type Result<T> = std::result::Result<T, ConditionError>;
