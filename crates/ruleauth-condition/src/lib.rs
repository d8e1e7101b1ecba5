// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Evaluator for rule condition expressions.
//!
//! A condition is a flat boolean expression over the requesting user's
//! attributes, for example `score>5&&score<100||name!=abc`. The grammar is
//! small:
//!
//! - comparisons: `>=`, `>`, `<=`, `<`, `==`, `!=`
//! - combinators: `&&`, `||`, with `&&` binding tighter
//! - no parentheses, no quoting, no arithmetic
//!
//! Evaluation runs in four steps: strip whitespace, paste attribute values
//! over attribute names ([`substitute`]), split into operands and operators
//! ([`tokenize`]), then reduce comparisons and combinators to a boolean.
//!
//! Substitution is textual. In the default [`SubstitutionMode::Literal`] an
//! attribute named `id` also rewrites the `id` inside `uid`; rows should avoid
//! attribute names that are substrings of one another, or evaluators should
//! opt into [`SubstitutionMode::WordBoundary`].
//!
//! # Usage
//!
//! ```
//! use ruleauth_condition::{evaluate, UserAttributes};
//!
//! let user = UserAttributes::new().with("score", 30).with("name", "abc");
//! assert!(evaluate("score<50 && score<100 || name!=abc", &user).unwrap());
//! ```

pub mod compare;
pub mod error;
pub mod substitute;
pub mod token;
pub mod value;

mod reduce;

pub use compare::{parse_integer, parse_number};
pub use error::{ConditionError, Result};
pub use substitute::{strip_whitespace, substitute, SubstitutionMode};
pub use token::{tokenize, Operator, Tokens, OPERATOR_ALPHABET};
pub use value::{AttributeValue, UserAttributes};

use tracing::trace;

/// Condition evaluator with a fixed substitution mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
	mode: SubstitutionMode,
}

impl Evaluator {
	pub fn new(mode: SubstitutionMode) -> Self {
		Self { mode }
	}

	pub fn mode(&self) -> SubstitutionMode {
		self.mode
	}

	/// Evaluates `condition` against one user's attribute row.
	///
	/// # Errors
	///
	/// Returns a [`ConditionError`] when the condition is empty, ends with an
	/// operator, has a comparison without two operands, or has no operator.
	pub fn evaluate(&self, condition: &str, attributes: &UserAttributes) -> Result<bool> {
		let stripped = strip_whitespace(condition);
		if stripped.is_empty() {
			return Err(ConditionError::Empty);
		}

		let substituted = substitute(&stripped, attributes, self.mode);
		if substituted.chars().next_back().is_some_and(token::is_operator_char) {
			return Err(ConditionError::DanglingOperator {
				condition: substituted,
			});
		}

		let tokens = tokenize(&substituted);
		let outcome = reduce::reduce(&substituted, tokens)?;
		trace!(condition = %stripped, substituted = %substituted, outcome, "condition evaluated");
		Ok(outcome)
	}
}

/// Evaluates with literal substitution.
pub fn evaluate(condition: &str, attributes: &UserAttributes) -> Result<bool> {
	Evaluator::default().evaluate(condition, attributes)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn score(value: i64) -> UserAttributes {
		UserAttributes::new().with("score", value)
	}

	mod documented_examples {
		use super::*;

		#[test]
		fn and_chain_inside_range() {
			let condition = "score>5&&score<100&&score<100";
			assert!(evaluate(condition, &score(50)).unwrap());
			assert!(!evaluate(condition, &score(150)).unwrap());
		}

		#[test]
		fn mixed_chain_first_term_true() {
			let user = UserAttributes::new().with("score", 30).with("name", "abc");
			assert!(evaluate("score<50&&score<100||name!=abc", &user).unwrap());
		}

		#[test]
		fn mixed_chain_all_terms_false() {
			let user = UserAttributes::new().with("score", 60).with("name", "abc");
			assert!(!evaluate("score<50&&score<100||name!=abc", &user).unwrap());
		}

		#[test]
		fn whitespace_and_newlines_are_ignored() {
			let user = UserAttributes::new().with("score", 30).with("name", "abc");
			assert!(evaluate("score < 50 &&\n\tscore < 100 || name != abc", &user).unwrap());
		}

		#[test]
		fn leading_zero_or_chain() {
			assert!(evaluate("0||score>1", &score(2)).unwrap());
			assert!(!evaluate("0||score>1", &score(1)).unwrap());
		}

		#[test]
		fn leading_zero_before_and_chain() {
			assert!(evaluate("0||score>1&&score<5", &score(2)).unwrap());
			assert!(!evaluate("0||score>1&&score<5", &score(9)).unwrap());
		}

		#[test]
		fn trailing_operand_after_failed_and_chain() {
			assert!(!evaluate("score>1&&score<5||0", &score(9)).unwrap());
			assert!(evaluate("score>1&&score<5||vip", &score(9)).unwrap());
		}
	}

	mod errors {
		use super::*;

		#[test]
		fn empty_condition() {
			assert_eq!(evaluate("  \n ", &score(1)), Err(ConditionError::Empty));
		}

		#[test]
		fn dangling_operator() {
			assert!(matches!(
				evaluate("score>", &score(1)),
				Err(ConditionError::DanglingOperator { .. })
			));
			assert!(matches!(
				evaluate("score>1||", &score(1)),
				Err(ConditionError::DanglingOperator { .. })
			));
		}

		#[test]
		fn bare_attribute_has_no_operator() {
			assert!(matches!(
				evaluate("score", &score(1)),
				Err(ConditionError::NoOperator { .. })
			));
		}
	}

	mod quirks {
		use super::*;

		#[test]
		fn empty_attribute_value_compares_as_empty_string() {
			let user = UserAttributes::new().with("name", "");
			assert!(evaluate("name!=abc", &user).unwrap());
			assert!(!evaluate("name==abc", &user).unwrap());
		}

		#[test]
		fn literal_substitution_hits_longer_names() {
			let user = UserAttributes::new().with("id", 7).with("uid", 1);
			// `uid` became `u7` before `uid` itself was substituted.
			assert!(!evaluate("uid==1", &user).unwrap());
			assert!(evaluate("uid==u7", &user).unwrap());
		}

		#[test]
		fn word_boundary_mode_avoids_partial_hits() {
			let user = UserAttributes::new().with("id", 7).with("uid", 1);
			let strict = Evaluator::new(SubstitutionMode::WordBoundary);
			assert!(strict.evaluate("uid==1&&id==7", &user).unwrap());
		}

		#[test]
		fn large_integer_ids_compare_exactly() {
			let user = UserAttributes::new().with("uid", 9_007_199_254_740_993_i64);
			assert!(evaluate("uid!=9007199254740992", &user).unwrap());
			assert!(!evaluate("uid==9007199254740992", &user).unwrap());
			assert!(evaluate("uid>9007199254740992", &user).unwrap());
		}

		#[test]
		fn real_values_substitute_with_fourteen_digits() {
			let user = UserAttributes::new().with("balance", 0.1 + 0.2);
			assert!(evaluate("balance==0.3", &user).unwrap());
		}

		#[test]
		fn unknown_attribute_is_compared_as_text() {
			// `level` is not in the row, so "level" is compared with "3" as text.
			assert!(evaluate("level>3", &score(1)).unwrap());
		}
	}

	proptest! {
		#[test]
		fn single_comparison_matches_native(value in -1000i64..1000, bound in -1000i64..1000) {
			let user = score(value);
			prop_assert_eq!(evaluate(&format!("score>{bound}"), &user).unwrap(), value > bound);
			prop_assert_eq!(evaluate(&format!("score<={bound}"), &user).unwrap(), value <= bound);
			prop_assert_eq!(evaluate(&format!("score=={bound}"), &user).unwrap(), value == bound);
			prop_assert_eq!(evaluate(&format!("score!={bound}"), &user).unwrap(), value != bound);
		}

		#[test]
		fn and_chain_is_conjunction(value in 0i64..100, bounds in prop::collection::vec(0i64..100, 1..6)) {
			let condition = bounds
				.iter()
				.map(|b| format!("score>={b}"))
				.collect::<Vec<_>>()
				.join("&&");
			let expected = bounds.iter().all(|b| value >= *b);
			prop_assert_eq!(evaluate(&condition, &score(value)).unwrap(), expected);
		}

		#[test]
		fn or_chain_is_disjunction(value in 0i64..100, bounds in prop::collection::vec(0i64..100, 1..6)) {
			let condition = bounds
				.iter()
				.map(|b| format!("score=={b}"))
				.collect::<Vec<_>>()
				.join("||");
			let expected = bounds.iter().any(|b| value == *b);
			prop_assert_eq!(evaluate(&condition, &score(value)).unwrap(), expected);
		}
	}
}
