// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Two-pass reduction of a token stream to a boolean.
//!
//! Pass one walks the operators left to right, resolving every comparison
//! into a result and recording `&&`/`||` in order. Pass two folds the results
//! according to that combinator sequence, `&&` before `||`.

use std::collections::VecDeque;

use crate::compare::{compare, truthy};
use crate::error::{ConditionError, Result};
use crate::token::{Operator, Tokens};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
	And,
	Or,
}

pub(crate) fn reduce(condition: &str, tokens: Tokens) -> Result<bool> {
	if tokens.operators.is_empty() {
		return Err(ConditionError::NoOperator {
			condition: condition.to_string(),
		});
	}

	let mut operands: VecDeque<String> = tokens.operands.into();
	let mut results = Vec::new();
	let mut combinators = Vec::new();

	for (index, operator) in tokens.operators.iter().enumerate() {
		match operator {
			Operator::And => combinators.push(Combinator::And),
			Operator::Or => {
				combinators.push(Combinator::Or);
				// `0||x>1`: the leading bare operand joins the OR chain.
				if index == 0 {
					if let Some(operand) = operands.pop_front() {
						results.push(truthy(&operand));
					}
				}
				// `x>1||0`: so does a trailing one.
				if operands.len() == 1 {
					if let Some(operand) = operands.pop_front() {
						results.push(truthy(&operand));
					}
				}
			}
			comparison => {
				let missing = || ConditionError::MissingOperand {
					operator: comparison.to_string(),
					condition: condition.to_string(),
				};
				let left = operands.pop_front().ok_or_else(missing)?;
				let right = operands.pop_front().ok_or_else(missing)?;
				results.push(compare(comparison, &left, &right));
			}
		}
	}

	Ok(combine(&combinators, results))
}

fn combine(combinators: &[Combinator], results: Vec<bool>) -> bool {
	let has_and = combinators.contains(&Combinator::And);
	let has_or = combinators.contains(&Combinator::Or);

	match (has_and, has_or) {
		(false, false) => results.first().copied().unwrap_or(false),
		(true, false) => results.iter().all(|r| *r),
		(false, true) => results.iter().any(|r| *r),
		(true, true) => {
			let mut pending: VecDeque<bool> = results.into();
			let mut disjuncts = Vec::new();
			for combinator in combinators {
				match combinator {
					Combinator::And => {
						let left = pending.pop_front().unwrap_or(false);
						let right = pending.pop_front().unwrap_or(false);
						pending.push_front(left && right);
					}
					Combinator::Or => disjuncts.push(pending.pop_front().unwrap_or(false)),
				}
				if pending.len() == 1 {
					disjuncts.extend(pending.pop_front());
				}
			}
			disjuncts.into_iter().any(|d| d)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::token::tokenize;

	fn run(input: &str) -> Result<bool> {
		reduce(input, tokenize(input))
	}

	#[test]
	fn and_binds_tighter_than_or() {
		assert!(run("1<2&&2<1||3==3").unwrap());
		assert!(run("3==3||1<2&&2<1").unwrap());
		assert!(!run("1<2&&2<1||3==4").unwrap());
		assert!(run("1>2&&1>2||1<2&&1<2").unwrap());
		assert!(!run("1<2&&1>2||1>2&&1<2").unwrap());
	}

	#[test]
	fn leading_bare_operand_joins_or_chain() {
		assert!(!run("0||5>6").unwrap());
		assert!(run("1||5>6").unwrap());
		assert!(run("0||5<6").unwrap());
	}

	#[test]
	fn trailing_bare_operand_joins_or_chain() {
		assert!(run("5>6||abc").unwrap());
		assert!(!run("5>6||0").unwrap());
	}

	#[test]
	fn bare_operands_on_both_sides() {
		assert!(run("0||1").unwrap());
		assert!(!run("0||0").unwrap());
	}

	#[test]
	fn leading_bare_operand_joins_mixed_chain() {
		assert!(run("0||1<2&&2<3").unwrap());
		assert!(!run("0||1<2&&2<1").unwrap());
		assert!(run("abc||1<2&&2<1").unwrap());
	}

	#[test]
	fn trailing_bare_operand_joins_mixed_chain() {
		assert!(!run("1<2&&2<1||0").unwrap());
		assert!(run("1<2&&2<1||abc").unwrap());
		assert!(run("1<2&&2<3||0").unwrap());
	}

	#[test]
	fn bare_operand_between_and_and_or_shifts_operands() {
		// The `0` becomes the left side of `<` and `4` is never read.
		assert!(run("1<2&&0||3<4").unwrap());
		assert!(!run("2<1&&0||5<4").unwrap());
	}

	#[test]
	fn operand_after_and_is_ignored() {
		// Only comparisons feed `&&`; the bare `0` never becomes a result.
		assert!(run("1==1&&0").unwrap());
	}

	#[test]
	fn chained_comparison_is_missing_an_operand() {
		let err = run("1<2<3").unwrap_err();
		assert_eq!(
			err,
			ConditionError::MissingOperand {
				operator: "<".to_string(),
				condition: "1<2<3".to_string(),
			}
		);
	}

	#[test]
	fn no_operator_is_an_error() {
		assert!(matches!(run("abc"), Err(ConditionError::NoOperator { .. })));
		assert!(matches!(run("a=b"), Err(ConditionError::NoOperator { .. })));
	}

	#[test]
	fn unsupported_comparison_is_false_but_can_be_rescued_by_or() {
		assert!(!run("1=>1").unwrap());
		assert!(run("1=>1||2==2").unwrap());
	}

	#[test]
	fn combine_with_no_results_is_false_or_vacuous() {
		assert!(!combine(&[], Vec::new()));
		assert!(combine(&[Combinator::And], Vec::new()));
		assert!(!combine(&[Combinator::Or], Vec::new()));
	}
}
