// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loose comparison of operand text.
//!
//! Exactly two paths: numeric when both operands parse as decimal numbers,
//! byte-wise string ordering otherwise. Two integer literals compare exactly;
//! anything with a fraction or exponent, or too wide for `i128`, compares as
//! `f64`.

use std::cmp::Ordering;

use crate::token::Operator;

/// Parses a plain decimal literal (`12`, `-3.5`, `.5`, `1e3`). Words such as
/// `inf` or `NaN` that `f64::from_str` would accept are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
	let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
	if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
		return None;
	}
	if !unsigned
		.chars()
		.all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
	{
		return None;
	}
	text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses an optionally signed run of digits (`42`, `-7`, `+007`).
pub fn parse_integer(text: &str) -> Option<i128> {
	let digits = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	text.parse().ok()
}

fn ordering(left: &str, right: &str) -> Option<Ordering> {
	if let (Some(l), Some(r)) = (parse_integer(left), parse_integer(right)) {
		return Some(l.cmp(&r));
	}
	match (parse_number(left), parse_number(right)) {
		(Some(l), Some(r)) => l.partial_cmp(&r),
		_ => Some(left.cmp(right)),
	}
}

/// Applies a comparison operator. Combinators and unsupported operators
/// compare as `false`.
pub fn compare(operator: &Operator, left: &str, right: &str) -> bool {
	let Some(ord) = ordering(left, right) else {
		return false;
	};
	match operator {
		Operator::Ge => ord != Ordering::Less,
		Operator::Gt => ord == Ordering::Greater,
		Operator::Le => ord != Ordering::Greater,
		Operator::Lt => ord == Ordering::Less,
		Operator::Eq => ord == Ordering::Equal,
		Operator::Ne => ord != Ordering::Equal,
		Operator::And | Operator::Or | Operator::Unsupported(_) => false,
	}
}

/// Truthiness of a bare operand pulled into an `||` chain.
pub fn truthy(operand: &str) -> bool {
	!operand.is_empty() && operand != "0"
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn numbers_compare_numerically() {
		assert!(compare(&Operator::Lt, "9", "10"));
		assert!(compare(&Operator::Eq, "1.0", "1"));
		assert!(compare(&Operator::Gt, "1e3", "999"));
		assert!(compare(&Operator::Le, "-5", "-5"));
	}

	#[test]
	fn large_integers_compare_exactly() {
		// Both sides round to 2^53 as f64.
		let (big, neighbour) = ("9007199254740993", "9007199254740992");
		assert!(compare(&Operator::Ne, big, neighbour));
		assert!(!compare(&Operator::Eq, big, neighbour));
		assert!(compare(&Operator::Gt, big, neighbour));
		assert!(compare(&Operator::Lt, "-9223372036854775808", "-9223372036854775807"));
		assert!(compare(&Operator::Eq, "007", "+7"));
	}

	#[test]
	fn integer_against_fraction_compares_as_float() {
		assert!(compare(&Operator::Eq, "3", "3.0"));
		assert!(compare(&Operator::Lt, "3", "3.5"));
		// Wider than i128: both sides fall back to f64.
		assert!(compare(&Operator::Eq, "1000000000000000000000000000000000000000", "1e39"));
	}

	#[test]
	fn integer_literals() {
		assert_eq!(parse_integer("42"), Some(42));
		assert_eq!(parse_integer("-7"), Some(-7));
		assert_eq!(parse_integer("+007"), Some(7));
		assert_eq!(parse_integer("1.0"), None);
		assert_eq!(parse_integer("1e3"), None);
		assert_eq!(parse_integer("-"), None);
		assert_eq!(parse_integer(""), None);
	}

	#[test]
	fn mixed_operands_compare_as_strings() {
		// "9" > "10a" byte-wise, but 9 < 10 numerically.
		assert!(compare(&Operator::Gt, "9", "10a"));
		assert!(compare(&Operator::Ne, "abc", "abd"));
		assert!(compare(&Operator::Eq, "abc", "abc"));
		assert!(compare(&Operator::Lt, "", "1"));
	}

	#[test]
	fn non_numeric_words_are_not_numbers() {
		assert_eq!(parse_number("inf"), None);
		assert_eq!(parse_number("NaN"), None);
		assert_eq!(parse_number("1e"), None);
		assert_eq!(parse_number(""), None);
		assert_eq!(parse_number("."), None);
		assert_eq!(parse_number("+7"), Some(7.0));
		assert_eq!(parse_number(".5"), Some(0.5));
	}

	#[test]
	fn unsupported_operators_are_false() {
		let op = Operator::Unsupported("=>".to_string());
		assert!(!compare(&op, "1", "1"));
		assert!(!compare(&Operator::And, "1", "1"));
	}

	#[test]
	fn truthiness_of_bare_operands() {
		assert!(!truthy(""));
		assert!(!truthy("0"));
		assert!(truthy("0.0"));
		assert!(truthy("abc"));
	}

	proptest! {
		#[test]
		fn integer_comparisons_match_native(a: i64, b: i64) {
			let (l, r) = (a.to_string(), b.to_string());
			prop_assert_eq!(compare(&Operator::Lt, &l, &r), a < b);
			prop_assert_eq!(compare(&Operator::Ge, &l, &r), a >= b);
			prop_assert_eq!(compare(&Operator::Eq, &l, &r), a == b);
		}

		#[test]
		fn equals_and_not_equals_are_complementary(l in "[a-z0-9]{0,6}", r in "[a-z0-9]{0,6}") {
			prop_assert_eq!(compare(&Operator::Eq, &l, &r), !compare(&Operator::Ne, &l, &r));
		}
	}
}
