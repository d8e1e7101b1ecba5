// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Character-level scanner splitting a substituted condition into operands
//! and operators.
//!
//! The scanner does not validate anything. Every character of the operator
//! alphabet starts an operator candidate; a two-character window that occurs
//! anywhere in [`OPERATOR_ALPHABET`] wins over a single character, and a lone
//! `=`, `&` or `|` stays part of the surrounding operand. Windows such as `=>`
//! or `|!` are therefore valid tokens that compare as [`Operator::Unsupported`].

use std::fmt;

/// Every supported operator, concatenated. Two-character windows are matched
/// as substrings of this string.
pub const OPERATOR_ALPHABET: &str = ">=><=<&&==||!=";

/// Single characters that never become an operator on their own.
const SWALLOWED: [char; 3] = ['=', '&', '|'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
	Ge,
	Gt,
	Le,
	Lt,
	Eq,
	Ne,
	And,
	Or,
	/// A window of the alphabet that is not one of the operators above.
	/// Evaluates to `false` as a comparison.
	Unsupported(String),
}

impl Operator {
	fn from_symbol(symbol: &str) -> Self {
		match symbol {
			">=" => Operator::Ge,
			">" => Operator::Gt,
			"<=" => Operator::Le,
			"<" => Operator::Lt,
			"==" => Operator::Eq,
			"!=" => Operator::Ne,
			"&&" => Operator::And,
			"||" => Operator::Or,
			other => Operator::Unsupported(other.to_string()),
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Operator::Ge => ">=",
			Operator::Gt => ">",
			Operator::Le => "<=",
			Operator::Lt => "<",
			Operator::Eq => "==",
			Operator::Ne => "!=",
			Operator::And => "&&",
			Operator::Or => "||",
			Operator::Unsupported(symbol) => symbol,
		}
	}

	/// `&&` and `||` combine comparison results; everything else compares.
	pub fn is_combinator(&self) -> bool {
		matches!(self, Operator::And | Operator::Or)
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Scanner output. There is always exactly one more operand than operators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
	pub operands: Vec<String>,
	pub operators: Vec<Operator>,
}

pub(crate) fn is_operator_char(c: char) -> bool {
	OPERATOR_ALPHABET.contains(c)
}

/// Splits `input` into operands and operators. `input` is expected to be
/// whitespace-free and already substituted.
pub fn tokenize(input: &str) -> Tokens {
	let chars: Vec<char> = input.chars().collect();
	let mut tokens = Tokens::default();
	// Set after a two-character operator so its second character is not
	// scanned again as a single-character operator.
	let mut in_pair = false;
	let mut start = 0;

	for i in 0..chars.len() {
		if !is_operator_char(chars[i]) {
			continue;
		}

		let window: String = chars[i..chars.len().min(i + 2)].iter().collect();
		if OPERATOR_ALPHABET.contains(window.as_str()) {
			in_pair = true;
			tokens.operators.push(Operator::from_symbol(&window));
			tokens.operands.push(collect(&chars, start, i));
			start = i + 2;
		} else if in_pair {
			in_pair = false;
		} else if !SWALLOWED.contains(&chars[i]) {
			tokens.operators.push(Operator::from_symbol(&chars[i].to_string()));
			tokens.operands.push(collect(&chars, start, i));
			start = i + 1;
		}
	}
	tokens.operands.push(collect(&chars, start, chars.len()));

	tokens
}

fn collect(chars: &[char], start: usize, end: usize) -> String {
	if start >= end {
		return String::new();
	}
	chars[start..end].iter().collect()
}
