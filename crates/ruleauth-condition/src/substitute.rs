// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Whitespace stripping and attribute substitution.

use serde::{Deserialize, Serialize};

use crate::value::UserAttributes;

/// How attribute names are located inside a condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
	/// Replace every literal occurrence of the name, even inside longer
	/// identifiers (`id` also rewrites `uid`).
	#[default]
	Literal,
	/// Replace only occurrences not adjacent to `[A-Za-z0-9_]`.
	WordBoundary,
}

/// Removes spaces, tabs, carriage returns and newlines.
pub fn strip_whitespace(condition: &str) -> String {
	condition
		.chars()
		.filter(|c| !matches!(c, ' ' | '\t' | '\r' | '\n'))
		.collect()
}

/// Pastes each attribute's stringified value over its name, in row order.
pub fn substitute(condition: &str, attributes: &UserAttributes, mode: SubstitutionMode) -> String {
	let mut text = condition.to_string();
	for (name, value) in attributes.iter() {
		if name.is_empty() {
			continue;
		}
		let replacement = value.to_string();
		text = match mode {
			SubstitutionMode::Literal => text.replace(name, &replacement),
			SubstitutionMode::WordBoundary => replace_words(&text, name, &replacement),
		};
	}
	text
}

fn is_identifier_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

fn replace_words(text: &str, name: &str, replacement: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut last = 0;
	for (start, matched) in text.match_indices(name) {
		let end = start + matched.len();
		let before = text[..start].chars().next_back();
		let after = text[end..].chars().next();
		if before.is_some_and(is_identifier_char) || after.is_some_and(is_identifier_char) {
			continue;
		}
		out.push_str(&text[last..start]);
		out.push_str(replacement);
		last = end;
	}
	out.push_str(&text[last..]);
	out
}
