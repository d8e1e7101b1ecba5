// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute values substituted into conditions.
//!
//! Attribute rows come straight from the configured user table, so values are
//! loosely typed scalars. Each value is only ever used in its stringified form:
//! substitution pastes that text into the condition before tokenizing.
//!
//! Floats print with 14 significant digits, switching to `1.0E+21` style
//! below `0.0001` and from `1e14` up, so `0.1 + 0.2` substitutes as `0.3`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
	Null,
	Bool(bool),
	Integer(i64),
	Float(f64),
	Text(String),
}

impl fmt::Display for AttributeValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttributeValue::Null => Ok(()),
			AttributeValue::Bool(true) => write!(f, "1"),
			AttributeValue::Bool(false) => Ok(()),
			AttributeValue::Integer(v) => write!(f, "{v}"),
			AttributeValue::Float(v) => write_float(f, *v),
			AttributeValue::Text(v) => write!(f, "{v}"),
		}
	}
}

const FLOAT_DIGITS: i32 = 14;

fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
	if value.is_nan() {
		return f.write_str("NAN");
	}
	if value.is_infinite() {
		return f.write_str(if value < 0.0 { "-INF" } else { "INF" });
	}
	if value == 0.0 {
		return f.write_str(if value.is_sign_negative() { "-0" } else { "0" });
	}

	let scientific = format!("{:.*e}", (FLOAT_DIGITS - 1) as usize, value.abs());
	let Some((mantissa, exponent)) = scientific.split_once('e') else {
		return write!(f, "{value}");
	};
	let Ok(exponent) = exponent.parse::<i32>() else {
		return write!(f, "{value}");
	};
	let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
	let digits = digits.trim_end_matches('0');

	if value < 0.0 {
		f.write_str("-")?;
	}

	if exponent < -4 || exponent >= FLOAT_DIGITS {
		let (lead, rest) = digits.split_at(1);
		let rest = if rest.is_empty() { "0" } else { rest };
		let sign = if exponent < 0 { '-' } else { '+' };
		return write!(f, "{lead}.{rest}E{sign}{}", exponent.abs());
	}

	let point = exponent + 1;
	if point <= 0 {
		let zeros = "0".repeat(point.unsigned_abs() as usize);
		write!(f, "0.{zeros}{digits}")
	} else {
		let point = point as usize;
		if digits.len() <= point {
			write!(f, "{digits}{}", "0".repeat(point - digits.len()))
		} else {
			let (whole, fraction) = digits.split_at(point);
			write!(f, "{whole}.{fraction}")
		}
	}
}

impl From<i64> for AttributeValue {
	fn from(value: i64) -> Self {
		AttributeValue::Integer(value)
	}
}

impl From<i32> for AttributeValue {
	fn from(value: i32) -> Self {
		AttributeValue::Integer(value.into())
	}
}

impl From<f64> for AttributeValue {
	fn from(value: f64) -> Self {
		AttributeValue::Float(value)
	}
}

impl From<bool> for AttributeValue {
	fn from(value: bool) -> Self {
		AttributeValue::Bool(value)
	}
}

impl From<&str> for AttributeValue {
	fn from(value: &str) -> Self {
		AttributeValue::Text(value.to_string())
	}
}

impl From<String> for AttributeValue {
	fn from(value: String) -> Self {
		AttributeValue::Text(value)
	}
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(AttributeValue::Null, Into::into)
	}
}

/// One user's attribute row, in source column order.
///
/// Order matters: substitution walks the row front to back, and a name that
/// is a substring of a later name (or of an already substituted value) will
/// rewrite it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserAttributes {
	entries: Vec<(String, AttributeValue)>,
}

impl UserAttributes {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name`, keeping its original position when it already exists.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
		let name = name.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn get(&self, name: &str) -> Option<&AttributeValue> {
		self
			.entries
			.iter()
			.find(|(existing, _)| existing == name)
			.map(|(_, value)| value)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
		self.entries.iter().map(|(name, value)| (name.as_str(), value))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for UserAttributes
where
	K: Into<String>,
	V: Into<AttributeValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attributes = UserAttributes::new();
		for (name, value) in iter {
			attributes.insert(name, value);
		}
		attributes
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_follows_loose_string_conversion() {
		assert_eq!(AttributeValue::Integer(42).to_string(), "42");
		assert_eq!(AttributeValue::Float(2.0).to_string(), "2");
		assert_eq!(AttributeValue::Float(1.5).to_string(), "1.5");
		assert_eq!(AttributeValue::Bool(true).to_string(), "1");
		assert_eq!(AttributeValue::Bool(false).to_string(), "");
		assert_eq!(AttributeValue::Null.to_string(), "");
		assert_eq!(AttributeValue::from("abc").to_string(), "abc");
	}

	#[test]
	fn floats_print_with_fourteen_significant_digits() {
		let text = |v: f64| AttributeValue::Float(v).to_string();
		assert_eq!(text(0.1 + 0.2), "0.3");
		assert_eq!(text(-2.5), "-2.5");
		assert_eq!(text(1234.5678), "1234.5678");
		assert_eq!(text(0.0001), "0.0001");
		assert_eq!(text(0.00001), "1.0E-5");
		assert_eq!(text(1.25e-7), "1.25E-7");
		assert_eq!(text(10_000_000_000_000.0), "10000000000000");
		assert_eq!(text(1e14), "1.0E+14");
		assert_eq!(text(1e21), "1.0E+21");
		assert_eq!(text(123_456_789_012_345_678.0), "1.2345678901235E+17");
		assert_eq!(text(0.0), "0");
	}

	#[test]
	fn insert_preserves_first_position() {
		let attributes = UserAttributes::new()
			.with("uid", 1)
			.with("score", 10)
			.with("uid", 7);

		let names: Vec<&str> = attributes.iter().map(|(name, _)| name).collect();
		assert_eq!(names, vec!["uid", "score"]);
		assert_eq!(attributes.get("uid"), Some(&AttributeValue::Integer(7)));
	}

	#[test]
	fn untagged_deserialization_picks_scalar_kind() {
		let values: Vec<AttributeValue> =
			serde_json::from_str(r#"[null, true, 3, 2.5, "abc"]"#).unwrap();
		assert_eq!(
			values,
			vec![
				AttributeValue::Null,
				AttributeValue::Bool(true),
				AttributeValue::Integer(3),
				AttributeValue::Float(2.5),
				AttributeValue::Text("abc".to_string()),
			]
		);
	}

	#[test]
	fn option_maps_none_to_null() {
		let value: AttributeValue = Option::<i64>::None.into();
		assert_eq!(value, AttributeValue::Null);
	}
}
