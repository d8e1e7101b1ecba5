// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rule resolution: which of a user's candidate rules are satisfied.

use ruleauth_condition::{ConditionError, Evaluator, UserAttributes};
use tracing::warn;

use crate::types::{GrantedRules, RuleRecord};

/// A conditional rule that could not be evaluated and was not granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionFailure {
	pub rule: String,
	pub error: ConditionError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleResolution {
	pub granted: GrantedRules,
	pub failures: Vec<ConditionFailure>,
}

/// Evaluates each rule against the user's attribute row.
///
/// Unconditional rules are always granted. Conditional rules are granted when
/// their condition evaluates to `true`; evaluation errors and a missing
/// attribute row deny the rule and are reported in
/// [`RuleResolution::failures`].
pub fn resolve_rules(
	rules: &[RuleRecord],
	attributes: Option<&UserAttributes>,
	evaluator: &Evaluator,
) -> RuleResolution {
	let mut resolution = RuleResolution::default();

	for rule in rules {
		if !rule.is_conditional() {
			resolution.granted.insert(&rule.name);
			continue;
		}

		let outcome = match attributes {
			Some(attributes) => evaluator.evaluate(&rule.condition, attributes),
			None => Err(ConditionError::MissingAttributes {
				condition: rule.condition.clone(),
			}),
		};

		match outcome {
			Ok(true) => resolution.granted.insert(&rule.name),
			Ok(false) => {}
			Err(error) => {
				warn!(
					rule = %rule.name,
					rule_id = %rule.id,
					condition = %rule.condition,
					error = %error,
					"rule condition could not be evaluated, denying rule"
				);
				resolution.failures.push(ConditionFailure {
					rule: rule.name.clone(),
					error,
				});
			}
		}
	}

	resolution
}

#[cfg(test)]
mod tests {
	use super::*;
	use ruleauth_condition::SubstitutionMode;

	fn user(score: i64) -> UserAttributes {
		UserAttributes::new()
			.with("uid", 1)
			.with("score", score)
			.with("name", "abc")
	}

	fn rules() -> Vec<RuleRecord> {
		vec![
			RuleRecord::new(1, "Admin", ""),
			RuleRecord::new(2, "mid_score", "score>5 && score<100"),
			RuleRecord::new(3, "low_or_renamed", "score<50&&score<100||name!=abc"),
			RuleRecord::new(4, "broken", "score>"),
		]
	}

	#[test]
	fn unconditional_rules_are_granted_lowercased() {
		let resolution = resolve_rules(&rules()[..1], None, &Evaluator::default());
		assert!(resolution.granted.contains("admin"));
		assert!(resolution.failures.is_empty());
	}

	#[test]
	fn conditional_rules_follow_attributes() {
		let resolution = resolve_rules(&rules(), Some(&user(30)), &Evaluator::default());
		let names: Vec<&str> = resolution.granted.iter().collect();
		assert_eq!(names, vec!["admin", "low_or_renamed", "mid_score"]);

		let resolution = resolve_rules(&rules(), Some(&user(60)), &Evaluator::default());
		let names: Vec<&str> = resolution.granted.iter().collect();
		assert_eq!(names, vec!["admin", "mid_score"]);
	}

	#[test]
	fn broken_condition_denies_rule_and_reports_failure() {
		let resolution = resolve_rules(&rules(), Some(&user(30)), &Evaluator::default());
		assert!(!resolution.granted.contains("broken"));
		assert_eq!(resolution.failures.len(), 1);
		assert_eq!(resolution.failures[0].rule, "broken");
		assert!(matches!(
			resolution.failures[0].error,
			ConditionError::DanglingOperator { .. }
		));
	}

	#[test]
	fn missing_attribute_row_denies_conditional_rules_only() {
		let resolution = resolve_rules(&rules(), None, &Evaluator::default());
		let names: Vec<&str> = resolution.granted.iter().collect();
		assert_eq!(names, vec!["admin"]);
		assert_eq!(resolution.failures.len(), 3);
		assert!(resolution
			.failures
			.iter()
			.all(|f| matches!(f.error, ConditionError::MissingAttributes { .. })));
	}

	#[test]
	fn evaluator_mode_is_honoured() {
		let attributes = UserAttributes::new().with("id", 7).with("uid", 1);
		let rules = vec![RuleRecord::new(1, "own", "uid==1")];

		let literal = resolve_rules(&rules, Some(&attributes), &Evaluator::default());
		assert!(literal.granted.is_empty());

		let strict = Evaluator::new(SubstitutionMode::WordBoundary);
		let strict = resolve_rules(&rules, Some(&attributes), &strict);
		assert!(strict.granted.contains("own"));
	}
}
