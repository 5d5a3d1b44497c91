//! Predicate evaluation: one filter rule against one field value.
//!
//! `evaluate` is a total function. It never errors and never panics;
//! malformed rule literals, missing values, and corrupted storage all resolve
//! to a defined boolean. Operators a category does not support resolve to a
//! default pass: a misconfigured rule shows extra records rather than hiding
//! valid ones.
//!
//! # Evaluation order
//!
//! 1. Universal operators (`is_empty`, `is_not_empty`, `is_true`, `is_false`)
//!    are resolved before any category logic, including when the record has
//!    no stored value at all.
//! 2. Any other operator against an absent value fails.
//! 3. Otherwise an exhaustive match on the field's category applies the
//!    per-category operator table.

use serde::{Deserialize, Serialize};

use crate::fields::{FieldCategory, FieldDefinition, FieldValue};
use crate::filter::FilterRule;

/// Day granularity for date `equals`, in milliseconds.
///
/// Date equality tolerates anything under 24 hours of drift so that
/// time-of-day and timezone noise in stored timestamps does not break
/// same-day matches.
pub const DAY_MS: i64 = 86_400_000;

// =============================================================================
// FILTER OPERATOR
// =============================================================================

/// The closed set of filter operators.
///
/// Each field category supports a subset; see the per-category tables in
/// [`evaluate`]. The last four are universal and apply to every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Before,
    After,
    IsTrue,
    IsFalse,
    IsEmpty,
    IsNotEmpty,
}

impl FilterOperator {
    /// Whether this operator is resolved by the universal pre-checks,
    /// before any category logic runs.
    pub fn is_universal(&self) -> bool {
        matches!(
            self,
            Self::IsEmpty | Self::IsNotEmpty | Self::IsTrue | Self::IsFalse
        )
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::LessOrEqual => "less_or_equal",
            Self::Before => "before",
            Self::After => "after",
            Self::IsTrue => "is_true",
            Self::IsFalse => "is_false",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equals" => Ok(Self::Equals),
            "not_equals" => Ok(Self::NotEquals),
            "contains" => Ok(Self::Contains),
            "not_contains" => Ok(Self::NotContains),
            "greater_than" => Ok(Self::GreaterThan),
            "less_than" => Ok(Self::LessThan),
            "greater_or_equal" => Ok(Self::GreaterOrEqual),
            "less_or_equal" => Ok(Self::LessOrEqual),
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "is_true" => Ok(Self::IsTrue),
            "is_false" => Ok(Self::IsFalse),
            "is_empty" => Ok(Self::IsEmpty),
            "is_not_empty" => Ok(Self::IsNotEmpty),
            _ => Err(format!("Invalid filter operator: {}", s)),
        }
    }
}

// =============================================================================
// LITERAL PARSING
// =============================================================================

/// Parse a rule's date literal into epoch milliseconds.
///
/// Accepted forms, tried in order: raw epoch milliseconds, RFC 3339, and
/// plain `YYYY-MM-DD` (midnight UTC). Anything else fails the rule.
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ms) = raw.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    None
}

fn parse_number(raw: &str) -> Option<f64> {
    let parsed = raw.trim().parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}

// =============================================================================
// EVALUATION
// =============================================================================

/// Evaluate one filter rule against one field value.
///
/// `value` is `None` when the record has no stored value for the field at
/// all; a present `FieldValue` may still have its authoritative channel
/// unset ("stored but empty").
pub fn evaluate(rule: &FilterRule, value: Option<&FieldValue>, field: &FieldDefinition) -> bool {
    let category = field.category();

    // Universal pre-checks, resolved before category logic.
    match rule.operator {
        FilterOperator::IsEmpty => return is_empty(value, category),
        FilterOperator::IsNotEmpty => return !is_empty(value, category),
        // `is_true` requires a strict stored true.
        FilterOperator::IsTrue => {
            return value.and_then(|v| v.boolean_value) == Some(true);
        }
        // `is_false` also passes on absent or unset, asymmetric with
        // `is_true`: an unchecked box that was never touched is still false.
        FilterOperator::IsFalse => {
            return value.and_then(|v| v.boolean_value) != Some(true);
        }
        _ => {}
    }

    // Every remaining operator needs a stored value to compare against.
    let Some(value) = value else {
        return false;
    };

    match category {
        FieldCategory::TextLike => {
            let stored = value.string_value.as_deref().unwrap_or("").to_lowercase();
            let needle = rule.value.to_lowercase();
            match rule.operator {
                FilterOperator::Equals => stored == needle,
                FilterOperator::Contains => stored.contains(&needle),
                FilterOperator::NotContains => !stored.contains(&needle),
                // Unsupported operator for this category: default pass.
                _ => true,
            }
        }
        FieldCategory::Numeric => {
            let (Some(stored), Some(target)) = (value.numeric_value, parse_number(&rule.value))
            else {
                return false;
            };
            match rule.operator {
                FilterOperator::Equals => stored == target,
                FilterOperator::NotEquals => stored != target,
                FilterOperator::GreaterThan => stored > target,
                FilterOperator::LessThan => stored < target,
                FilterOperator::GreaterOrEqual => stored >= target,
                FilterOperator::LessOrEqual => stored <= target,
                _ => true,
            }
        }
        FieldCategory::Date => {
            let (Some(stored), Some(target)) = (value.date_value, parse_timestamp_ms(&rule.value))
            else {
                return false;
            };
            match rule.operator {
                // Day-granularity tolerance, deliberately not exact-millisecond.
                FilterOperator::Equals => (stored - target).abs() < DAY_MS,
                FilterOperator::Before => stored < target,
                FilterOperator::After => stored > target,
                _ => true,
            }
        }
        FieldCategory::Select => {
            let stored = value.string_value.as_deref().unwrap_or("");
            match rule.operator {
                FilterOperator::Equals => stored == rule.value,
                FilterOperator::NotEquals => stored != rule.value,
                _ => true,
            }
        }
        FieldCategory::MultiSelect => {
            let tags = value.decoded_tags();
            match rule.operator {
                FilterOperator::Contains => tags.iter().any(|t| t == &rule.value),
                FilterOperator::NotContains => !tags.iter().any(|t| t == &rule.value),
                _ => true,
            }
        }
        // Checkbox is fully handled by the universal pre-checks; any other
        // operator on it falls back to the default pass.
        FieldCategory::Boolean => true,
    }
}

/// Per-category emptiness, shared by `is_empty` and `is_not_empty` so the
/// negation law holds on identical inputs.
fn is_empty(value: Option<&FieldValue>, category: FieldCategory) -> bool {
    match value {
        None => true,
        Some(v) => v.is_empty_for(category),
    }
}

// =============================================================================
// TESTS
// =============================================================================
