//! Filter rule sets and the AND combinator over one record.
//!
//! A rule set is combined with AND: one failing rule fails the record, an
//! empty set passes everything. The combinator is tolerant of dangling
//! references: a rule whose field was deleted after the rule was saved is
//! skipped as passing, so stale saved views never silently hide all records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::fields::{FieldDefinition, FieldValue};
use crate::predicate::{evaluate, FilterOperator};

/// One (field, operator, literal value) constraint.
///
/// `id` is opaque and client-generated, unique within a rule set. `value` is
/// a string literal parsed per the target field's category at evaluation
/// time; operators that take no operand (`is_empty`, `is_true`, ...) ignore
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub id: String,
    #[serde(rename = "fieldId")]
    pub field_id: i64,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterRule {
    pub fn new(
        id: impl Into<String>,
        field_id: i64,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field_id,
            operator,
            value: value.into(),
        }
    }
}

/// Field metadata lookup by field id.
pub type FieldIndex = HashMap<i64, FieldDefinition>;

/// Two-level value lookup: record id → field id → stored value.
pub type ValueIndex = HashMap<i64, HashMap<i64, FieldValue>>;

/// Check whether one record passes every rule in a set.
///
/// - Empty rule set: always true.
/// - A rule referencing a field absent from `fields` is skipped as passing.
/// - A record with no stored value for a rule's field is evaluated as absent,
///   not treated as an error.
pub fn passes_all(
    rules: &[FilterRule],
    record_id: i64,
    values: &ValueIndex,
    fields: &FieldIndex,
) -> bool {
    rules.iter().all(|rule| {
        let Some(field) = fields.get(&rule.field_id) else {
            // Dangling reference: the field was deleted after the rule was
            // saved. Skip rather than fail the record.
            trace!(
                rule_id = %rule.id,
                field_id = rule.field_id,
                "skipping rule for deleted field"
            );
            return true;
        };
        let value = values
            .get(&record_id)
            .and_then(|by_field| by_field.get(&rule.field_id));
        evaluate(rule, value, field)
    })
}

/// Filter a batch of records, preserving input order.
pub fn filter_records(
    rules: &[FilterRule],
    record_ids: &[i64],
    values: &ValueIndex,
    fields: &FieldIndex,
) -> Vec<i64> {
    record_ids
        .iter()
        .copied()
        .filter(|&id| passes_all(rules, id, values, fields))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
