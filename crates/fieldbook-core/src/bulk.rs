//! Bulk edit dispatch: one type-correct update payload for many records.
//!
//! The dispatcher turns a raw UI input into exactly one typed channel,
//! selected by the target field's category. Clearing a field is an explicit
//! null in that channel, never a mixed or second channel. The multi-record
//! write itself (and its transaction boundary) belongs to the storage
//! collaborator; the engine only guarantees the payload is internally
//! consistent.
//!
//! Dispatch is guarded, not fallible: no selected field, no selected
//! records, or a derived (formula/rollup) field all yield `None`, a silent
//! no-op rather than an error.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::fields::{FieldCategory, FieldDefinition};
use crate::predicate::parse_timestamp_ms;

// =============================================================================
// BULK VALUE
// =============================================================================

/// The single typed channel of a bulk edit, selected by field category.
///
/// `None` inside a variant is the clearing value. Checkbox has no clearing
/// form; it is always a definite true or false.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkValue {
    /// text, url, email, select
    Text(Option<String>),
    /// number, currency, percent, rating
    Number(Option<f64>),
    /// date, as epoch milliseconds
    DateMillis(Option<i64>),
    /// checkbox
    Checkbox(bool),
    /// multiselect; an empty selection is normalized to `None`,
    /// never `Some(vec![])`
    Tags(Option<Vec<String>>),
}

/// One update payload: apply `value` to `custom_field_id` across
/// `record_ids`.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkEditPayload {
    pub custom_field_id: i64,
    pub record_ids: Vec<i64>,
    pub value: BulkValue,
}

impl Serialize for BulkEditPayload {
    /// Wire shape: `customFieldId`, `recordIds`, and exactly one value
    /// channel. The channel key is always present; a clearing value
    /// serializes as an explicit null.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BulkEditPayload", 3)?;
        state.serialize_field("customFieldId", &self.custom_field_id)?;
        state.serialize_field("recordIds", &self.record_ids)?;
        match &self.value {
            BulkValue::Text(v) => state.serialize_field("stringValue", v)?,
            BulkValue::Number(v) => state.serialize_field("numericValue", v)?,
            BulkValue::DateMillis(v) => state.serialize_field("dateValue", v)?,
            BulkValue::Checkbox(v) => state.serialize_field("booleanValue", v)?,
            BulkValue::Tags(v) => state.serialize_field("jsonValue", v)?,
        }
        state.end()
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Guarded entry point: no selected field is a no-op, not an error.
pub fn dispatch(
    field: Option<&FieldDefinition>,
    record_ids: &[i64],
    input: &JsonValue,
) -> Option<BulkEditPayload> {
    let Some(field) = field else {
        debug!(op = "bulk_edit", reason = "no field selected", "skipped");
        return None;
    };
    build_payload(field, record_ids, input)
}

/// Build the single typed payload for one field across many records.
///
/// Returns `None` when there is nothing to do: an empty record selection or
/// a derived field (which the editable-field pre-filter should have excluded
/// upstream).
pub fn build_payload(
    field: &FieldDefinition,
    record_ids: &[i64],
    input: &JsonValue,
) -> Option<BulkEditPayload> {
    if record_ids.is_empty() {
        debug!(
            op = "bulk_edit",
            field_id = field.id,
            reason = "no records selected",
            "skipped"
        );
        return None;
    }
    if !field.is_editable() {
        debug!(
            op = "bulk_edit",
            field_id = field.id,
            reason = "derived field",
            "skipped"
        );
        return None;
    }

    let value = match field.category() {
        FieldCategory::TextLike | FieldCategory::Select => {
            BulkValue::Text(coerce_string(input))
        }
        FieldCategory::Numeric => BulkValue::Number(coerce_number(input)),
        FieldCategory::Date => BulkValue::DateMillis(coerce_date_millis(input)),
        FieldCategory::Boolean => BulkValue::Checkbox(input.as_bool().unwrap_or(false)),
        FieldCategory::MultiSelect => BulkValue::Tags(coerce_tags(input)),
    };

    Some(BulkEditPayload {
        custom_field_id: field.id,
        record_ids: record_ids.to_vec(),
        value,
    })
}

/// Absent or empty input clears the string channel.
fn coerce_string(input: &JsonValue) -> Option<String> {
    input
        .as_str()
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

/// Accepts a JSON number or a numeric string; anything else clears.
fn coerce_number(input: &JsonValue) -> Option<f64> {
    match input {
        JsonValue::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Parses the input to epoch milliseconds; unparsable or absent input
/// clears the date.
fn coerce_date_millis(input: &JsonValue) -> Option<i64> {
    match input {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => parse_timestamp_ms(s),
        _ => None,
    }
}

/// Non-string entries are dropped; an empty result is normalized to `None`.
fn coerce_tags(input: &JsonValue) -> Option<Vec<String>> {
    let tags: Vec<String> = input
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect();
    (!tags.is_empty()).then_some(tags)
}

// =============================================================================
// VALUE-SELECTION CONTROLS
// =============================================================================

/// Rating control toggle: selecting the already-set value clears it,
/// selecting any other value replaces it. Never additive.
pub fn toggle_rating(current: Option<f64>, clicked: f64) -> Option<f64> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

/// Multiselect control toggle: checking appends, unchecking removes,
/// remaining order preserved.
pub fn toggle_tag(selected: &[String], tag: &str, checked: bool) -> Vec<String> {
    let mut out: Vec<String> = selected.iter().filter(|t| *t != tag).cloned().collect();
    if checked {
        out.push(tag.to_string());
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
