//! Custom field data model and the field type registry.
//!
//! A custom field is a user-defined, typed attribute attached to records.
//! This module provides:
//!
//! - `FieldType`: the closed set of field types users can create
//! - `FieldCategory`: the evaluation/update category each type maps to
//! - `FieldDefinition`: per-field metadata (id, name, type, select options)
//! - `FieldValue`: one record's value for one field, held in exclusive
//!   typed channels
//!
//! # Exclusive channels
//!
//! A `FieldValue` carries one channel per representable type; only the
//! channel matching the field's type is authoritative, the rest stay unset.
//! Multiselect values are stored as a JSON-encoded string array in
//! `json_value` and decoded defensively: corrupted storage yields an empty
//! tag list, never an error.

use serde::{Deserialize, Serialize};

// =============================================================================
// FIELD TYPE
// =============================================================================

/// The closed set of custom field types.
///
/// `Formula` and `Rollup` are derived, read-only types: they can be filtered
/// on (as text) but are excluded from the editable set offered to bulk edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Url,
    Email,
    Number,
    Currency,
    Percent,
    Rating,
    Checkbox,
    Date,
    Select,
    #[serde(rename = "multiselect")]
    MultiSelect,
    Formula,
    Rollup,
}

impl FieldType {
    /// Map this type to its evaluation/update category.
    pub fn category(&self) -> FieldCategory {
        match self {
            Self::Text | Self::Url | Self::Email | Self::Formula | Self::Rollup => {
                FieldCategory::TextLike
            }
            Self::Number | Self::Currency | Self::Percent | Self::Rating => FieldCategory::Numeric,
            Self::Date => FieldCategory::Date,
            Self::Checkbox => FieldCategory::Boolean,
            Self::Select => FieldCategory::Select,
            Self::MultiSelect => FieldCategory::MultiSelect,
        }
    }

    /// Whether the field can be written by users.
    ///
    /// Derived types (`Formula`, `Rollup`) are computed from other fields and
    /// must never reach the bulk edit dispatcher.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Formula | Self::Rollup)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Email => "email",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Percent => "percent",
            Self::Rating => "rating",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::Select => "select",
            Self::MultiSelect => "multiselect",
            Self::Formula => "formula",
            Self::Rollup => "rollup",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "url" => Ok(Self::Url),
            "email" => Ok(Self::Email),
            "number" => Ok(Self::Number),
            "currency" => Ok(Self::Currency),
            "percent" => Ok(Self::Percent),
            "rating" => Ok(Self::Rating),
            "checkbox" => Ok(Self::Checkbox),
            "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            "multiselect" | "multi_select" => Ok(Self::MultiSelect),
            "formula" => Ok(Self::Formula),
            "rollup" => Ok(Self::Rollup),
            _ => Err(format!("Invalid field type: {}", s)),
        }
    }
}

/// Evaluation/update category a field type belongs to.
///
/// The predicate evaluator and the bulk edit dispatcher both branch on this
/// category, never on the raw type, so the per-category semantics stay in one
/// exhaustive match each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    /// text, url, email, formula, rollup
    TextLike,
    /// number, currency, percent, rating
    Numeric,
    /// date
    Date,
    /// checkbox
    Boolean,
    /// select (single choice)
    Select,
    /// multiselect (tag array)
    MultiSelect,
}

// =============================================================================
// FIELD DEFINITION
// =============================================================================

/// One selectable option of a select/multiselect field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

/// Metadata describing one custom field's identity and type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Ordered options for select/multiselect fields; empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FieldDefinition {
    pub fn new(id: i64, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id,
            name: name.into(),
            field_type,
            options: Vec::new(),
        }
    }

    /// Add a select/multiselect option.
    pub fn with_option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(FieldOption {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// Shorthand for `self.field_type.category()`.
    pub fn category(&self) -> FieldCategory {
        self.field_type.category()
    }

    /// Shorthand for `self.field_type.is_editable()`.
    pub fn is_editable(&self) -> bool {
        self.field_type.is_editable()
    }
}

/// Filter a field list down to the types offered for bulk edit.
///
/// Derived fields never reach the dispatcher; callers present only the
/// editable subset in the field picker.
pub fn editable_fields(fields: &[FieldDefinition]) -> Vec<&FieldDefinition> {
    fields.iter().filter(|f| f.is_editable()).collect()
}

// =============================================================================
// FIELD VALUE
// =============================================================================

/// One record's value for one field, held in exclusive typed channels.
///
/// Only the channel matching the field's type is authoritative; the others
/// are unset. A value with every channel unset is representable and means
/// "stored but empty".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,

    /// Epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_value: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,

    /// JSON-encoded string array (multiselect tags).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_value: Option<String>,
}

impl FieldValue {
    /// Text/url/email/select value.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Number/currency/percent/rating value.
    pub fn number(value: f64) -> Self {
        Self {
            numeric_value: Some(value),
            ..Self::default()
        }
    }

    /// Date value in epoch milliseconds.
    pub fn date(epoch_ms: i64) -> Self {
        Self {
            date_value: Some(epoch_ms),
            ..Self::default()
        }
    }

    /// Checkbox value.
    pub fn checkbox(value: bool) -> Self {
        Self {
            boolean_value: Some(value),
            ..Self::default()
        }
    }

    /// Multiselect tag array, stored as an encoded JSON string.
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        Self {
            // Vec<String> to JSON array cannot fail to encode
            json_value: serde_json::to_string(&tags).ok(),
            ..Self::default()
        }
    }

    /// Decode the multiselect tag array defensively.
    ///
    /// Corrupted or non-array storage yields an empty list, never an error,
    /// so partially migrated data cannot abort filtering.
    pub fn decoded_tags(&self) -> Vec<String> {
        self.json_value
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default()
    }

    /// Emptiness check for one evaluation category.
    ///
    /// Two quirks are contractual here:
    /// - numeric zero counts as empty (zero-or-unset)
    /// - multiselect checks the raw `json_value` channel being unset, not
    ///   "decoded array has zero elements"
    pub fn is_empty_for(&self, category: FieldCategory) -> bool {
        match category {
            FieldCategory::Boolean => self.boolean_value.is_none(),
            FieldCategory::Numeric => self.numeric_value.unwrap_or(0.0) == 0.0,
            FieldCategory::Date => self.date_value.is_none(),
            FieldCategory::MultiSelect => self.json_value.is_none(),
            FieldCategory::TextLike | FieldCategory::Select => self.string_value.is_none(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_mapping() {
        assert_eq!(FieldType::Text.category(), FieldCategory::TextLike);
        assert_eq!(FieldType::Url.category(), FieldCategory::TextLike);
        assert_eq!(FieldType::Email.category(), FieldCategory::TextLike);
        assert_eq!(FieldType::Formula.category(), FieldCategory::TextLike);
        assert_eq!(FieldType::Rollup.category(), FieldCategory::TextLike);
        assert_eq!(FieldType::Number.category(), FieldCategory::Numeric);
        assert_eq!(FieldType::Currency.category(), FieldCategory::Numeric);
        assert_eq!(FieldType::Percent.category(), FieldCategory::Numeric);
        assert_eq!(FieldType::Rating.category(), FieldCategory::Numeric);
        assert_eq!(FieldType::Date.category(), FieldCategory::Date);
        assert_eq!(FieldType::Checkbox.category(), FieldCategory::Boolean);
        assert_eq!(FieldType::Select.category(), FieldCategory::Select);
        assert_eq!(FieldType::MultiSelect.category(), FieldCategory::MultiSelect);
    }

    #[test]
    fn test_derived_types_not_editable() {
        assert!(!FieldType::Formula.is_editable());
        assert!(!FieldType::Rollup.is_editable());
        assert!(FieldType::Text.is_editable());
        assert!(FieldType::Checkbox.is_editable());
        assert!(FieldType::MultiSelect.is_editable());
    }

    #[test]
    fn test_editable_fields_excludes_derived() {
        let fields = vec![
            FieldDefinition::new(1, "Title", FieldType::Text),
            FieldDefinition::new(2, "Score", FieldType::Formula),
            FieldDefinition::new(3, "Total", FieldType::Rollup),
            FieldDefinition::new(4, "Done", FieldType::Checkbox),
        ];
        let editable = editable_fields(&fields);
        let ids: Vec<i64> = editable.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_field_type_display_from_str_roundtrip() {
        for ty in [
            FieldType::Text,
            FieldType::Url,
            FieldType::Email,
            FieldType::Number,
            FieldType::Currency,
            FieldType::Percent,
            FieldType::Rating,
            FieldType::Checkbox,
            FieldType::Date,
            FieldType::Select,
            FieldType::MultiSelect,
            FieldType::Formula,
            FieldType::Rollup,
        ] {
            let parsed = FieldType::from_str(&ty.to_string()).unwrap();
            assert_eq!(parsed, ty);
        }
        assert!(FieldType::from_str("bogus").is_err());
    }

    #[test]
    fn test_field_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&FieldType::MultiSelect).unwrap(),
            "\"multiselect\""
        );
        let ty: FieldType = serde_json::from_str("\"currency\"").unwrap();
        assert_eq!(ty, FieldType::Currency);
    }

    #[test]
    fn test_tags_roundtrip() {
        let value = FieldValue::tags(["tag1", "tag2"]);
        assert_eq!(value.decoded_tags(), vec!["tag1", "tag2"]);
    }

    #[test]
    fn test_decoded_tags_defensive() {
        let corrupted = FieldValue {
            json_value: Some("not valid json".to_string()),
            ..FieldValue::default()
        };
        assert!(corrupted.decoded_tags().is_empty());

        let wrong_shape = FieldValue {
            json_value: Some("{\"a\":1}".to_string()),
            ..FieldValue::default()
        };
        assert!(wrong_shape.decoded_tags().is_empty());

        assert!(FieldValue::default().decoded_tags().is_empty());
    }

    #[test]
    fn test_numeric_zero_is_empty() {
        assert!(FieldValue::number(0.0).is_empty_for(FieldCategory::Numeric));
        assert!(FieldValue::default().is_empty_for(FieldCategory::Numeric));
        assert!(!FieldValue::number(1.5).is_empty_for(FieldCategory::Numeric));
    }

    #[test]
    fn test_multiselect_emptiness_is_raw_storage() {
        // An encoded empty array still occupies the channel, so it is not
        // empty by the raw-storage contract.
        let encoded_empty = FieldValue::tags(Vec::<String>::new());
        assert!(!encoded_empty.is_empty_for(FieldCategory::MultiSelect));
        assert!(FieldValue::default().is_empty_for(FieldCategory::MultiSelect));
    }

    #[test]
    fn test_field_value_exclusive_channel_serialization() {
        let value = FieldValue::text("hello");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "{\"stringValue\":\"hello\"}");
    }

    #[test]
    fn test_field_definition_builder() {
        let field = FieldDefinition::new(7, "Priority", FieldType::Select)
            .with_option("High", "high")
            .with_option("Low", "low");
        assert_eq!(field.options.len(), 2);
        assert_eq!(field.options[0].value, "high");
        assert_eq!(field.category(), FieldCategory::Select);
    }
}
