//! # fieldbook-core
//!
//! A pure, synchronous engine for records with typed custom fields:
//! filtering records against rule sets, validating saved view bundles, and
//! building type-correct bulk-edit payloads.
//!
//! The engine holds no state and performs no I/O. It consumes field
//! metadata and a record→field→value index from a storage collaborator and
//! produces booleans, validated view bundles, and single-channel update
//! payloads. Filtering is deliberately robust: dangling field references,
//! corrupted tag arrays, and unparsable rule literals degrade to a defined
//! boolean instead of an error, so partially migrated data never aborts a
//! filter pass.

pub mod bulk;
pub mod error;
pub mod fields;
pub mod filter;
pub mod logging;
pub mod predicate;
pub mod selection;
pub mod views;

// Re-export commonly used types at crate root
pub use bulk::{build_payload, dispatch, toggle_rating, toggle_tag, BulkEditPayload, BulkValue};
pub use error::{Error, Result};
pub use fields::{
    editable_fields, FieldCategory, FieldDefinition, FieldOption, FieldType, FieldValue,
};
pub use filter::{filter_records, passes_all, FieldIndex, FilterRule, ValueIndex};
pub use predicate::{evaluate, FilterOperator, DAY_MS};
pub use selection::Selection;
pub use views::{
    validate_set_default, CalendarMode, CreateView, KanbanFilters, SavedView, SavedViewConfig,
    SortDirection, UpdateView, ViewType, CLEAR_DEFAULT_VIEW_ID,
};
