//! Structured logging field name constants for fieldbook.
//!
//! All modules use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across the engine.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | WARN  | Recoverable issue, defined fallback applied |
//! | DEBUG | Decision points (validation rejections, guard no-ops) |
//! | TRACE | Per-rule / per-record evaluation detail |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Logical operation name.
/// Examples: "create_view", "update_view", "set_default_view", "bulk_edit"
pub const OPERATION: &str = "op";

/// Custom field being evaluated or updated.
pub const FIELD_ID: &str = "field_id";

/// Saved view being validated or mutated.
pub const VIEW_ID: &str = "view_id";

/// Project owning a saved view.
pub const PROJECT_ID: &str = "project_id";

/// Filter rule id (opaque, unique within a rule set).
pub const RULE_ID: &str = "rule_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of records targeted by a bulk edit or filter pass.
pub const RECORD_COUNT: &str = "record_count";

/// Number of filter rules in a rule set.
pub const RULE_COUNT: &str = "rule_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Reason a validation or dispatch decision was taken.
pub const REASON: &str = "reason";

/// Error message when an operation is rejected.
pub const ERROR_MSG: &str = "error";
