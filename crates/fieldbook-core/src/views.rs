//! Saved views: named, persisted bundles of filter/sort/grouping state.
//!
//! A `SavedViewConfig` is a fully-optional bag built transiently by the UI,
//! validated once at its three mutation points (create, update, set-default)
//! and then persisted as an opaque blob. It must round-trip losslessly
//! through a textual encode/decode cycle: every optional present before
//! encoding is present and equal after decoding.
//!
//! Validation is the only place in the engine that errors. A rejected input
//! blocks the whole operation before persistence; nothing is partially
//! applied. This is deliberately stricter than the combinator's runtime
//! tolerance: a rule missing its field reference is rejected here, while a
//! rule whose field was deleted later is skipped at evaluation time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::FilterRule;

/// Saved view name length bounds, inclusive.
pub const NAME_MIN_CHARS: usize = 1;
pub const NAME_MAX_CHARS: usize = 100;

// =============================================================================
// VIEW ENUMS
// =============================================================================

/// Display surface a saved view targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    Table,
    Kanban,
    Calendar,
    Gantt,
    /// Applies to every surface.
    #[default]
    All,
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Table => "table",
            Self::Kanban => "kanban",
            Self::Calendar => "calendar",
            Self::Gantt => "gantt",
            Self::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "kanban" => Ok(Self::Kanban),
            "calendar" => Ok(Self::Calendar),
            "gantt" => Ok(Self::Gantt),
            "all" => Ok(Self::All),
            _ => Err(format!("Invalid view type: {}", s)),
        }
    }
}

/// Sort direction for the view's sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Calendar display granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
    Month,
    Week,
}

// =============================================================================
// SAVED VIEW CONFIG
// =============================================================================

/// Quick filters shown on the kanban surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<i64>,
}

impl KanbanFilters {
    pub fn is_empty(&self) -> bool {
        self.priority.is_none() && self.assignee.is_none() && self.tag.is_none()
    }
}

/// Fully-optional bundle of filter/sort/grouping/display settings.
///
/// The empty object is a valid config. On update the stored config is
/// replaced wholesale by the supplied one, never deep-merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedViewConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_type: Option<ViewType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kanban_filters: Option<KanbanFilters>,

    /// Custom field filter rules, re-hydrated into the combinator on load.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_field_filters: Vec<FilterRule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_mode: Option<CalendarMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gantt_zoom: Option<String>,
}

impl SavedViewConfig {
    /// Create an empty config (valid as-is).
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode to the persisted textual form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from the persisted textual form.
    ///
    /// Decode failures are validation failures at this boundary: a rule
    /// missing `fieldId`, `operator`, or `value`, or a bad enum literal,
    /// rejects the whole config.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Validation(format!("invalid config: {}", e)))
    }

    /// Validate rule entries beyond what the types enforce structurally.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.custom_field_filters {
            if rule.id.trim().is_empty() {
                return Err(Error::Validation(
                    "filter rule requires a non-empty id".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// SAVED VIEW
// =============================================================================

/// A named, persisted view bundle scoped to one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    #[serde(default)]
    pub view_type: ViewType,
    pub config: SavedViewConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// At most one view per project is the default.
    #[serde(default)]
    pub is_default: bool,
}

// =============================================================================
// MUTATION REQUESTS
// =============================================================================

fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(Error::Validation(format!(
            "view name must be {}-{} characters, got {}",
            NAME_MIN_CHARS, NAME_MAX_CHARS, len
        )));
    }
    Ok(())
}

/// Request to create a saved view. Validated as a whole before persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateView {
    pub project_id: i64,
    pub name: String,
    #[serde(default)]
    pub view_type: ViewType,
    /// Required; the empty config is accepted.
    pub config: SavedViewConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CreateView {
    pub fn new(project_id: i64, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            view_type: ViewType::default(),
            config: SavedViewConfig::default(),
            icon: None,
            color: None,
        }
    }

    pub fn with_view_type(mut self, view_type: ViewType) -> Self {
        self.view_type = view_type;
        self
    }

    pub fn with_config(mut self, config: SavedViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Validate the whole request; any violation rejects the operation.
    pub fn validate(&self) -> Result<()> {
        if self.project_id <= 0 {
            debug!(
                op = "create_view",
                project_id = self.project_id,
                reason = "missing project",
                "rejected create"
            );
            return Err(Error::Validation("projectId is required".to_string()));
        }
        validate_name(&self.name)?;
        self.config.validate()
    }
}

/// Request to update a saved view. Every field beyond `id` is optional;
/// a supplied config replaces the stored one wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateView {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<SavedViewConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl UpdateView {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_config(mut self, config: SavedViewConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.id <= 0 {
            debug!(
                op = "update_view",
                view_id = self.id,
                reason = "missing id",
                "rejected update"
            );
            return Err(Error::Validation("view id is required".to_string()));
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(config) = &self.config {
            config.validate()?;
        }
        Ok(())
    }

    /// Apply to a stored view: field-level replace-if-present.
    ///
    /// A supplied config replaces the previous one wholesale, never merged
    /// into it. Callers must `validate()` first.
    pub fn apply_to(&self, view: &mut SavedView) {
        if let Some(name) = &self.name {
            view.name = name.clone();
        }
        if let Some(config) = &self.config {
            view.config = config.clone();
        }
        if let Some(icon) = &self.icon {
            view.icon = Some(icon.clone());
        }
        if let Some(color) = &self.color {
            view.color = Some(color.clone());
        }
    }
}

/// Sentinel view id meaning "clear the default for this project".
pub const CLEAR_DEFAULT_VIEW_ID: i64 = 0;

/// Validate a set-default request.
///
/// `view_id == 0` is the accepted sentinel for "no default view"; it is not
/// a validation failure.
pub fn validate_set_default(view_id: i64, project_id: i64) -> Result<()> {
    if project_id <= 0 {
        return Err(Error::Validation("projectId is required".to_string()));
    }
    if view_id < CLEAR_DEFAULT_VIEW_ID {
        return Err(Error::Validation(format!(
            "invalid view id: {}",
            view_id
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::FilterOperator;

    #[test]
    fn test_empty_config_is_valid() {
        let config = SavedViewConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_config_roundtrip_kanban_filters() {
        let config = SavedViewConfig {
            kanban_filters: Some(KanbanFilters {
                priority: Some("high".to_string()),
                assignee: Some(5),
                tag: Some(3),
            }),
            ..SavedViewConfig::default()
        };
        let encoded = config.to_json().unwrap();
        let decoded = SavedViewConfig::from_json(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_config_roundtrip_all_fields() {
        let config = SavedViewConfig {
            view_type: Some(ViewType::Kanban),
            sort_field: Some("due_date".to_string()),
            sort_direction: Some(SortDirection::Desc),
            group_by: Some("status".to_string()),
            search_query: Some("login".to_string()),
            kanban_filters: Some(KanbanFilters {
                priority: Some("high".to_string()),
                assignee: None,
                tag: Some(2),
            }),
            custom_field_filters: vec![FilterRule::new("r1", 4, FilterOperator::Contains, "api")],
            calendar_mode: Some(CalendarMode::Week),
            gantt_zoom: Some("month".to_string()),
        };
        let decoded = SavedViewConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_config_camel_case_wire_names() {
        let config = SavedViewConfig {
            sort_field: Some("name".to_string()),
            calendar_mode: Some(CalendarMode::Month),
            ..SavedViewConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"sortField\""));
        assert!(json.contains("\"calendarMode\":\"month\""));
    }

    #[test]
    fn test_config_rejects_rule_missing_field_id() {
        let raw = r#"{"customFieldFilters":[{"id":"r1","operator":"equals","value":"x"}]}"#;
        let err = SavedViewConfig::from_json(raw).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_config_rejects_bad_enum() {
        let err = SavedViewConfig::from_json(r#"{"viewType":"spreadsheet"}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_config_rejects_blank_rule_id() {
        let config = SavedViewConfig {
            custom_field_filters: vec![FilterRule::new("  ", 1, FilterOperator::Equals, "x")],
            ..SavedViewConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_create_name_bounds() {
        assert!(CreateView::new(1, "").validate().is_err());
        assert!(CreateView::new(1, "a".repeat(101)).validate().is_err());
        assert!(CreateView::new(1, "a").validate().is_ok());
        assert!(CreateView::new(1, "a".repeat(100)).validate().is_ok());
    }

    #[test]
    fn test_create_requires_project() {
        assert!(CreateView::new(0, "My view").validate().is_err());
        assert!(CreateView::new(-3, "My view").validate().is_err());
    }

    #[test]
    fn test_create_defaults_to_all_view_type() {
        let req = CreateView::new(1, "My view");
        assert_eq!(req.view_type, ViewType::All);

        let decoded: CreateView =
            serde_json::from_str(r#"{"projectId":1,"name":"v","config":{}}"#).unwrap();
        assert_eq!(decoded.view_type, ViewType::All);
    }

    #[test]
    fn test_create_rejects_invalid_rule_in_config() {
        let req = CreateView::new(1, "My view").with_config(SavedViewConfig {
            custom_field_filters: vec![FilterRule::new("", 1, FilterOperator::Equals, "x")],
            ..SavedViewConfig::default()
        });
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_requires_id() {
        assert!(UpdateView::new(0).validate().is_err());
        assert!(UpdateView::new(12).validate().is_ok());
    }

    #[test]
    fn test_update_optional_name_still_bounded() {
        assert!(UpdateView::new(1).with_name("").validate().is_err());
        assert!(UpdateView::new(1).with_name("ok").validate().is_ok());
    }

    #[test]
    fn test_update_replaces_config_wholesale() {
        let mut view = SavedView {
            id: 1,
            project_id: 1,
            name: "Board".to_string(),
            view_type: ViewType::Kanban,
            config: SavedViewConfig {
                sort_field: Some("old".to_string()),
                search_query: Some("keep me?".to_string()),
                ..SavedViewConfig::default()
            },
            icon: None,
            color: None,
            is_default: false,
        };

        let update = UpdateView::new(1).with_config(SavedViewConfig {
            sort_field: Some("new".to_string()),
            ..SavedViewConfig::default()
        });
        update.apply_to(&mut view);

        // The old searchQuery must not survive: replace, never merge.
        assert_eq!(view.config.sort_field.as_deref(), Some("new"));
        assert!(view.config.search_query.is_none());
    }

    #[test]
    fn test_update_without_config_keeps_stored_config() {
        let mut view = SavedView {
            id: 1,
            project_id: 1,
            name: "Board".to_string(),
            view_type: ViewType::Table,
            config: SavedViewConfig {
                group_by: Some("status".to_string()),
                ..SavedViewConfig::default()
            },
            icon: None,
            color: None,
            is_default: false,
        };

        UpdateView::new(1).with_name("Renamed").apply_to(&mut view);
        assert_eq!(view.name, "Renamed");
        assert_eq!(view.config.group_by.as_deref(), Some("status"));
    }

    #[test]
    fn test_set_default_zero_is_clear_sentinel() {
        assert!(validate_set_default(0, 1).is_ok());
        assert!(validate_set_default(42, 1).is_ok());
        assert!(validate_set_default(-1, 1).is_err());
        assert!(validate_set_default(0, 0).is_err());
    }

    #[test]
    fn test_view_type_display_from_str() {
        use std::str::FromStr;
        for vt in [
            ViewType::Table,
            ViewType::Kanban,
            ViewType::Calendar,
            ViewType::Gantt,
            ViewType::All,
        ] {
            assert_eq!(ViewType::from_str(&vt.to_string()).unwrap(), vt);
        }
        assert!(ViewType::from_str("spreadsheet").is_err());
    }
}
