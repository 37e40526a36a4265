use crate::query::filter::FilterSpec;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

fn default_layout_w() -> u32 {
    6
}

fn default_layout_h() -> u32 {
    4
}

/// Minimum grid span enforced by the layout collaborator on both axes.
pub const MIN_WIDGET_SPAN: u32 = 2;

/// Closed set of widget types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Line,
    Bar,
    Pie,
    Table,
    Text,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Line => "line",
            WidgetKind::Bar => "bar",
            WidgetKind::Pie => "pie",
            WidgetKind::Table => "table",
            WidgetKind::Text => "text",
        }
    }
}

/// Grid cell position and span of a widget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Layout {
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
    #[serde(default = "default_layout_w")]
    pub w: u32,
    #[serde(default = "default_layout_h")]
    pub h: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: default_layout_w(),
            h: default_layout_h(),
        }
    }
}

/// A dashboard widget: type, data binding and grid placement. The `config`
/// value keeps whatever keys were written to it; typed views parse the
/// recognized fields and ignore the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Widget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        rename = "dataSource",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_source: Option<String>,
    #[serde(default = "empty_config")]
    pub config: Value,
    #[serde(default)]
    pub layout: Layout,
}

fn empty_config() -> Value {
    json!({})
}

impl Widget {
    /// Create a widget with a fresh id and the default config for its kind.
    pub fn new(kind: WidgetKind, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            data_source: None,
            config: default_config(kind),
            layout: Layout::default(),
        }
    }

    /// Bind a data source at creation time. An empty id means unbound.
    pub fn with_data_source(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.data_source = if id.is_empty() { None } else { Some(id) };
        self
    }

    /// The bound data source id, treating an empty string as unbound.
    pub fn data_source(&self) -> Option<&str> {
        self.data_source.as_deref().filter(|id| !id.is_empty())
    }

    /// Common options shared by all widget kinds.
    pub fn common_config(&self) -> CommonConfig {
        typed_config(&self.config)
    }

    /// Typed view of `config` keyed by the widget kind.
    pub fn config_view(&self) -> WidgetConfig {
        match self.kind {
            WidgetKind::Line => WidgetConfig::Line(typed_config(&self.config)),
            WidgetKind::Bar => WidgetConfig::Bar(typed_config(&self.config)),
            WidgetKind::Pie => WidgetConfig::Pie(typed_config(&self.config)),
            WidgetKind::Table => WidgetConfig::Table(typed_config(&self.config)),
            WidgetKind::Text => WidgetConfig::Text(typed_config(&self.config)),
        }
    }
}

/// Default config written into a freshly created widget.
pub fn default_config(kind: WidgetKind) -> Value {
    match kind {
        WidgetKind::Line => json!({"x": "", "y": ""}),
        WidgetKind::Bar => json!({"category": "", "values": []}),
        WidgetKind::Pie => json!({"category": "", "value": ""}),
        WidgetKind::Table => json!({"columns": []}),
        WidgetKind::Text => json!({}),
    }
}

/// Shallow JSON object merge: keys from `updates` overwrite keys in `base`,
/// everything else in `base` is kept. If either side is not an object the
/// update wins outright.
pub fn merge_config(base: &Value, updates: &Value) -> Value {
    match (base, updates) {
        (Value::Object(base), Value::Object(updates)) => {
            let mut merged = base.clone();
            merged.extend(updates.iter().map(|(k, v)| (k.clone(), v.clone())));
            Value::Object(merged)
        }
        _ => updates.clone(),
    }
}

/// Parse a typed view out of a raw config value. Unknown keys are ignored;
/// a config that does not fit the expected shape yields the default view.
pub fn typed_config<C: DeserializeOwned + Default>(config: &Value) -> C {
    serde_json::from_value(config.clone()).unwrap_or_default()
}

/// Partial widget update applied by
/// [`crate::dashboard::DashboardStore::update_widget`]. Unset fields are
/// left untouched. `config` replaces the stored config wholesale, so
/// callers editing settings merge first via [`merge_config`].
#[derive(Debug, Clone, Default)]
pub struct WidgetPatch {
    pub title: Option<String>,
    /// `Some(None)` unbinds the data source, `Some(Some(id))` rebinds it.
    pub data_source: Option<Option<String>>,
    pub config: Option<Value>,
    pub layout: Option<Layout>,
}

/// Options recognized on every widget kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CommonConfig {
    pub filters: Option<FilterSpec>,
    pub x_axis_label: Option<String>,
    pub y_axis_label: Option<String>,
    pub show_legend: Option<bool>,
    pub value_label: Option<String>,
}

impl CommonConfig {
    /// Legend is shown unless explicitly disabled.
    pub fn legend_visible(&self) -> bool {
        self.show_legend != Some(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LineConfig {
    pub x: Option<String>,
    pub y: Option<String>,
    /// Extra value columns drawn as additional lines.
    pub values: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BarConfig {
    pub category: Option<String>,
    pub values: Option<Vec<String>>,
    /// Single-series fallback when `values` is unset.
    pub y: Option<String>,
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PieConfig {
    pub category: Option<String>,
    pub value: Option<String>,
    /// Rows are already `(category, value)` pairs; skip the group-by.
    pub aggregated: bool,
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    pub content: Option<String>,
}

/// Tagged view of a widget config, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetConfig {
    Line(LineConfig),
    Bar(BarConfig),
    Pie(PieConfig),
    Table(TableConfig),
    Text(TextConfig),
}

/// Catalog entry describing one widget kind for pickers and settings UIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDescriptor {
    pub kind: WidgetKind,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl WidgetDescriptor {
    pub fn default_config(&self) -> Value {
        default_config(self.kind)
    }
}

/// Ordered catalog of the available widget kinds.
pub struct WidgetCatalog {
    descriptors: Vec<WidgetDescriptor>,
}

impl WidgetCatalog {
    pub fn with_defaults() -> Self {
        Self {
            descriptors: vec![
                WidgetDescriptor {
                    kind: WidgetKind::Line,
                    label: "Line Chart",
                    description: "Show trends over time",
                    icon: "line-chart",
                },
                WidgetDescriptor {
                    kind: WidgetKind::Bar,
                    label: "Bar Chart",
                    description: "Compare values across categories",
                    icon: "bar-chart-3",
                },
                WidgetDescriptor {
                    kind: WidgetKind::Pie,
                    label: "Pie Chart",
                    description: "Show proportion of a whole",
                    icon: "pie-chart",
                },
                WidgetDescriptor {
                    kind: WidgetKind::Table,
                    label: "Data Table",
                    description: "Display tabular data",
                    icon: "table",
                },
                WidgetDescriptor {
                    kind: WidgetKind::Text,
                    label: "Text",
                    description: "Render fixed text content",
                    icon: "type",
                },
            ],
        }
    }

    pub fn descriptors(&self) -> &[WidgetDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, kind: WidgetKind) -> Option<&WidgetDescriptor> {
        self.descriptors.iter().find(|d| d.kind == kind)
    }
}

impl Default for WidgetCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_config_preserves_unknown_fields() {
        let base = json!({"known": 1, "extra": {"keep": true}});
        let updates = json!({"known": 2});
        let merged = merge_config(&base, &updates);
        assert_eq!(merged["known"], json!(2));
        assert_eq!(merged["extra"], json!({"keep": true}));
    }

    #[test]
    fn typed_config_ignores_unknown_keys() {
        let config = json!({"x": "date", "y": "sales", "theme": "dark"});
        let view: LineConfig = typed_config(&config);
        assert_eq!(view.x.as_deref(), Some("date"));
        assert_eq!(view.y.as_deref(), Some("sales"));
    }

    #[test]
    fn malformed_config_degrades_to_default_view() {
        let config = json!({"columns": "not-a-list"});
        let view: TableConfig = typed_config(&config);
        assert!(view.columns.is_none());
    }

    #[test]
    fn widget_wire_format_uses_camel_case_field_names() {
        let widget = Widget::new(WidgetKind::Pie, "Sales").with_data_source("ds-1");
        let value = serde_json::to_value(&widget).unwrap();
        assert_eq!(value["type"], json!("pie"));
        assert_eq!(value["dataSource"], json!("ds-1"));
        assert_eq!(value["config"], json!({"category": "", "value": ""}));
        assert_eq!(value["layout"], json!({"x": 0, "y": 0, "w": 6, "h": 4}));
    }

    #[test]
    fn empty_data_source_reads_as_unbound() {
        let widget = Widget::new(WidgetKind::Line, "Trend").with_data_source("");
        assert!(widget.data_source().is_none());
    }

    #[test]
    fn config_view_matches_the_widget_kind() {
        let mut widget = Widget::new(WidgetKind::Bar, "Regions");
        widget.config = json!({"category": "region", "values": ["q1", "q2"]});
        match widget.config_view() {
            WidgetConfig::Bar(bar) => {
                assert_eq!(bar.category.as_deref(), Some("region"));
                assert_eq!(bar.values, Some(vec!["q1".into(), "q2".into()]));
            }
            other => panic!("expected a bar view, got {other:?}"),
        }
    }

    #[test]
    fn catalog_covers_every_kind_with_its_default_config() {
        let catalog = WidgetCatalog::with_defaults();
        assert_eq!(catalog.descriptors().len(), 5);
        for kind in [
            WidgetKind::Line,
            WidgetKind::Bar,
            WidgetKind::Pie,
            WidgetKind::Table,
            WidgetKind::Text,
        ] {
            let descriptor = catalog.get(kind).unwrap();
            assert_eq!(descriptor.kind.as_str(), kind.as_str());
            assert!(!descriptor.label.is_empty());
            assert_eq!(descriptor.default_config(), default_config(kind));
        }
        let default_span = Layout::default();
        assert!(default_span.w >= MIN_WIDGET_SPAN && default_span.h >= MIN_WIDGET_SPAN);
    }
}
