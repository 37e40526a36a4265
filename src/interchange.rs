use crate::dashboard::{DashboardStore, Widget};
use crate::datasource::{DataSource, DataSourceRegistry};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Version stamp written into every exported document.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Self-contained dashboard snapshot: widgets plus the data sources they
/// reference, ready to be written to disk or shipped elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDocument {
    #[serde(default)]
    pub name: String,
    pub widgets: Vec<Widget>,
    pub data_sources: Vec<DataSource>,
    pub version: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid dashboard file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid dashboard file: missing {0}")]
    MissingField(&'static str),
}

/// Snapshot the given widgets and sources under `name`, stamped with the
/// current UTC time and the format version.
pub fn export_dashboard(name: &str, widgets: &[Widget], sources: &[DataSource]) -> DashboardDocument {
    DashboardDocument {
        name: name.to_string(),
        widgets: widgets.to_vec(),
        data_sources: sources.to_vec(),
        version: FORMAT_VERSION.to_string(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Pretty-printed JSON body of a document.
pub fn to_json(doc: &DashboardDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Download-style file name for a dashboard: lowercased, whitespace runs
/// collapsed to hyphens, with a fixed suffix. "Sales Report" becomes
/// "sales-report-dashboard.json".
pub fn export_file_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_gap = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !prev_gap {
                slug.push('-');
            }
            prev_gap = true;
        } else {
            slug.push(ch);
            prev_gap = false;
        }
    }
    format!("{slug}-dashboard.json")
}

/// Parse an exported document, rejecting payloads that lack the widgets,
/// dataSources or version fields before deserializing in full.
pub fn import_dashboard(text: &str) -> Result<DashboardDocument, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    for field in ["widgets", "dataSources", "version"] {
        if value.get(field).map_or(true, Value::is_null) {
            return Err(ImportError::MissingField(field));
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Replace both stores' contents with the document's. Active markers are
/// cleared; the imported dashboard starts with nothing selected.
pub fn apply_document(
    doc: DashboardDocument,
    dashboard: &mut DashboardStore,
    registry: &mut DataSourceRegistry,
) {
    registry.restore(doc.data_sources);
    dashboard.restore(doc.widgets);
}

pub fn write_document(path: &Path, doc: &DashboardDocument) -> anyhow::Result<()> {
    let json = to_json(doc)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn read_document(path: &Path) -> anyhow::Result<DashboardDocument> {
    let text = std::fs::read_to_string(path)?;
    Ok(import_dashboard(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_lowercased_and_hyphenated() {
        assert_eq!(export_file_name("Sales Report"), "sales-report-dashboard.json");
        assert_eq!(export_file_name("Q1  Revenue"), "q1-revenue-dashboard.json");
        assert_eq!(export_file_name("plain"), "plain-dashboard.json");
    }

    #[test]
    fn import_rejects_payloads_without_required_fields() {
        let missing_version = r#"{"widgets": [], "dataSources": []}"#;
        match import_dashboard(missing_version) {
            Err(ImportError::MissingField("version")) => {}
            other => panic!("unexpected result: {other:?}"),
        }

        let null_widgets = r#"{"widgets": null, "dataSources": [], "version": "1.0.0"}"#;
        assert!(matches!(
            import_dashboard(null_widgets),
            Err(ImportError::MissingField("widgets"))
        ));
    }
}
