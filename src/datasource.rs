use crate::persist::{SaveError, StateStore};
use crate::table::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key for the serialized registry state.
pub const DATA_SOURCES_KEY: &str = "data-sources-storage";

/// Number of rows cached in [`DataSource::preview`].
pub const PREVIEW_ROWS: usize = 5;

/// An imported tabular dataset available for widget binding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSource {
    pub id: String,
    pub name: String,
    pub columns: Vec<String>,
    pub data: Vec<Row>,
    /// Bounded prefix of `data`, cached at creation for cheap display.
    #[serde(default)]
    pub preview: Vec<Row>,
}

impl DataSource {
    /// Build a data source from parsed tabular data, assigning a fresh id.
    pub fn new(name: impl Into<String>, columns: Vec<String>, data: Vec<Row>) -> Self {
        let preview = data.iter().take(PREVIEW_ROWS).cloned().collect();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            columns,
            data,
            preview,
        }
    }
}

/// Partial update for a data source. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DataSourcePatch {
    pub name: Option<String>,
    pub columns: Option<Vec<String>>,
    pub data: Option<Vec<Row>>,
    pub preview: Option<Vec<Row>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RegistryState {
    data_sources: Vec<DataSource>,
    active_data_source: Option<String>,
}

/// Owns every imported [`DataSource`]. Widgets reference sources by id
/// only; removing a source never touches the widgets pointing at it.
///
/// State is hydrated from the injected [`StateStore`] on construction and
/// written back after every mutation.
pub struct DataSourceRegistry {
    sources: Vec<DataSource>,
    active: Option<String>,
    store: Box<dyn StateStore>,
}

impl DataSourceRegistry {
    pub fn new(store: Box<dyn StateStore>) -> Self {
        let state = match store.load(DATA_SOURCES_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("ignoring corrupt data source state: {e}");
                RegistryState::default()
            }),
            None => RegistryState::default(),
        };
        Self {
            sources: state.data_sources,
            active: state.active_data_source,
            store,
        }
    }

    /// Registry backed by throwaway in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Box::new(crate::persist::MemoryStateStore::new()))
    }

    /// Sources in insertion order.
    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    pub fn get(&self, id: &str) -> Option<&DataSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Append a source and return its id.
    pub fn add(&mut self, source: DataSource) -> String {
        let id = source.id.clone();
        self.sources.push(source);
        self.persist();
        id
    }

    /// Apply a partial update. A missing id is a silent no-op.
    pub fn update(&mut self, id: &str, patch: DataSourcePatch) {
        if let Some(source) = self.sources.iter_mut().find(|s| s.id == id) {
            if let Some(name) = patch.name {
                source.name = name;
            }
            if let Some(columns) = patch.columns {
                source.columns = columns;
            }
            if let Some(data) = patch.data {
                source.data = data;
            }
            if let Some(preview) = patch.preview {
                source.preview = preview;
            }
            self.persist();
        }
    }

    /// Remove a source by id. Widgets referencing it keep their dangling
    /// id and simply resolve to nothing from now on.
    pub fn remove(&mut self, id: &str) {
        self.sources.retain(|s| s.id != id);
        self.persist();
    }

    pub fn set_active(&mut self, id: Option<&str>) {
        self.active = id.map(str::to_string);
        self.persist();
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active source, resolved weakly. `None` when the marker is unset
    /// or points at a removed source.
    pub fn active(&self) -> Option<&DataSource> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    /// Replace the whole collection, e.g. when applying an imported
    /// dashboard document. The active marker is reset.
    pub fn restore(&mut self, sources: Vec<DataSource>) {
        self.sources = sources;
        self.active = None;
        self.persist();
    }

    /// Write the current state through the storage adapter.
    pub fn save(&self) -> Result<(), SaveError> {
        let state = RegistryState {
            data_sources: self.sources.clone(),
            active_data_source: self.active.clone(),
        };
        let json = serde_json::to_string(&state)?;
        self.store.store(DATA_SOURCES_KEY, &json)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("failed to persist data sources: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_source() -> DataSource {
        let row = json!({"region": "east", "sales": 100});
        DataSource::new(
            "sales.csv",
            vec!["region".into(), "sales".into()],
            vec![row.as_object().cloned().unwrap_or_default()],
        )
    }

    #[test]
    fn new_sources_get_unique_ids_and_previews() {
        let a = sample_source();
        let b = sample_source();
        assert_ne!(a.id, b.id);
        assert_eq!(a.preview.len(), 1);
    }

    #[test]
    fn update_merges_only_given_fields() {
        let mut registry = DataSourceRegistry::in_memory();
        let id = registry.add(sample_source());
        registry.update(
            &id,
            DataSourcePatch {
                name: Some("renamed".into()),
                ..Default::default()
            },
        );
        let source = registry.get(&id).unwrap();
        assert_eq!(source.name, "renamed");
        assert_eq!(source.columns, vec!["region", "sales"]);
    }

    #[test]
    fn remove_leaves_active_marker_untouched() {
        let mut registry = DataSourceRegistry::in_memory();
        let id = registry.add(sample_source());
        registry.set_active(Some(&id));
        registry.remove(&id);
        assert_eq!(registry.active_id(), Some(id.as_str()));
        assert!(registry.active().is_none());
    }
}
