use crate::dashboard::widget::{Layout, Widget, WidgetPatch};
use crate::persist::{SaveError, StateStore};
use serde::{Deserialize, Serialize};

/// Storage key for the serialized dashboard state.
pub const DASHBOARD_KEY: &str = "dashboard-storage";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct DashboardState {
    widgets: Vec<Widget>,
    active_widget: Option<String>,
}

/// Owns the widget collection and the currently edited widget marker.
///
/// Hydrates from the injected [`StateStore`] on construction and writes the
/// whole state back after every mutation. Mutations targeting a missing
/// widget id are silent no-ops.
pub struct DashboardStore {
    widgets: Vec<Widget>,
    active_widget: Option<String>,
    store: Box<dyn StateStore>,
}

impl DashboardStore {
    pub fn new(store: Box<dyn StateStore>) -> Self {
        let state = match store.load(DASHBOARD_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("ignoring corrupt dashboard state: {e}");
                DashboardState::default()
            }),
            None => DashboardState::default(),
        };
        Self {
            widgets: state.widgets,
            active_widget: state.active_widget,
            store,
        }
    }

    /// Store backed by throwaway in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Box::new(crate::persist::MemoryStateStore::new()))
    }

    /// Widgets in insertion order.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Append a widget. The caller supplies the id; uniqueness is its
    /// responsibility.
    pub fn add_widget(&mut self, widget: Widget) -> String {
        let id = widget.id.clone();
        self.widgets.push(widget);
        self.persist();
        id
    }

    /// Shallow-merge a patch into the widget's top-level fields. The config
    /// field is replaced wholesale, so settings editors merge their edits
    /// into the existing config before calling (see
    /// [`crate::dashboard::widget::merge_config`]).
    pub fn update_widget(&mut self, id: &str, patch: WidgetPatch) {
        if let Some(widget) = self.widgets.iter_mut().find(|w| w.id == id) {
            if let Some(title) = patch.title {
                widget.title = title;
            }
            if let Some(data_source) = patch.data_source {
                widget.data_source = data_source.filter(|id| !id.is_empty());
            }
            if let Some(config) = patch.config {
                widget.config = config;
            }
            if let Some(layout) = patch.layout {
                widget.layout = layout;
            }
            self.persist();
        }
    }

    /// Replace only the layout field, leaving title, data source and config
    /// untouched. Safe to call at drag frequency.
    pub fn update_layout(&mut self, id: &str, layout: Layout) {
        if let Some(widget) = self.widgets.iter_mut().find(|w| w.id == id) {
            widget.layout = layout;
            self.persist();
        }
    }

    /// Apply a batch of layout updates, one per widget, as emitted by the
    /// grid collaborator after a drag or resize. Unknown ids are skipped
    /// without aborting the rest of the batch.
    pub fn apply_layouts<'a>(&mut self, updates: impl IntoIterator<Item = (&'a str, Layout)>) {
        let mut changed = false;
        for (id, layout) in updates {
            if let Some(widget) = self.widgets.iter_mut().find(|w| w.id == id) {
                widget.layout = layout;
                changed = true;
            }
        }
        if changed {
            self.persist();
        }
    }

    /// Remove a widget by id. Data sources are unaffected.
    pub fn remove_widget(&mut self, id: &str) {
        self.widgets.retain(|w| w.id != id);
        self.persist();
    }

    pub fn set_active(&mut self, id: Option<&str>) {
        self.active_widget = id.map(str::to_string);
        self.persist();
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_widget.as_deref()
    }

    /// The active widget, resolved weakly.
    pub fn active_widget(&self) -> Option<&Widget> {
        self.active_widget.as_deref().and_then(|id| self.widget(id))
    }

    /// Replace the whole collection, e.g. when applying an imported
    /// dashboard document. The active marker is reset.
    pub fn restore(&mut self, widgets: Vec<Widget>) {
        self.widgets = widgets;
        self.active_widget = None;
        self.persist();
    }

    /// Write the current state through the storage adapter.
    pub fn save(&self) -> Result<(), SaveError> {
        let state = DashboardState {
            widgets: self.widgets.clone(),
            active_widget: self.active_widget.clone(),
        };
        let json = serde_json::to_string(&state)?;
        self.store.store(DASHBOARD_KEY, &json)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("failed to persist dashboard: {e}");
        }
    }
}
