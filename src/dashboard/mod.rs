pub mod store;
pub mod widget;

pub use store::{DashboardStore, DASHBOARD_KEY};
pub use widget::{
    merge_config, Layout, Widget, WidgetCatalog, WidgetConfig, WidgetDescriptor, WidgetKind,
    WidgetPatch,
};
