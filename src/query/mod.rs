use crate::colors::{ColorSource, DEFAULT_PALETTE, SINGLE_SERIES_COLOR};
use crate::dashboard::widget::{
    typed_config, BarConfig, LineConfig, PieConfig, TableConfig, TextConfig, Widget, WidgetKind,
};
use crate::datasource::{DataSource, DataSourceRegistry};
use crate::table::Row;

pub mod aggregate;
pub mod columns;
pub mod filter;
pub mod paginate;
pub mod sort;

pub use aggregate::{aggregate_by_category, CategoryTotal};
pub use columns::select_columns;
pub use filter::{apply_filters, FilterSpec};
pub use paginate::{paginate, Page};
pub use sort::{sort_rows, toggle_sort, SortDirection, SortState};

/// Why a widget produced nothing to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No data source is bound, or the bound id no longer resolves.
    NoDataSource,
    /// A source is bound but filters or incomplete column bindings left
    /// nothing to draw.
    NoData,
}

/// One chart series: the column it reads and the color it is drawn with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    pub column: String,
    pub color: String,
}

/// Render-ready input for line and bar charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Column plotted on the x axis (the category column for bars).
    pub x: String,
    pub x_label: String,
    pub y_label: Option<String>,
    pub rows: Vec<Row>,
    pub series: Vec<SeriesSpec>,
    pub show_legend: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieData {
    pub slices: Vec<PieSlice>,
    pub show_legend: bool,
    pub value_label: Option<String>,
}

/// Filtered rows and display columns for a table widget. Sorting and
/// pagination stay caller-side ([`sort_rows`], [`paginate`]) because both
/// are UI-local state.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Output of [`widget_data`], one variant per widget kind.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetData {
    Empty(EmptyReason),
    Chart(ChartData),
    Pie(PieData),
    Table(TableData),
    Text(String),
}

/// Resolve a widget's data source reference. Unset and dangling ids both
/// come back as `None`.
pub fn resolve_source<'a>(
    registry: &'a DataSourceRegistry,
    widget: &Widget,
) -> Option<&'a DataSource> {
    widget.data_source().and_then(|id| registry.get(id))
}

/// Run the full pipeline for one widget: filter, then aggregate for pies,
/// leaving table sorting and pagination to the caller. `colors` fills in
/// series colors the config does not provide.
pub fn widget_data(
    widget: &Widget,
    registry: &DataSourceRegistry,
    colors: &mut dyn ColorSource,
) -> WidgetData {
    let source = resolve_source(registry, widget);
    match widget.kind {
        WidgetKind::Line => {
            line_data(widget, source, colors).map_or_else(WidgetData::Empty, WidgetData::Chart)
        }
        WidgetKind::Bar => {
            bar_data(widget, source, colors).map_or_else(WidgetData::Empty, WidgetData::Chart)
        }
        WidgetKind::Pie => {
            pie_data(widget, source).map_or_else(WidgetData::Empty, WidgetData::Pie)
        }
        WidgetKind::Table => {
            table_data(widget, source).map_or_else(WidgetData::Empty, WidgetData::Table)
        }
        WidgetKind::Text => WidgetData::Text(text_content(widget)),
    }
}

/// Chart input for a line widget: requires both axis bindings, one series
/// per configured value column or a single series over `y`.
pub fn line_data(
    widget: &Widget,
    source: Option<&DataSource>,
    colors: &mut dyn ColorSource,
) -> Result<ChartData, EmptyReason> {
    let source = source.ok_or(EmptyReason::NoDataSource)?;
    let cfg: LineConfig = typed_config(&widget.config);
    let common = widget.common_config();
    let x = bound(&cfg.x).ok_or(EmptyReason::NoData)?;
    let y = bound(&cfg.y).ok_or(EmptyReason::NoData)?;

    let rows = apply_filters(&source.data, common.filters.as_ref());
    if rows.is_empty() {
        return Err(EmptyReason::NoData);
    }

    let series = match cfg.values.as_deref().filter(|v| !v.is_empty()) {
        Some(values) => indexed_series(values, cfg.colors.as_deref(), colors),
        None => vec![single_series(y, cfg.colors.as_deref())],
    };

    Ok(ChartData {
        x: x.to_string(),
        x_label: label_or(common.x_axis_label.as_deref(), x),
        y_label: Some(label_or(common.y_axis_label.as_deref(), y)),
        rows,
        series,
        show_legend: common.legend_visible(),
    })
}

/// Chart input for a bar widget: requires the category binding; `values`
/// drives one bar per column, otherwise `y` names a single series.
pub fn bar_data(
    widget: &Widget,
    source: Option<&DataSource>,
    colors: &mut dyn ColorSource,
) -> Result<ChartData, EmptyReason> {
    let source = source.ok_or(EmptyReason::NoDataSource)?;
    let cfg: BarConfig = typed_config(&widget.config);
    let common = widget.common_config();
    let category = bound(&cfg.category).ok_or(EmptyReason::NoData)?;

    let rows = apply_filters(&source.data, common.filters.as_ref());
    if rows.is_empty() {
        return Err(EmptyReason::NoData);
    }

    let series = match cfg.values.as_deref() {
        Some(values) => indexed_series(values, cfg.colors.as_deref(), colors),
        None => bound(&cfg.y)
            .map(|y| vec![single_series(y, cfg.colors.as_deref())])
            .unwrap_or_default(),
    };

    let show_legend = common.legend_visible();
    Ok(ChartData {
        x: category.to_string(),
        x_label: label_or(common.x_axis_label.as_deref(), category),
        y_label: non_empty(common.y_axis_label),
        rows,
        series,
        show_legend,
    })
}

/// Slices for a pie widget: filter, then group-by-sum over the category
/// and value bindings. Slice colors cycle through the configured palette,
/// falling back to the default one.
pub fn pie_data(widget: &Widget, source: Option<&DataSource>) -> Result<PieData, EmptyReason> {
    let source = source.ok_or(EmptyReason::NoDataSource)?;
    let cfg: PieConfig = typed_config(&widget.config);
    let common = widget.common_config();
    let category = bound(&cfg.category).ok_or(EmptyReason::NoData)?;
    let value = bound(&cfg.value).ok_or(EmptyReason::NoData)?;

    let rows = apply_filters(&source.data, common.filters.as_ref());
    let totals = aggregate_by_category(&rows, category, value, cfg.aggregated);
    if totals.is_empty() {
        return Err(EmptyReason::NoData);
    }

    let palette: Vec<String> = match cfg.colors.filter(|c| !c.is_empty()) {
        Some(colors) => colors,
        None => DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
    };
    let slices = totals
        .into_iter()
        .enumerate()
        .map(|(i, total)| PieSlice {
            name: total.name,
            value: total.value,
            color: palette[i % palette.len()].clone(),
        })
        .collect();

    Ok(PieData {
        slices,
        show_legend: common.legend_visible(),
        value_label: non_empty(common.value_label),
    })
}

/// Rows and columns for a table widget. Rendering order of operations is
/// filter here, then caller-side sort and paginate.
pub fn table_data(widget: &Widget, source: Option<&DataSource>) -> Result<TableData, EmptyReason> {
    let source = source.ok_or(EmptyReason::NoDataSource)?;
    let cfg: TableConfig = typed_config(&widget.config);
    let common = widget.common_config();

    let rows = apply_filters(&source.data, common.filters.as_ref());
    if rows.is_empty() {
        return Err(EmptyReason::NoData);
    }

    Ok(TableData {
        columns: select_columns(&source.columns, cfg.columns.as_deref()),
        rows,
    })
}

/// Content of a text widget; empty when unset.
pub fn text_content(widget: &Widget) -> String {
    let cfg: TextConfig = typed_config(&widget.config);
    cfg.content.unwrap_or_default()
}

/// A column binding counts as set only when non-empty.
fn bound(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|name| !name.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn label_or(configured: Option<&str>, column: &str) -> String {
    match configured {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => column.to_string(),
    }
}

fn indexed_series(
    columns: &[String],
    config_colors: Option<&[String]>,
    fallback: &mut dyn ColorSource,
) -> Vec<SeriesSpec> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| SeriesSpec {
            column: column.clone(),
            color: config_colors
                .and_then(|colors| colors.get(i))
                .cloned()
                .unwrap_or_else(|| fallback.color_for(i)),
        })
        .collect()
}

fn single_series(column: &str, config_colors: Option<&[String]>) -> SeriesSpec {
    SeriesSpec {
        column: column.to_string(),
        color: config_colors
            .and_then(|colors| colors.first())
            .cloned()
            .unwrap_or_else(|| SINGLE_SERIES_COLOR.to_string()),
    }
}
