// 📊 Render requests - what views hand to a renderer
//
// A view never draws. It produces a ViewReport: an ordered list of panels,
// each holding either a chart request (table + chart parameters), a table,
// a metrics strip, a list of notes, or a placeholder for missing data.

use crate::table::DataTable;
use crate::views::View;
use serde::Serialize;

// ============================================================================
// CHART REQUEST
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    /// Bars laid out along the y axis (x holds the value)
    HorizontalBar,
    /// One bar per y column at each x position
    GroupedBar,
    /// Scatter with marker size taken from `size`
    Bubble,
    Pie,
    Histogram { bins: usize },
    Heatmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

/// Dashed guide line (target band, break-even)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub axis: Axis,
    pub value: f64,
    pub label: String,
}

impl ReferenceLine {
    pub fn vertical(value: f64, label: &str) -> Self {
        ReferenceLine {
            axis: Axis::X,
            value,
            label: label.to_string(),
        }
    }

    pub fn horizontal(value: f64, label: &str) -> Self {
        ReferenceLine {
            axis: Axis::Y,
            value,
            label: label.to_string(),
        }
    }
}

/// Everything a renderer needs to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub table: DataTable,
    pub x: String,
    /// One series per column; grouped series use `color` instead
    pub y: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, table: DataTable, x: &str, y: &str) -> Self {
        ChartRequest {
            kind,
            table,
            x: x.to_string(),
            y: vec![y.to_string()],
            color: None,
            size: None,
            y_range: None,
            reference_lines: Vec::new(),
        }
    }

    /// Several y columns drawn against the same x
    pub fn multi(kind: ChartKind, table: DataTable, x: &str, ys: &[&str]) -> Self {
        let mut request = ChartRequest::new(kind, table, x, "");
        request.y = ys.iter().map(|y| y.to_string()).collect();
        request
    }

    pub fn color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    pub fn size(mut self, column: &str) -> Self {
        self.size = Some(column.to_string());
        self
    }

    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some((min, max));
        self
    }

    pub fn reference(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    /// Points of one y series as (x label, value), missing values skipped
    pub fn series(&self, y: &str) -> Vec<(String, f64)> {
        self.table
            .texts(&self.x)
            .into_iter()
            .zip(self.table.numbers(y))
            .filter_map(|(x, v)| v.map(|v| (x, v)))
            .collect()
    }
}

// ============================================================================
// PANELS
// ============================================================================

/// Where a panel's numbers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// Computed from the base tables
    Derived,
    /// Literal figures with no derivation from the base tables
    Illustrative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Metric {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Metric {
            label: label.to_string(),
            value: value.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH PRIORITY",
            Priority::Medium => "MEDIUM PRIORITY",
            Priority::Low => "ONGOING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub priority: Priority,
    pub headline: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum PanelBody {
    Metrics(Vec<Metric>),
    Chart(ChartRequest),
    Table(DataTable),
    Notes(Vec<Note>),
    /// A lookup failed; the reason is shown in place of the panel
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub basis: Basis,
    pub body: PanelBody,
}

impl Panel {
    pub fn derived(title: impl Into<String>, body: PanelBody) -> Self {
        Panel {
            title: title.into(),
            basis: Basis::Derived,
            body,
        }
    }

    pub fn illustrative(title: impl Into<String>, body: PanelBody) -> Self {
        Panel {
            title: title.into(),
            basis: Basis::Illustrative,
            body,
        }
    }

    pub fn placeholder(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Panel {
            title: title.into(),
            basis: Basis::Derived,
            body: PanelBody::Placeholder(reason.into()),
        }
    }

    pub fn chart(&self) -> Option<&ChartRequest> {
        match &self.body {
            PanelBody::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, PanelBody::Placeholder(_))
    }
}

/// Rendered output of one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewReport {
    pub view: View,
    pub title: String,
    pub panels: Vec<Panel>,
}

impl ViewReport {
    pub fn new(view: View) -> Self {
        ViewReport {
            view,
            title: view.heading().to_string(),
            panels: Vec::new(),
        }
    }

    pub fn push(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    pub fn panel(&self, title: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.title == title)
    }

    pub fn placeholders(&self) -> usize {
        self.panels.iter().filter(|p| p.is_placeholder()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn test_series_skips_missing_points() {
        let mut table = DataTable::new(&["Year", "Pct"]);
        table.push_row(vec![2021u16.into(), Value::Float(41.9)]);
        table.push_row(vec![2024u16.into(), Value::Missing]);

        let chart = ChartRequest::new(ChartKind::Line, table, "Year", "Pct");
        assert_eq!(chart.series("Pct"), vec![("2021".to_string(), 41.9)]);
    }

    #[test]
    fn test_panel_body_serializes_tagged() {
        let panel = Panel::placeholder("Metrics", "no data");
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["body"]["type"], "placeholder");
        assert_eq!(json["body"]["content"], "no data");
        assert_eq!(json["basis"], "derived");
    }

    #[test]
    fn test_report_lookup() {
        let mut report = ViewReport::new(View::Financial);
        report.push(Panel::illustrative("Notes", PanelBody::Notes(vec![])));
        report.push(Panel::placeholder("Missing", "gone"));

        assert_eq!(report.title, "Financial Metrics Analysis");
        assert!(report.panel("Notes").is_some());
        assert_eq!(report.placeholders(), 1);
    }
}
