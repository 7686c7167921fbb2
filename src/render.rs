// 🖨️ Renderers - turn a ViewReport into something a person or client reads
//
// Views hand over chart requests, never drawings. A renderer decides what a
// chart looks like: text bars for the CLI, JSON for the HTTP API. The TUI
// draws the same reports with ratatui widgets (see ui.rs).

use crate::aggregations::histogram;
use crate::charts::{Basis, ChartKind, ChartRequest, Metric, Note, Panel, PanelBody, ViewReport};
use crate::dashboard::overview::footer;
use crate::error::Result;
use crate::table::DataTable;

pub trait Renderer {
    type Output;

    fn render(&mut self, report: &ViewReport) -> Result<Self::Output>;
}

// ============================================================================
// TEXT
// ============================================================================

/// Plain text with block-character bars
pub struct TextRenderer {
    bar_width: usize,
}

impl TextRenderer {
    pub fn new() -> Self {
        TextRenderer { bar_width: 40 }
    }

    pub fn with_bar_width(bar_width: usize) -> Self {
        TextRenderer { bar_width }
    }

    fn panel(&self, panel: &Panel, out: &mut String) {
        let tag = match panel.basis {
            Basis::Derived => "",
            Basis::Illustrative => " (illustrative)",
        };
        out.push_str(&format!("\n## {}{}\n", panel.title, tag));
        out.push_str(&self.body_text(&panel.body));
    }

    /// Text of one panel body, without the title line
    pub fn body_text(&self, body: &PanelBody) -> String {
        let mut out = String::new();
        match body {
            PanelBody::Metrics(metrics) => metrics_text(metrics, &mut out),
            PanelBody::Chart(chart) => self.chart(chart, &mut out),
            PanelBody::Table(table) => table_text(table, &mut out),
            PanelBody::Notes(notes) => notes_text(notes, &mut out),
            PanelBody::Placeholder(reason) => out.push_str(&format!("  (unavailable: {})\n", reason)),
        }
        out
    }

    fn chart(&self, chart: &ChartRequest, out: &mut String) {
        match chart.kind {
            ChartKind::Histogram { bins } => {
                let values: Vec<f64> = chart.table.numbers(&chart.x).into_iter().flatten().collect();
                let rows: Vec<(String, f64)> = histogram(&values, bins)
                    .into_iter()
                    .filter(|b| b.count > 0)
                    .map(|b| (format!("{:.1}-{:.1}", b.start, b.end), b.count as f64))
                    .collect();
                self.bars(&rows, out);
            }
            ChartKind::HorizontalBar => {
                let label = chart.y.first().map(String::as_str).unwrap_or_default();
                self.bars(&pairs(&chart.table, label, &chart.x), out);
            }
            ChartKind::Heatmap => {
                let row_label = chart.y.first().map(String::as_str).unwrap_or_default();
                let value = chart.color.as_deref().unwrap_or_default();
                let labels = chart.table.texts(row_label);
                let columns = chart.table.texts(&chart.x);
                let rows: Vec<(String, f64)> = chart
                    .table
                    .numbers(value)
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| (format!("{} {}", labels[i], columns[i]), v)))
                    .collect();
                self.bars(&rows, out);
            }
            ChartKind::Pie => {
                let y = chart.y.first().map(String::as_str).unwrap_or_default();
                let rows = chart.series(y);
                let total: f64 = rows.iter().map(|(_, v)| v).sum();
                for (label, value) in &rows {
                    let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                    out.push_str(&format!("  {:<28} {:>6.1}%\n", label, share));
                }
            }
            _ => {
                for y in &chart.y {
                    if chart.y.len() > 1 {
                        out.push_str(&format!("  {}:\n", y));
                    }
                    self.bars(&chart.series(y), out);
                }
            }
        }

        for line in &chart.reference_lines {
            out.push_str(&format!("  -- {} at {}\n", line.label, format_number(line.value)));
        }
    }

    fn bars(&self, rows: &[(String, f64)], out: &mut String) {
        let max = rows.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);
        let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

        for (label, value) in rows {
            let len = if max > 0.0 {
                (value.abs() / max * self.bar_width as f64).round() as usize
            } else {
                0
            };
            out.push_str(&format!(
                "  {:<width$}  {:>14}  {}\n",
                label,
                format_number(*value),
                "█".repeat(len),
                width = label_width
            ));
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&mut self, report: &ViewReport) -> Result<String> {
        let mut out = format!("# {}\n{}\n", report.title, report.view.summary());
        for panel in &report.panels {
            self.panel(panel, &mut out);
        }
        out.push_str(&format!("\n---\n{}\n", footer()));
        Ok(out)
    }
}

/// (label, value) pairs of two columns, skipping missing values
fn pairs(table: &DataTable, label: &str, value: &str) -> Vec<(String, f64)> {
    table
        .texts(label)
        .into_iter()
        .zip(table.numbers(value))
        .filter_map(|(l, v)| v.map(|v| (l, v)))
        .collect()
}

fn metrics_text(metrics: &[Metric], out: &mut String) {
    for metric in metrics {
        match &metric.caption {
            Some(caption) => out.push_str(&format!("  {}: {} ({})\n", metric.label, metric.value, caption)),
            None => out.push_str(&format!("  {}: {}\n", metric.label, metric.value)),
        }
    }
}

fn notes_text(notes: &[Note], out: &mut String) {
    for note in notes {
        out.push_str(&format!(
            "  [{}] {}\n      {}\n",
            note.priority.as_str(),
            note.headline,
            note.detail
        ));
    }
}

fn table_text(table: &DataTable, out: &mut String) {
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect();
        format!("  {}\n", padded.join(" | ").trim_end())
    };

    out.push_str(&line(table.columns()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", rule.join("-+-")));
    for row in &cells {
        out.push_str(&line(row.as_slice()));
    }
}

/// Whole numbers without decimals, everything else to two places
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Serializes the report as-is; chart tables become lists of records
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new(pretty: bool) -> Self {
        JsonRenderer { pretty }
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&mut self, report: &ViewReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}
