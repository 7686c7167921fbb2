// 👷 Contract Labor Analysis - per-year statistics, distribution, states
//
// The selected year keys three lookups. A year with no entry turns the
// affected panels into placeholders; the state panels still render.

use crate::aggregations::{
    sample_table, synthetic_contract_sample, target_distribution, SYNTHETIC_SEED, TARGET_MAX_PCT,
    TARGET_MIN_PCT,
};
use crate::charts::{ChartKind, ChartRequest, Metric, Panel, PanelBody, ReferenceLine, ViewReport};
use crate::error::{DashboardError, Result};
use crate::reference::{contract_stats, ContractStats, HIGH_CONTRACT_HOSPITALS, TOP_CONTRACT_STATES};
use crate::sample_data::SampleData;
use crate::table::DataTable;
use crate::views::View;
use tracing::warn;

pub const HISTOGRAM_BINS: usize = 50;
pub const SAMPLE_COLUMN: &str = "Contract_Labor_Pct";

pub fn build(data: &SampleData, year: u16) -> ViewReport {
    let mut report = ViewReport::new(View::ContractLabor);

    let stats = || {
        contract_stats(year)
            .ok_or_else(|| DashboardError::missing_year("contract labor statistics", year))
    };

    report.push(or_placeholder(
        format!("Contract Labor Statistics - {}", year),
        stats().map(|s| Panel::illustrative("", PanelBody::Metrics(stat_metrics(s)))),
    ));

    report.push(or_placeholder(
        format!("Contract Labor Distribution - {}", year),
        stats().and_then(distribution_panel),
    ));

    report.push(or_placeholder(
        format!("Target Range Distribution - {}", year),
        target_distribution(&data.contract_labor, year).map(|split| {
            let chart = ChartRequest::new(ChartKind::Pie, split.to_table(), "Category", "Percentage")
                .color("Category");
            Panel::derived("", PanelBody::Chart(chart))
        }),
    ));

    let states = top_states_table();
    report.push(Panel::illustrative(
        "Hospital Count by State",
        PanelBody::Chart(
            ChartRequest::new(ChartKind::Bar, states.clone(), "State", "Hospital_Count")
                .color("Hospital_Count"),
        ),
    ));
    report.push(Panel::illustrative(
        "Mean Contract Labor % by State",
        PanelBody::Chart(
            ChartRequest::new(ChartKind::Bar, states, "State", "Mean_Contract_Pct")
                .color("Mean_Contract_Pct")
                .reference(ReferenceLine::horizontal(TARGET_MIN_PCT, "Target Min"))
                .reference(ReferenceLine::horizontal(TARGET_MAX_PCT, "Target Max")),
        ),
    ));

    report.push(Panel::illustrative(
        "Hospitals with >15% Contract Labor (2023)",
        PanelBody::Chart(
            ChartRequest::new(ChartKind::Bar, high_contract_table(), "Hospital", "Contract_Labor_Pct")
                .color("State"),
        ),
    ));

    report
}

/// Titles the panel, or swaps it for a placeholder on a data-shape error
fn or_placeholder(title: String, panel: Result<Panel>) -> Panel {
    match panel {
        Ok(mut panel) => {
            panel.title = title;
            panel
        }
        Err(err) => {
            warn!(error = %err, panel = %title, "rendering placeholder");
            Panel::placeholder(title, err.to_string())
        }
    }
}

fn stat_metrics(stats: &ContractStats) -> Vec<Metric> {
    vec![
        Metric::new("Mean Contract %", format!("{:.1}%", stats.mean)),
        Metric::new("Median Contract %", format!("{:.1}%", stats.median)),
        Metric::new("Max Contract %", format!("{:.1}%", stats.max)),
        Metric::new("Within Target (3-5%)", format!("{:.1}%", stats.within_target)),
    ]
}

fn distribution_panel(stats: &ContractStats) -> Result<Panel> {
    let sample = synthetic_contract_sample(stats.mean, SYNTHETIC_SEED)?;
    let chart = ChartRequest::new(
        ChartKind::Histogram { bins: HISTOGRAM_BINS },
        sample_table(SAMPLE_COLUMN, &sample),
        SAMPLE_COLUMN,
        SAMPLE_COLUMN,
    )
    .reference(ReferenceLine::vertical(TARGET_MIN_PCT, "Target Min (3%)"))
    .reference(ReferenceLine::vertical(TARGET_MAX_PCT, "Target Max (5%)"));

    Ok(Panel::illustrative("", PanelBody::Chart(chart)))
}

fn top_states_table() -> DataTable {
    let mut table = DataTable::new(&["State", "Hospital_Count", "Mean_Contract_Pct"]);
    for (state, count, pct) in TOP_CONTRACT_STATES {
        table.push_row(vec![state.into(), count.into(), pct.into()]);
    }
    table
}

fn high_contract_table() -> DataTable {
    let mut table = DataTable::new(&["Hospital", "Contract_Labor_Pct", "State", "Year"]);
    for (hospital, pct, state) in HIGH_CONTRACT_HOSPITALS {
        table.push_row(vec![hospital.into(), pct.into(), state.into(), 2023u16.into()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::Basis;

    fn metric_values(report: &ViewReport, year: u16) -> Vec<String> {
        let panel = report
            .panel(&format!("Contract Labor Statistics - {}", year))
            .unwrap();
        match &panel.body {
            PanelBody::Metrics(items) => items.iter().map(|m| m.value.clone()).collect(),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_2023_metrics_match_lookup() {
        let report = build(&SampleData::load(), 2023);
        assert_eq!(metric_values(&report, 2023), vec!["2.2%", "1.9%", "41.1%", "14.2%"]);
    }

    #[test]
    fn test_histogram_uses_seeded_sample() {
        let report = build(&SampleData::load(), 2021);
        let chart = report
            .panel("Contract Labor Distribution - 2021")
            .unwrap()
            .chart()
            .unwrap();

        assert_eq!(chart.kind, ChartKind::Histogram { bins: 50 });
        assert_eq!(chart.table.len(), 1000);
        assert_eq!(chart.reference_lines.len(), 2);

        let expected = synthetic_contract_sample(2.1, SYNTHETIC_SEED).unwrap();
        let actual: Vec<f64> = chart.table.numbers(SAMPLE_COLUMN).into_iter().flatten().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_pie_is_derived_from_base_table() {
        let report = build(&SampleData::load(), 2024);
        let panel = report.panel("Target Range Distribution - 2024").unwrap();
        assert_eq!(panel.basis, Basis::Derived);

        let pie = panel.chart().unwrap();
        let total: f64 = pie.table.numbers("Percentage").into_iter().flatten().sum();
        assert!((total - 100.0).abs() <= 0.1 + 1e-9);
        assert_eq!(pie.table.numbers("Percentage"), vec![Some(79.8), Some(15.4), Some(4.8)]);
    }

    #[test]
    fn test_unknown_year_renders_placeholders() {
        let report = build(&SampleData::load(), 2019);

        assert_eq!(report.placeholders(), 3);
        assert!(report.panel("Contract Labor Statistics - 2019").unwrap().is_placeholder());
        assert!(report.panel("Target Range Distribution - 2019").unwrap().is_placeholder());
        // state panels are not keyed by year
        assert!(report.panel("Hospital Count by State").unwrap().chart().is_some());
    }

    #[test]
    fn test_state_charts_have_ten_states() {
        let report = build(&SampleData::load(), 2023);
        let chart = report.panel("Mean Contract Labor % by State").unwrap().chart().unwrap();
        assert_eq!(chart.table.len(), 10);
        assert_eq!(chart.reference_lines[0].value, 3.0);
        assert_eq!(chart.reference_lines[1].value, 5.0);
    }
}
