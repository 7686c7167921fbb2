// 🔍 Data Quality - completeness heatmap, issue counts, integrity checks

use crate::aggregations::completeness_matrix;
use crate::charts::{ChartKind, ChartRequest, Note, Panel, PanelBody, ViewReport};
use crate::data_quality::{DataQualityEngine, QualityReport};
use crate::reference::{INTEGRITY_METRICS, QUALITY_ISSUES, RECOMMENDATIONS};
use crate::sample_data::SampleData;
use crate::table::DataTable;
use crate::views::View;

pub const HEATMAP_TITLE: &str = "Data Completeness Heatmap";
pub const ISSUES_TITLE: &str = "Data Quality Issues Count";
pub const INTEGRITY_TITLE: &str = "Data Integrity Metrics";
pub const TREND_TITLE: &str = "Data Completeness Trends";
pub const RECOMMENDATIONS_TITLE: &str = "Data Quality Recommendations";
pub const VALIDATION_TITLE: &str = "Base Table Validation";

pub fn build(data: &SampleData) -> ViewReport {
    let mut report = ViewReport::new(View::DataQuality);

    let matrix = completeness_matrix(&data.operating_metrics);
    report.push(Panel::derived(
        HEATMAP_TITLE,
        PanelBody::Chart(
            ChartRequest::new(ChartKind::Heatmap, matrix.to_long_table(), "Year", "Data Type")
                .color("Completeness"),
        ),
    ));

    report.push(Panel::illustrative(
        ISSUES_TITLE,
        PanelBody::Chart(ChartRequest::new(ChartKind::Bar, issues_table(), "Issue", "Count").color("Severity")),
    ));

    report.push(Panel::illustrative(INTEGRITY_TITLE, PanelBody::Table(integrity_table())));

    report.push(Panel::derived(
        TREND_TITLE,
        PanelBody::Chart(
            ChartRequest::multi(
                ChartKind::Line,
                data.operating_table(),
                "Year",
                &["Revenue_Complete", "Cost_Complete", "FTE_Complete", "Contract_Complete"],
            )
            .y_range(65.0, 100.0),
        ),
    ));

    let recommendations = RECOMMENDATIONS
        .iter()
        .map(|(priority, headline, detail)| Note {
            priority: *priority,
            headline: headline.to_string(),
            detail: detail.to_string(),
        })
        .collect();
    report.push(Panel::illustrative(RECOMMENDATIONS_TITLE, PanelBody::Notes(recommendations)));

    let quality = DataQualityEngine::new().validate(data);
    report.push(Panel::derived(VALIDATION_TITLE, PanelBody::Table(validation_table(&quality))));

    report
}

fn issues_table() -> DataTable {
    let mut table = DataTable::new(&["Issue", "Count", "Severity"]);
    for (issue, count, severity) in QUALITY_ISSUES {
        table.push_row(vec![issue.into(), count.into(), severity.into()]);
    }
    table
}

fn integrity_table() -> DataTable {
    let mut table = DataTable::new(&["Metric", "Value", "Status"]);
    for (metric, value, status) in INTEGRITY_METRICS {
        table.push_row(vec![metric.into(), value.into(), status.into()]);
    }
    table
}

/// One row per rule, in the order the engine ran them
pub fn validation_table(report: &QualityReport) -> DataTable {
    let mut table = DataTable::new(&["Rule", "Table", "Status", "Severity", "Message"]);
    for result in &report.validations {
        let status = if result.passed { "Pass" } else { "Fail" };
        let severity = if result.passed { "-" } else { result.severity.as_str() };
        table.push_row(vec![
            result.rule_name.as_str().into(),
            result.table.as_str().into(),
            status.into(),
            severity.into(),
            result.message.as_str().into(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{Basis, Priority};

    fn table_body<'a>(report: &'a ViewReport, title: &str) -> &'a DataTable {
        match &report.panel(title).unwrap().body {
            PanelBody::Table(table) => table,
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_heatmap_covers_year_by_metric() {
        let report = build(&SampleData::load());
        let heatmap = report.panel(HEATMAP_TITLE).unwrap().chart().unwrap();

        assert_eq!(heatmap.kind, ChartKind::Heatmap);
        assert_eq!(heatmap.table.len(), 16);
        assert_eq!(heatmap.color.as_deref(), Some("Completeness"));
        assert_eq!(heatmap.table.texts("Data Type")[0], "Revenue Data");
        assert_eq!(heatmap.table.numbers("Completeness")[15], Some(71.5));
    }

    #[test]
    fn test_issue_counts_colored_by_severity() {
        let report = build(&SampleData::load());
        let issues = report.panel(ISSUES_TITLE).unwrap().chart().unwrap();

        assert_eq!(
            issues.series("Count").iter().map(|p| p.1).collect::<Vec<_>>(),
            vec![25.0, 5.0, 0.0, 9.0]
        );
        assert_eq!(issues.table.texts("Severity"), vec!["High", "High", "None", "Medium"]);
    }

    #[test]
    fn test_integrity_and_trends() {
        let report = build(&SampleData::load());

        let integrity = table_body(&report, INTEGRITY_TITLE);
        assert_eq!(integrity.texts("Value")[2], "150,338");

        let trend = report.panel(TREND_TITLE).unwrap().chart().unwrap();
        assert_eq!(trend.y_range, Some((65.0, 100.0)));
        assert_eq!(trend.y.len(), 4);
    }

    #[test]
    fn test_recommendations_keep_priority_order() {
        let report = build(&SampleData::load());
        let panel = report.panel(RECOMMENDATIONS_TITLE).unwrap();
        assert_eq!(panel.basis, Basis::Illustrative);

        match &panel.body {
            PanelBody::Notes(notes) => {
                assert_eq!(notes.len(), 5);
                assert_eq!(notes[0].priority, Priority::High);
                assert_eq!(notes[1].priority, Priority::Critical);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_validation_panel_lists_every_rule() {
        let data = SampleData::load();
        let report = build(&data);
        let table = table_body(&report, VALIDATION_TITLE);

        let quality = DataQualityEngine::new().validate(&data);
        assert_eq!(table.len(), quality.validations.len());

        let failed: Vec<String> = (0..table.len())
            .filter(|&i| table.texts("Status")[i] == "Fail")
            .map(|i| table.texts("Rule")[i].clone())
            .collect();
        assert_eq!(failed, vec!["states_cross_referenced"]);
    }
}
