// 📈 Overview - headline counts, completeness trend, hospitals per year

use crate::charts::{ChartKind, ChartRequest, Metric, Note, Panel, PanelBody, ViewReport};
use crate::reference::{CRITICAL_ISSUES, HEADLINE};
use crate::sample_data::{SampleData, YEARS};
use crate::views::View;

pub const COMPLETENESS_TITLE: &str = "Data Completeness Percentage by Year";
pub const HOSPITALS_TITLE: &str = "Total Hospitals by Year";
pub const SOURCES_TITLE: &str = "Data Sources";

pub fn build(data: &SampleData) -> ViewReport {
    let mut report = ViewReport::new(View::Overview);

    report.push(Panel::illustrative("Key Metrics", PanelBody::Metrics(headline_metrics())));

    let operating = data.operating_table();

    let completeness = ChartRequest::multi(
        ChartKind::Line,
        operating.clone(),
        "Year",
        &["Revenue_Complete", "Cost_Complete", "FTE_Complete", "Contract_Complete"],
    )
    .y_range(60.0, 100.0);
    report.push(Panel::derived(COMPLETENESS_TITLE, PanelBody::Chart(completeness)));

    let hospitals = ChartRequest::new(ChartKind::Bar, operating, "Year", "Total_Hospitals")
        .color("Total_Hospitals");
    report.push(Panel::derived(HOSPITALS_TITLE, PanelBody::Chart(hospitals)));

    let issues = CRITICAL_ISSUES
        .iter()
        .map(|(priority, headline, detail)| Note {
            priority: *priority,
            headline: headline.to_string(),
            detail: detail.to_string(),
        })
        .collect();
    report.push(Panel::illustrative("Critical Issues Identified", PanelBody::Notes(issues)));

    report.push(Panel::illustrative(SOURCES_TITLE, PanelBody::Metrics(data_sources())));

    report
}

fn headline_metrics() -> Vec<Metric> {
    vec![
        Metric::new("Total Hospitals", group_thousands(HEADLINE.total_hospitals as u64)),
        Metric::new("Data Coverage", format!("{} Years", YEARS.len())).with_caption(&coverage()),
        Metric::new("Teaching Hospitals", group_thousands(HEADLINE.teaching_hospitals as u64)),
        Metric::new("States Covered", HEADLINE.states_covered.to_string()),
    ]
}

fn data_sources() -> Vec<Metric> {
    vec![
        Metric::new("Hospitals", format!("{} facilities", group_thousands(HEADLINE.total_hospitals as u64))),
        Metric::new("Years", coverage()),
        Metric::new("Financial Records", group_thousands(HEADLINE.financial_records as u64)),
        Metric::new("Department Records", group_thousands(HEADLINE.department_records as u64)),
        Metric::new("Last Updated", HEADLINE.last_updated.to_string()),
    ]
}

/// "2021-2024"
pub fn coverage() -> String {
    format!("{}-{}", YEARS[0], YEARS[YEARS.len() - 1])
}

/// One-line summary printed under every text report
pub fn footer() -> String {
    format!(
        "HCRIS Hospital Analytics Dashboard | Data covers {} | Last updated: {} | {} hospitals across {} states with {} financial records",
        coverage(),
        HEADLINE.last_updated,
        group_thousands(HEADLINE.total_hospitals as u64),
        HEADLINE.states_covered,
        group_thousands(HEADLINE.financial_records as u64)
    )
}

/// 150338 -> "150,338"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
