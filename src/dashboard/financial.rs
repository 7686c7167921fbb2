// 💰 Financial Metrics - operating margins and revenue per bed

use crate::charts::{ChartKind, ChartRequest, Panel, PanelBody, ReferenceLine, ViewReport};
use crate::reference::{MARGINS, REVENUE_PER_BED};
use crate::sample_data::SampleData;
use crate::table::DataTable;
use crate::views::View;

pub fn build(_data: &SampleData) -> ViewReport {
    let mut report = ViewReport::new(View::Financial);

    let margins = margin_table();
    report.push(Panel::illustrative(
        "Median Operating Margin Trend",
        PanelBody::Chart(
            ChartRequest::new(ChartKind::Line, margins.clone(), "Year", "Median_Margin")
                .reference(ReferenceLine::horizontal(0.0, "Break-even")),
        ),
    ));
    report.push(Panel::illustrative(
        "Hospitals with Extreme Margins",
        PanelBody::Chart(ChartRequest::multi(
            ChartKind::GroupedBar,
            margins,
            "Year",
            &["Extreme_Negative", "Extreme_Positive"],
        )),
    ));

    let revenue = revenue_table();
    report.push(Panel::illustrative(
        "Revenue per Bed Trends",
        PanelBody::Chart(ChartRequest::multi(
            ChartKind::Line,
            revenue.clone(),
            "Year",
            &["Mean", "Median"],
        )),
    ));
    report.push(Panel::illustrative(
        "Revenue per Bed Outliers by Year",
        PanelBody::Chart(ChartRequest::new(ChartKind::Bar, revenue, "Year", "Outliers").color("Outliers")),
    ));

    report
}

fn margin_table() -> DataTable {
    let mut table = DataTable::new(&[
        "Year",
        "Mean_Margin",
        "Median_Margin",
        "Extreme_Negative",
        "Extreme_Positive",
    ]);
    for row in MARGINS {
        table.push_row(vec![
            row.year.into(),
            row.mean_margin.into(),
            row.median_margin.into(),
            row.extreme_negative.into(),
            row.extreme_positive.into(),
        ]);
    }
    table
}

fn revenue_table() -> DataTable {
    let mut table = DataTable::new(&["Year", "Mean", "Median", "Outliers"]);
    for row in REVENUE_PER_BED {
        table.push_row(vec![
            row.year.into(),
            row.mean.into(),
            row.median.into(),
            row.outliers.into(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_panels() {
        let report = build(&SampleData::load());

        let trend = report.panel("Median Operating Margin Trend").unwrap().chart().unwrap();
        assert_eq!(trend.series("Median_Margin")[1], ("2022".to_string(), -4.6));
        assert_eq!(trend.reference_lines[0].label, "Break-even");

        let extreme = report.panel("Hospitals with Extreme Margins").unwrap().chart().unwrap();
        assert_eq!(extreme.kind, ChartKind::GroupedBar);
        assert_eq!(extreme.series("Extreme_Negative")[2].1, 354.0);
        assert_eq!(extreme.series("Extreme_Positive")[2].1, 29.0);
    }

    #[test]
    fn test_revenue_panels() {
        let report = build(&SampleData::load());

        let trend = report.panel("Revenue per Bed Trends").unwrap().chart().unwrap();
        assert_eq!(trend.y, vec!["Mean", "Median"]);
        assert_eq!(trend.series("Mean")[3].1, 1_721_527.0);

        let outliers = report.panel("Revenue per Bed Outliers by Year").unwrap().chart().unwrap();
        assert_eq!(
            outliers.series("Outliers").iter().map(|p| p.1).collect::<Vec<_>>(),
            vec![222.0, 233.0, 233.0, 120.0]
        );
    }
}
