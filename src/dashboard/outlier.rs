// 🚨 Outlier Analysis - costliest hospitals, FTE ratios, persistent contract labor

use crate::aggregations::{fte_per_bed, to_billions};
use crate::charts::{ChartKind, ChartRequest, Panel, PanelBody, ViewReport};
use crate::reference::{CONTRACT_OUTLIER_TRENDS, FTE_OUTLIERS};
use crate::sample_data::SampleData;
use crate::table::{DataTable, SortOrder};
use crate::views::View;

pub const COST_BILLIONS: &str = "Operating_Cost_Billions";
pub const FTE_PER_BED: &str = "FTE_per_Bed";

pub const COSTS_TITLE: &str = "Highest Operating Costs ($ Billions)";
pub const FTE_SCATTER_TITLE: &str = "FTE vs Bed Count - Top Outliers";
pub const FTE_RATIO_TITLE: &str = "FTE per Bed Ratio - Top Outliers";
pub const TREND_TITLE: &str = "Contract Labor Trends - Persistent Outliers";

pub fn build(data: &SampleData) -> ViewReport {
    let mut report = ViewReport::new(View::Outlier);

    let costs = data
        .outlier_table()
        .map_column("Operating_Cost_2023", COST_BILLIONS, to_billions)
        .sorted_by(COST_BILLIONS, SortOrder::Ascending);
    report.push(Panel::derived(
        COSTS_TITLE,
        PanelBody::Chart(
            ChartRequest::new(ChartKind::HorizontalBar, costs, COST_BILLIONS, "Hospital").color("State"),
        ),
    ));

    let fte = fte_table();
    report.push(Panel::illustrative(
        FTE_SCATTER_TITLE,
        PanelBody::Chart(
            ChartRequest::new(ChartKind::Bubble, fte.clone(), "Beds", "FTE")
                .size("FTE")
                .color("FTE"),
        ),
    ));

    let ratios = fte
        .combine_columns("FTE", "Beds", FTE_PER_BED, fte_per_bed)
        .sorted_by(FTE_PER_BED, SortOrder::Ascending);
    report.push(Panel::illustrative(
        FTE_RATIO_TITLE,
        PanelBody::Chart(
            ChartRequest::new(ChartKind::HorizontalBar, ratios, FTE_PER_BED, "Hospital").color(FTE_PER_BED),
        ),
    ));

    report.push(Panel::illustrative(
        TREND_TITLE,
        PanelBody::Chart(
            ChartRequest::new(ChartKind::Line, trend_table().drop_missing("Contract_Pct"), "Year", "Contract_Pct")
                .color("Hospital"),
        ),
    ));

    report
}

fn fte_table() -> DataTable {
    let mut table = DataTable::new(&["Hospital", "FTE", "Beds"]);
    for (hospital, fte, beds) in FTE_OUTLIERS {
        table.push_row(vec![hospital.into(), fte.into(), beds.into()]);
    }
    table
}

/// Contract share per hospital and year, gaps included
pub fn trend_table() -> DataTable {
    let mut table = DataTable::new(&["Hospital", "Year", "Contract_Pct", "State"]);
    for (hospital, year, pct, state) in CONTRACT_OUTLIER_TRENDS {
        table.push_row(vec![hospital.into(), year.into(), pct.into(), state.into()]);
    }
    table
}
