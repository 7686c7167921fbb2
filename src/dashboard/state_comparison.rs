// 🗺️ State Comparisons - operating cost, size and outlier share per state

use crate::aggregations::to_millions;
use crate::charts::{ChartKind, ChartRequest, Panel, PanelBody, ViewReport};
use crate::sample_data::SampleData;
use crate::table::{DataTable, SortOrder};
use crate::views::View;

pub const COST_MILLIONS: &str = "Mean_Operating_Cost_Millions";

pub const COSTS_TITLE: &str = "Mean Operating Costs by State (2023)";
pub const BUBBLE_TITLE: &str = "Hospital Count vs Mean Operating Cost";
pub const OUTLIER_TITLE: &str = "Percentage of Financial Outliers by State";
pub const SUMMARY_TITLE: &str = "State Rankings Summary";

pub fn build(data: &SampleData) -> ViewReport {
    let mut report = ViewReport::new(View::StateComparison);
    let states = with_cost_millions(data.state_table());

    report.push(Panel::derived(
        COSTS_TITLE,
        PanelBody::Chart(
            ChartRequest::new(
                ChartKind::HorizontalBar,
                states.clone().sorted_by(COST_MILLIONS, SortOrder::Ascending),
                COST_MILLIONS,
                "State",
            )
            .color(COST_MILLIONS),
        ),
    ));

    report.push(Panel::derived(
        BUBBLE_TITLE,
        PanelBody::Chart(
            ChartRequest::new(ChartKind::Bubble, states.clone(), "Hospital_Count_2023", COST_MILLIONS)
                .size("Hospital_Count_2023")
                .color("Outlier_Percentage"),
        ),
    ));

    report.push(Panel::derived(
        OUTLIER_TITLE,
        PanelBody::Chart(
            ChartRequest::new(
                ChartKind::Bar,
                states.clone().sorted_by("Outlier_Percentage", SortOrder::Descending),
                "State",
                "Outlier_Percentage",
            )
            .color("Outlier_Percentage"),
        ),
    ));

    report.push(Panel::derived(SUMMARY_TITLE, PanelBody::Table(summary_table(states))));

    report
}

/// Adds the cost column in $ millions
pub fn with_cost_millions(states: DataTable) -> DataTable {
    states.map_column("Mean_Operating_Cost_2023", COST_MILLIONS, to_millions)
}

/// Ranked by cost (highest first), cost rounded to 0.1 and columns renamed
pub fn summary_table(states: DataTable) -> DataTable {
    states
        .round_column(COST_MILLIONS, 1)
        .sorted_by(COST_MILLIONS, SortOrder::Descending)
        .select(&["State", "Hospital_Count_2023", COST_MILLIONS, "Outlier_Percentage"])
        .rename(&[
            ("Hospital_Count_2023", "Hospital Count"),
            (COST_MILLIONS, "Mean Cost ($M)"),
            ("Outlier_Percentage", "Outlier %"),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs_sorted_ascending_in_millions() {
        let report = build(&SampleData::load());
        let chart = report.panel(COSTS_TITLE).unwrap().chart().unwrap();

        let costs: Vec<f64> = chart.table.numbers(COST_MILLIONS).into_iter().flatten().collect();
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(chart.table.texts("State")[0], "LA");
        assert_eq!(costs[0], 103_938_058.0 / 1e6);
        assert_eq!(chart.table.texts("State")[9], "NY");
    }

    #[test]
    fn test_outlier_share_sorted_descending() {
        let report = build(&SampleData::load());
        let chart = report.panel(OUTLIER_TITLE).unwrap().chart().unwrap();

        assert_eq!(
            chart.table.texts("State"),
            vec!["LA", "TX", "PA", "OH", "IN", "GA", "NY", "FL", "IL", "CA"]
        );
    }

    #[test]
    fn test_outlier_sort_keeps_input_order_on_ties() {
        let mut states = SampleData::load();
        // give PA and IN the same share as GA
        for s in states.state_financials.iter_mut() {
            if s.state == "PA" || s.state == "IN" {
                s.outlier_pct = 10.0;
            }
        }
        let report = build(&states);
        let chart = report.panel(OUTLIER_TITLE).unwrap().chart().unwrap();
        let order = chart.table.texts("State");

        let tied: Vec<&String> = order.iter().filter(|s| ["PA", "IN", "GA"].contains(&s.as_str())).collect();
        assert_eq!(tied, vec!["PA", "IN", "GA"]);
    }

    #[test]
    fn test_bubble_fields() {
        let report = build(&SampleData::load());
        let chart = report.panel(BUBBLE_TITLE).unwrap().chart().unwrap();
        assert_eq!(chart.kind, ChartKind::Bubble);
        assert_eq!(chart.size.as_deref(), Some("Hospital_Count_2023"));
        assert_eq!(chart.color.as_deref(), Some("Outlier_Percentage"));
    }

    #[test]
    fn test_summary_table() {
        let report = build(&SampleData::load());
        let table = match &report.panel(SUMMARY_TITLE).unwrap().body {
            PanelBody::Table(table) => table.clone(),
            other => panic!("unexpected body {:?}", other),
        };

        assert_eq!(table.columns(), &["State", "Hospital Count", "Mean Cost ($M)", "Outlier %"]);
        assert_eq!(table.texts("State")[0], "NY");
        assert_eq!(table.numbers("Mean Cost ($M)")[0], Some(704.6));
        assert_eq!(table.numbers("Mean Cost ($M)")[9], Some(103.9));
    }
}
