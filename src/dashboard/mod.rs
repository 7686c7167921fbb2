// Per-view aggregators
//
// Each view reads the base tables, reshapes them, and returns a ViewReport.
// Dispatch is an exhaustive match on View; there is no catch-all branch.

pub mod contract_labor;
pub mod data_quality;
pub mod financial;
pub mod outlier;
pub mod overview;
pub mod state_comparison;

use crate::charts::ViewReport;
use crate::sample_data::SampleData;
use crate::views::View;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Year preselected in the contract labor view
pub const DEFAULT_YEAR: u16 = 2023;

/// Per-request inputs beyond the view itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    pub year: u16,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions { year: DEFAULT_YEAR }
    }
}

impl ViewOptions {
    pub fn for_year(year: u16) -> Self {
        ViewOptions { year }
    }
}

pub fn render_view(view: View, data: &SampleData, options: &ViewOptions) -> ViewReport {
    debug!(view = view.slug(), year = options.year, "rendering view");

    let report = match view {
        View::Overview => overview::build(data),
        View::ContractLabor => contract_labor::build(data, options.year),
        View::Financial => financial::build(data),
        View::StateComparison => state_comparison::build(data),
        View::Outlier => outlier::build(data),
        View::DataQuality => data_quality::build(data),
    };

    if report.placeholders() > 0 {
        debug!(view = view.slug(), placeholders = report.placeholders(), "view rendered with gaps");
    }
    report
}

/// Select by label (unknown labels render the Overview) and render
pub fn render_label(label: &str, data: &SampleData, options: &ViewOptions) -> ViewReport {
    render_view(View::select(label), data, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_view_renders_panels() {
        let data = SampleData::load();
        for view in View::ALL {
            let report = render_view(view, &data, &ViewOptions::default());
            assert_eq!(report.view, view);
            assert!(!report.panels.is_empty(), "{} has no panels", view);
            assert_eq!(report.placeholders(), 0, "{} has placeholders", view);
        }
    }

    #[test]
    fn test_unknown_label_renders_overview() {
        let data = SampleData::load();
        let report = render_label("Quarterly Billing", &data, &ViewOptions::default());
        assert_eq!(report.view, View::Overview);
        assert_eq!(report, render_view(View::Overview, &data, &ViewOptions::default()));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let data = SampleData::load();
        let options = ViewOptions::for_year(2022);
        for view in View::ALL {
            assert_eq!(render_view(view, &data, &options), render_view(view, &data, &options));
        }
    }
}
