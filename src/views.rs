// 🧭 View Selector - the six dashboard views
//
// Views are a closed enum; every dispatch site matches exhaustively.
// Unknown labels fall back to Overview through `View::select`.

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Overview,
    ContractLabor,
    Financial,
    StateComparison,
    Outlier,
    DataQuality,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Overview,
        View::ContractLabor,
        View::Financial,
        View::StateComparison,
        View::Outlier,
        View::DataQuality,
    ];

    /// Label shown in the view selector
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::ContractLabor => "Contract Labor Analysis",
            View::Financial => "Financial Metrics",
            View::StateComparison => "State Comparisons",
            View::Outlier => "Outlier Analysis",
            View::DataQuality => "Data Quality",
        }
    }

    /// URL/CLI friendly name
    pub fn slug(&self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::ContractLabor => "contract-labor",
            View::Financial => "financial-metrics",
            View::StateComparison => "state-comparisons",
            View::Outlier => "outlier-analysis",
            View::DataQuality => "data-quality",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            View::Overview => "Database Overview",
            View::ContractLabor => "Contract Labor Analysis",
            View::Financial => "Financial Metrics Analysis",
            View::StateComparison => "State-wise Financial Comparisons",
            View::Outlier => "Hospital Outlier Analysis",
            View::DataQuality => "Data Quality Assessment",
        }
    }

    /// One-line description for the navigation sidebar
    pub fn summary(&self) -> &'static str {
        match self {
            View::Overview => "Key database metrics and trends",
            View::ContractLabor => "Detailed contract labor analysis",
            View::Financial => "Operating margins and revenue analysis",
            View::StateComparison => "Regional financial comparisons",
            View::Outlier => "Identification of unusual hospitals",
            View::DataQuality => "Assessment of data completeness and issues",
        }
    }

    /// Strict parse: accepts labels and slugs, ignoring case and padding
    pub fn parse(input: &str) -> Result<View, DashboardError> {
        let wanted = input.trim();
        View::ALL
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(wanted) || v.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownView(input.to_string()))
    }

    /// Lenient selection: anything unrecognized renders the Overview
    pub fn select(input: &str) -> View {
        match View::parse(input) {
            Ok(view) => view,
            Err(err) => {
                warn!(error = %err, "falling back to overview");
                View::Overview
            }
        }
    }

    pub fn next(&self) -> Self {
        let idx = self.index();
        View::ALL[(idx + 1) % View::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = self.index();
        View::ALL[(idx + View::ALL.len() - 1) % View::ALL.len()]
    }

    pub fn index(&self) -> usize {
        match self {
            View::Overview => 0,
            View::ContractLabor => 1,
            View::Financial => 2,
            View::StateComparison => 3,
            View::Outlier => 4,
            View::DataQuality => 5,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for View {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::parse(s)
    }
}
