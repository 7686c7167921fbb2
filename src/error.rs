// Dashboard errors
//
// Only two conditions are recoverable at runtime: an unknown view label
// (falls back to Overview) and a lookup missing its join key (the panel
// renders a placeholder). Everything else is I/O at the edges.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Selector value outside the known set of views
    #[error("unknown view: {0:?}")]
    UnknownView(String),

    /// A derived table is missing an expected join key (e.g. a year)
    #[error("{table} has no entry for {key}")]
    MissingKey { table: &'static str, key: String },

    /// Invalid parameters for the synthetic sample
    #[error("distribution error: {0}")]
    Distribution(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn missing_year(table: &'static str, year: u16) -> Self {
        DashboardError::MissingKey {
            table,
            key: format!("year {}", year),
        }
    }

    /// True for the errors a view turns into a placeholder panel
    pub fn is_data_shape(&self) -> bool {
        matches!(self, DashboardError::MissingKey { .. })
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_year_message() {
        let err = DashboardError::missing_year("contract labor statistics", 2019);
        assert!(err.is_data_shape());
        assert_eq!(err.to_string(), "contract labor statistics has no entry for year 2019");
    }

    #[test]
    fn test_unknown_view_is_not_data_shape() {
        let err = DashboardError::UnknownView("Billing".to_string());
        assert!(!err.is_data_shape());
        assert!(err.to_string().contains("Billing"));
    }
}
