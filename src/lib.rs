// HCRIS Hospital Analytics Dashboard - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod error;
pub mod table;          // Column-named tables handed to renderers
pub mod sample_data;    // Base tables + memoization cache
pub mod reference;      // Literal figures shown by illustrative panels
pub mod views;          // View selector
pub mod charts;         // Chart requests, panels, view reports
pub mod aggregations;   // Unit conversions, target split, synthetic sample
pub mod dashboard;      // Per-view aggregators
pub mod data_quality;   // Base-table validation
pub mod export;         // CSV export
pub mod render;         // Text and JSON renderers
pub mod config;

// Re-export commonly used types
pub use error::{DashboardError, Result};
pub use table::{DataTable, SortOrder, Tabular, Value};
pub use sample_data::{
    ContractLaborRecord, HospitalType, OperatingMetricsRecord, OutlierHospitalRecord,
    SampleData, SampleDataCache, StateFinancialRecord,
    SAMPLE_DATA_KEY, SNAPSHOT_YEAR, YEARS,
};
pub use views::View;
pub use charts::{
    Basis, ChartKind, ChartRequest, Metric, Note, Panel, PanelBody, Priority,
    ReferenceLine, ViewReport,
};
pub use dashboard::{render_label, render_view, ViewOptions, DEFAULT_YEAR};
pub use data_quality::{
    DataQualityEngine, QualityIssue, QualityReport, Severity, ValidationResult,
};
pub use export::{export_filename, to_csv_bytes, write_export};
pub use render::{JsonRenderer, Renderer, TextRenderer};
pub use config::DashboardConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
