// 💾 CSV Export - the four base tables stacked into one file
//
// Each table gets a `source` column naming where its rows came from. Columns
// are the union of all tables in first-appearance order; cells a table does
// not have are left empty.

use crate::error::{DashboardError, Result};
use crate::sample_data::SampleData;
use crate::table::{DataTable, Value};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SOURCE_COLUMN: &str = "source";

pub const CONTRACT_LABOR_SOURCE: &str = "contract_labor";
pub const OPERATING_METRICS_SOURCE: &str = "operating_metrics";
pub const STATE_FINANCIAL_SOURCE: &str = "state_financial";
pub const OUTLIERS_SOURCE: &str = "outliers";

/// The base tables tagged with their source and stacked
pub fn combined_table(data: &SampleData) -> DataTable {
    DataTable::concat(&[
        tagged(data.contract_labor_table(), CONTRACT_LABOR_SOURCE),
        tagged(data.operating_table(), OPERATING_METRICS_SOURCE),
        tagged(data.state_table(), STATE_FINANCIAL_SOURCE),
        tagged(data.outlier_table(), OUTLIERS_SOURCE),
    ])
}

fn tagged(table: DataTable, source: &str) -> DataTable {
    let tags = vec![Value::from(source); table.len()];
    table.with_column(SOURCE_COLUMN, tags)
}

/// CSV body of the combined table; header is written even with no rows
pub fn to_csv_bytes(data: &SampleData) -> Result<Vec<u8>> {
    let table = combined_table(data);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(Value::to_csv_field))?;
    }

    writer
        .into_inner()
        .map_err(|err| DashboardError::Io(err.into_error()))
}

/// hcris_dashboard_data_YYYYMMDD.csv
pub fn export_filename(date: NaiveDate) -> String {
    format!("hcris_dashboard_data_{}.csv", date.format("%Y%m%d"))
}

/// Write today's export into `dir` and return the file path
pub fn write_export(data: &SampleData, dir: &Path) -> anyhow::Result<PathBuf> {
    let bytes = to_csv_bytes(data).context("Failed to encode export CSV")?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_filename(Local::now().date_naive()));
    fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = data.total_records(),
        fingerprint = %data.fingerprint(),
        "exported dashboard data"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_back(bytes: &[u8]) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader.headers().unwrap().clone();
        let rows = reader.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn test_header_is_union_in_first_appearance_order() {
        let bytes = to_csv_bytes(&SampleData::load()).unwrap();
        let (headers, rows) = read_back(&bytes);

        let headers: Vec<&str> = headers.iter().collect();
        assert_eq!(
            headers,
            vec![
                "Year",
                "State",
                "Hospital_Count",
                "Mean_Contract_Pct",
                "Within_Target",
                "Below_Target",
                "Above_Target",
                "source",
                "Total_Hospitals",
                "Revenue_Complete",
                "Cost_Complete",
                "FTE_Complete",
                "Contract_Complete",
                "Hospital_Count_2023",
                "Mean_Operating_Cost_2023",
                "Outlier_Percentage",
                "Hospital",
                "Operating_Cost_2023",
                "Type",
            ]
        );
        assert_eq!(rows.len(), 60);
    }

    #[test]
    fn test_every_row_has_source() {
        let bytes = to_csv_bytes(&SampleData::load()).unwrap();
        let (headers, rows) = read_back(&bytes);
        let source = headers.iter().position(|h| h == SOURCE_COLUMN).unwrap();

        let sources: Vec<&str> = rows.iter().map(|r| &r[source]).collect();
        assert!(sources.iter().all(|s| !s.is_empty()));
        assert_eq!(sources.iter().filter(|s| **s == CONTRACT_LABOR_SOURCE).count(), 40);
        assert_eq!(sources.iter().filter(|s| **s == OPERATING_METRICS_SOURCE).count(), 4);
        assert_eq!(sources.iter().filter(|s| **s == STATE_FINANCIAL_SOURCE).count(), 10);
        assert_eq!(sources.iter().filter(|s| **s == OUTLIERS_SOURCE).count(), 6);
    }

    #[test]
    fn test_absent_cells_are_empty() {
        let bytes = to_csv_bytes(&SampleData::load()).unwrap();
        let (headers, rows) = read_back(&bytes);
        let hospital = headers.iter().position(|h| h == "Hospital").unwrap();
        let below = headers.iter().position(|h| h == "Below_Target").unwrap();

        // first row is contract labor, last row an outlier hospital
        assert_eq!(&rows[0][hospital], "");
        assert_eq!(&rows[0][below], "85.0");
        assert_eq!(&rows[59][hospital], "UT MD ANDERSON CANCER CENTER");
        assert_eq!(&rows[59][below], "");
    }

    #[test]
    fn test_empty_tables_give_header_only_csv() {
        let bytes = to_csv_bytes(&SampleData::empty()).unwrap();
        let (headers, rows) = read_back(&bytes);

        assert!(rows.is_empty());
        assert_eq!(headers.len(), 19);
        assert!(headers.iter().any(|h| h == SOURCE_COLUMN));
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_filename(date), "hcris_dashboard_data_20250307.csv");
    }

    #[test]
    fn test_write_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");

        let path = write_export(&SampleData::load(), &target).unwrap();

        assert!(path.starts_with(&target));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("hcris_dashboard_data_"));
        assert!(name.ends_with(".csv"));

        let written = fs::read(&path).unwrap();
        assert_eq!(written, to_csv_bytes(&SampleData::load()).unwrap());
    }
}
