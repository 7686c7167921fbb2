// 🏥 Sample Data Provider - the four base tables every view reads from
//
// All four tables are literal snapshots. They are built once per process,
// memoized under a fixed cache key, and handed to views as Arc<SampleData>.

use crate::table::{DataTable, Tabular, Value};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Cache key for the memoized base tables
pub const SAMPLE_DATA_KEY: &str = "sample_data_v1";

/// Years covered by the sample snapshot
pub const YEARS: [u16; 4] = [2021, 2022, 2023, 2024];

/// Snapshot year of the state and outlier tables
pub const SNAPSHOT_YEAR: u16 = 2023;

// ============================================================================
// RECORDS
// ============================================================================

/// Contract labor share per (year, state)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractLaborRecord {
    #[serde(rename = "Year")]
    pub year: u16,

    #[serde(rename = "State")]
    pub state: String,

    #[serde(rename = "Hospital_Count")]
    pub hospital_count: u32,

    #[serde(rename = "Mean_Contract_Pct")]
    pub mean_contract_pct: f64,

    /// Share of hospitals inside the 3%-5% band
    #[serde(rename = "Within_Target")]
    pub within_target_pct: f64,

    #[serde(rename = "Below_Target")]
    pub below_target_pct: f64,

    #[serde(rename = "Above_Target")]
    pub above_target_pct: f64,
}

impl ContractLaborRecord {
    pub fn target_sum(&self) -> f64 {
        self.below_target_pct + self.within_target_pct + self.above_target_pct
    }
}

/// Hospital count and field completeness per year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingMetricsRecord {
    #[serde(rename = "Year")]
    pub year: u16,

    #[serde(rename = "Total_Hospitals")]
    pub total_hospitals: u32,

    #[serde(rename = "Revenue_Complete")]
    pub revenue_complete_pct: f64,

    #[serde(rename = "Cost_Complete")]
    pub cost_complete_pct: f64,

    #[serde(rename = "FTE_Complete")]
    pub fte_complete_pct: f64,

    #[serde(rename = "Contract_Complete")]
    pub contract_complete_pct: f64,
}

impl OperatingMetricsRecord {
    /// (column, value) pairs of the four completeness percentages
    pub fn completeness(&self) -> [(&'static str, f64); 4] {
        [
            ("Revenue_Complete", self.revenue_complete_pct),
            ("Cost_Complete", self.cost_complete_pct),
            ("FTE_Complete", self.fte_complete_pct),
            ("Contract_Complete", self.contract_complete_pct),
        ]
    }
}

/// Per-state financial summary; state is the natural key within a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFinancialRecord {
    #[serde(skip)]
    pub year: u16,

    #[serde(rename = "State")]
    pub state: String,

    #[serde(rename = "Hospital_Count_2023")]
    pub hospital_count: u32,

    /// Raw dollars
    #[serde(rename = "Mean_Operating_Cost_2023")]
    pub mean_operating_cost: u64,

    #[serde(rename = "Outlier_Percentage")]
    pub outlier_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HospitalType {
    Teaching,
}

impl HospitalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HospitalType::Teaching => "Teaching",
        }
    }
}

/// Hospital with an extreme operating cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierHospitalRecord {
    #[serde(skip)]
    pub year: u16,

    #[serde(rename = "Hospital")]
    pub hospital: String,

    #[serde(rename = "State")]
    pub state: String,

    /// Raw dollars
    #[serde(rename = "Operating_Cost_2023")]
    pub operating_cost: u64,

    #[serde(rename = "Type")]
    pub hospital_type: HospitalType,
}

// ============================================================================
// TABLE LAYOUT
// ============================================================================

impl Tabular for ContractLaborRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Year",
        "State",
        "Hospital_Count",
        "Mean_Contract_Pct",
        "Within_Target",
        "Below_Target",
        "Above_Target",
    ];

    fn row(&self) -> Vec<Value> {
        vec![
            self.year.into(),
            self.state.as_str().into(),
            self.hospital_count.into(),
            self.mean_contract_pct.into(),
            self.within_target_pct.into(),
            self.below_target_pct.into(),
            self.above_target_pct.into(),
        ]
    }
}

impl Tabular for OperatingMetricsRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Year",
        "Total_Hospitals",
        "Revenue_Complete",
        "Cost_Complete",
        "FTE_Complete",
        "Contract_Complete",
    ];

    fn row(&self) -> Vec<Value> {
        vec![
            self.year.into(),
            self.total_hospitals.into(),
            self.revenue_complete_pct.into(),
            self.cost_complete_pct.into(),
            self.fte_complete_pct.into(),
            self.contract_complete_pct.into(),
        ]
    }
}

impl Tabular for StateFinancialRecord {
    const COLUMNS: &'static [&'static str] = &[
        "State",
        "Hospital_Count_2023",
        "Mean_Operating_Cost_2023",
        "Outlier_Percentage",
    ];

    fn row(&self) -> Vec<Value> {
        vec![
            self.state.as_str().into(),
            self.hospital_count.into(),
            self.mean_operating_cost.into(),
            self.outlier_pct.into(),
        ]
    }
}

impl Tabular for OutlierHospitalRecord {
    const COLUMNS: &'static [&'static str] = &["Hospital", "State", "Operating_Cost_2023", "Type"];

    fn row(&self) -> Vec<Value> {
        vec![
            self.hospital.as_str().into(),
            self.state.as_str().into(),
            self.operating_cost.into(),
            self.hospital_type.as_str().into(),
        ]
    }
}

// ============================================================================
// SAMPLE DATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SampleData {
    pub contract_labor: Vec<ContractLaborRecord>,
    pub operating_metrics: Vec<OperatingMetricsRecord>,
    pub state_financials: Vec<StateFinancialRecord>,
    pub outlier_hospitals: Vec<OutlierHospitalRecord>,
}

impl SampleData {
    /// Build the four base tables from their literal values
    pub fn load() -> Self {
        SampleData {
            contract_labor: contract_labor_records(),
            operating_metrics: operating_metrics_records(),
            state_financials: state_financial_records(),
            outlier_hospitals: outlier_hospital_records(),
        }
    }

    /// Tables with no rows (export still works on these)
    pub fn empty() -> Self {
        SampleData::default()
    }

    /// First contract labor record of a year (target shares are per year)
    pub fn contract_for_year(&self, year: u16) -> Option<&ContractLaborRecord> {
        self.contract_labor.iter().find(|r| r.year == year)
    }

    pub fn contract_labor_table(&self) -> DataTable {
        DataTable::from_records(&self.contract_labor)
    }

    pub fn operating_table(&self) -> DataTable {
        DataTable::from_records(&self.operating_metrics)
    }

    pub fn state_table(&self) -> DataTable {
        DataTable::from_records(&self.state_financials)
    }

    pub fn outlier_table(&self) -> DataTable {
        DataTable::from_records(&self.outlier_hospitals)
    }

    pub fn total_records(&self) -> usize {
        self.contract_labor.len()
            + self.operating_metrics.len()
            + self.state_financials.len()
            + self.outlier_hospitals.len()
    }

    /// SHA-256 over the exported CSV body; identical builds share it
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        match crate::export::to_csv_bytes(self) {
            Ok(bytes) => hasher.update(&bytes),
            // Writing into a Vec cannot fail in practice; hash the debug form instead
            Err(_) => hasher.update(format!("{:?}", self).as_bytes()),
        }
        format!("{:x}", hasher.finalize())
    }
}

fn contract_labor_records() -> Vec<ContractLaborRecord> {
    const STATES: [&str; 4] = ["TX", "CA", "FL", "OH"];
    const WITHIN: [f64; 4] = [11.8, 12.6, 14.2, 15.4];
    const BELOW: [f64; 4] = [85.0, 84.0, 82.3, 79.8];
    const ABOVE: [f64; 4] = [3.2, 3.4, 3.6, 4.8];
    const COUNTS: [u32; 16] = [
        343, 338, 196, 167, 332, 330, 197, 163, 330, 327, 199, 161, 179, 189, 126, 111,
    ];
    const MEANS: [f64; 16] = [
        2.4, 2.2, 2.0, 2.4, 2.4, 2.4, 2.1, 2.4, 2.4, 2.3, 2.2, 2.4, 2.6, 2.5, 2.4, 2.6,
    ];

    // 40 rows cycling through the year/state pairs; rows past the first
    // sixteen carry filler counts
    (0..40)
        .map(|i| {
            let k = i % 4;
            ContractLaborRecord {
                year: YEARS[k],
                state: STATES[k].to_string(),
                hospital_count: COUNTS.get(i).copied().unwrap_or(100),
                mean_contract_pct: MEANS.get(i).copied().unwrap_or(2.0),
                within_target_pct: WITHIN[k],
                below_target_pct: BELOW[k],
                above_target_pct: ABOVE[k],
            }
        })
        .collect()
}

fn operating_metrics_records() -> Vec<OperatingMetricsRecord> {
    let rows: [(u16, u32, f64, f64, f64, f64); 4] = [
        (2021, 6056, 96.2, 98.7, 84.1, 72.6),
        (2022, 6066, 96.0, 98.6, 83.3, 71.7),
        (2023, 6103, 96.0, 98.6, 82.8, 71.0),
        (2024, 3424, 97.9, 99.2, 83.1, 71.5),
    ];

    rows.iter()
        .map(|&(year, total, revenue, cost, fte, contract)| OperatingMetricsRecord {
            year,
            total_hospitals: total,
            revenue_complete_pct: revenue,
            cost_complete_pct: cost,
            fte_complete_pct: fte,
            contract_complete_pct: contract,
        })
        .collect()
}

fn state_financial_records() -> Vec<StateFinancialRecord> {
    let rows: [(&str, u32, u64, f64); 10] = [
        ("TX", 570, 186_662_556, 14.9),
        ("CA", 396, 439_031_724, 5.8),
        ("FL", 261, 303_463_674, 8.4),
        ("OH", 220, 299_311_128, 10.9),
        ("PA", 203, 325_987_469, 11.3),
        ("LA", 195, 103_938_058, 16.4),
        ("IL", 199, 266_668_769, 7.5),
        ("IN", 169, 192_137_948, 10.7),
        ("NY", 164, 704_628_680, 9.8),
        ("GA", 160, 226_425_251, 10.0),
    ];

    rows.iter()
        .map(|&(state, count, cost, outlier)| StateFinancialRecord {
            year: SNAPSHOT_YEAR,
            state: state.to_string(),
            hospital_count: count,
            mean_operating_cost: cost,
            outlier_pct: outlier,
        })
        .collect()
}

fn outlier_hospital_records() -> Vec<OutlierHospitalRecord> {
    let rows: [(&str, &str, u64); 6] = [
        ("STANFORD HEALTH CARE", "CA", 7_425_866_725),
        ("UCSF MEDICAL CENTER", "CA", 5_835_800_029),
        ("NEW YORK PRESBYTERIAN HOSPITAL", "NY", 9_818_337_999),
        ("NYU LANGONE HOSPITALS", "NY", 8_956_110_402),
        ("CLEVELAND CLINIC HOSPITAL", "OH", 8_323_985_995),
        ("UT MD ANDERSON CANCER CENTER", "TX", 5_471_697_134),
    ];

    rows.iter()
        .map(|&(hospital, state, cost)| OutlierHospitalRecord {
            year: SNAPSHOT_YEAR,
            hospital: hospital.to_string(),
            state: state.to_string(),
            operating_cost: cost,
            hospital_type: HospitalType::Teaching,
        })
        .collect()
}

// ============================================================================
// MEMOIZATION CACHE
// ============================================================================

/// Memoizes base-table construction by key.
///
/// Entries live until process restart. Readers share one Arc per key.
pub struct SampleDataCache {
    entries: Arc<RwLock<HashMap<String, Arc<SampleData>>>>,
    builds: AtomicUsize,
}

impl SampleDataCache {
    pub fn new() -> Self {
        SampleDataCache {
            entries: Arc::new(RwLock::new(HashMap::new())),
            builds: AtomicUsize::new(0),
        }
    }

    /// The sample tables under SAMPLE_DATA_KEY, built on first access
    pub fn sample_data(&self) -> Arc<SampleData> {
        self.get_or_insert_with(SAMPLE_DATA_KEY, SampleData::load)
    }

    pub fn get_or_insert_with<F>(&self, key: &str, build: F) -> Arc<SampleData>
    where
        F: FnOnce() -> SampleData,
    {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(data) = entries.get(key) {
                debug!(key, "sample data cache hit");
                return Arc::clone(data);
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have built it between the two locks
        if let Some(data) = entries.get(key) {
            return Arc::clone(data);
        }

        let data = Arc::new(build());
        self.builds.fetch_add(1, Ordering::SeqCst);
        info!(key, records = data.total_records(), "built sample data");
        entries.insert(key.to_string(), Arc::clone(&data));
        data
    }

    /// How many times a builder actually ran
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl Default for SampleDataCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        let data = SampleData::load();
        assert_eq!(data.contract_labor.len(), 40);
        assert_eq!(data.operating_metrics.len(), 4);
        assert_eq!(data.state_financials.len(), 10);
        assert_eq!(data.outlier_hospitals.len(), 6);
        assert_eq!(data.total_records(), 60);
    }

    #[test]
    fn test_contract_labor_cycles_year_and_state() {
        let data = SampleData::load();
        let first = &data.contract_labor[0];
        assert_eq!((first.year, first.state.as_str(), first.hospital_count), (2021, "TX", 343));

        let sixth = &data.contract_labor[6];
        assert_eq!((sixth.year, sixth.state.as_str()), (2023, "FL"));
        assert_eq!(sixth.mean_contract_pct, 2.1);

        let filler = &data.contract_labor[39];
        assert_eq!((filler.year, filler.hospital_count, filler.mean_contract_pct), (2024, 100, 2.0));
    }

    #[test]
    fn test_target_categories_sum_to_hundred() {
        let data = SampleData::load();
        for year in YEARS {
            let record = data.contract_for_year(year).unwrap();
            assert!(
                (record.target_sum() - 100.0).abs() <= 0.1 + 1e-9,
                "year {} sums to {}",
                year,
                record.target_sum()
            );
        }
    }

    #[test]
    fn test_load_is_deterministic() {
        assert_eq!(SampleData::load(), SampleData::load());
        assert_eq!(SampleData::load().fingerprint(), SampleData::load().fingerprint());
        assert_ne!(SampleData::load().fingerprint(), SampleData::empty().fingerprint());
    }

    #[test]
    fn test_cache_builds_once() {
        let cache = SampleDataCache::new();
        let a = cache.sample_data();
        let b = cache.sample_data();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.build_count(), 1);
    }

    #[test]
    fn test_cache_keys_are_independent() {
        let cache = SampleDataCache::new();
        let sample = cache.sample_data();
        let empty = cache.get_or_insert_with("empty", SampleData::empty);

        assert_eq!(empty.total_records(), 0);
        assert_eq!(sample.total_records(), 60);
        assert_eq!(cache.build_count(), 2);
    }

    #[test]
    fn test_tables_follow_record_columns() {
        let data = SampleData::load();
        let states = data.state_table();
        assert_eq!(states.columns()[0], "State");
        assert_eq!(states.numbers("Mean_Operating_Cost_2023")[0], Some(186_662_556.0));

        let outliers = data.outlier_table();
        assert_eq!(outliers.texts("Type")[0], "Teaching");
    }
}
