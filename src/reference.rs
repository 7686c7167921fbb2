// Reference figures - literal per-view lookups
//
// None of these are derived from the base tables. Panels built from them
// are tagged Basis::Illustrative so a reader can tell them apart.

use crate::charts::Priority;
use serde::Serialize;

// ============================================================================
// HEADLINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Headline {
    pub total_hospitals: u32,
    pub teaching_hospitals: u32,
    pub states_covered: u32,
    pub financial_records: u32,
    pub department_records: u32,
    pub last_updated: &'static str,
}

pub const HEADLINE: Headline = Headline {
    total_hospitals: 6_229,
    teaching_hospitals: 1_496,
    states_covered: 56,
    financial_records: 21_649,
    department_records: 150_338,
    last_updated: "August 18, 2025",
};

// ============================================================================
// CONTRACT LABOR
// ============================================================================

/// Distribution summary of contract labor share for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContractStats {
    pub year: u16,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub max: f64,
    pub within_target: f64,
}

pub const CONTRACT_STATS: [ContractStats; 4] = [
    ContractStats { year: 2021, mean: 2.1, median: 1.9, std: 1.6, max: 41.9, within_target: 11.8 },
    ContractStats { year: 2022, mean: 2.1, median: 1.9, std: 1.7, max: 43.3, within_target: 12.6 },
    ContractStats { year: 2023, mean: 2.2, median: 1.9, std: 1.6, max: 41.1, within_target: 14.2 },
    ContractStats { year: 2024, mean: 2.3, median: 2.0, std: 1.6, max: 20.2, within_target: 15.4 },
];

pub fn contract_stats(year: u16) -> Option<&'static ContractStats> {
    CONTRACT_STATS.iter().find(|s| s.year == year)
}

/// Top ten states by hospital count with their mean contract share
pub const TOP_CONTRACT_STATES: [(&str, u32, f64); 10] = [
    ("TX", 330, 2.4),
    ("CA", 327, 2.3),
    ("FL", 199, 2.2),
    ("IL", 177, 1.9),
    ("OH", 161, 2.4),
    ("PA", 150, 1.8),
    ("NY", 141, 2.4),
    ("MI", 138, 2.4),
    ("WI", 123, 2.1),
    ("GA", 122, 2.3),
];

/// Hospitals above 15% contract labor in 2023: (hospital, pct, state)
pub const HIGH_CONTRACT_HOSPITALS: [(&str, f64, &str); 4] = [
    ("SAME DAY SURGERY CENTER", 41.1, "SD"),
    ("BLACK HILLS SURGICAL HOSPITAL LLP", 20.2, "SD"),
    ("SALINA SURGICAL HOSPITAL", 17.8, "KS"),
    ("STRAITH HOSPITAL FOR SPECIAL SURGERY", 18.6, "MI"),
];

// ============================================================================
// FINANCIAL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarginRow {
    pub year: u16,
    pub mean_margin: f64,
    pub median_margin: f64,
    pub extreme_negative: u32,
    pub extreme_positive: u32,
}

pub const MARGINS: [MarginRow; 4] = [
    MarginRow { year: 2021, mean_margin: -891_856.3, median_margin: -2.3, extreme_negative: 299, extreme_positive: 21 },
    MarginRow { year: 2022, mean_margin: -2_734_069.7, median_margin: -4.6, extreme_negative: 350, extreme_positive: 14 },
    MarginRow { year: 2023, mean_margin: -2_228_747.8, median_margin: -2.6, extreme_negative: 354, extreme_positive: 29 },
    MarginRow { year: 2024, mean_margin: -7.7, median_margin: -1.1, extreme_negative: 173, extreme_positive: 13 },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenuePerBed {
    pub year: u16,
    pub mean: u64,
    pub median: u64,
    pub outliers: u32,
}

pub const REVENUE_PER_BED: [RevenuePerBed; 4] = [
    RevenuePerBed { year: 2021, mean: 1_431_014, median: 1_161_710, outliers: 222 },
    RevenuePerBed { year: 2022, mean: 1_488_651, median: 1_200_171, outliers: 233 },
    RevenuePerBed { year: 2023, mean: 1_597_886, median: 1_276_304, outliers: 233 },
    RevenuePerBed { year: 2024, mean: 1_721_527, median: 1_367_647, outliers: 120 },
];

// ============================================================================
// OUTLIERS
// ============================================================================

/// (hospital, FTE, beds)
pub const FTE_OUTLIERS: [(&str, u32, u32); 5] = [
    ("HEBREW REHABILITATION CENTER", 172_130, 667),
    ("DALLAS CO. HOSP. DIST.", 123_354, 786),
    ("OU MEDICAL CENTER", 108_157, 819),
    ("YALE NEW HAVEN HOSPITAL", 107_099, 1_306),
    ("CHRISTIANA CARE HEALTH SYSTEM", 95_767, 1_172),
];

/// (hospital, year, contract pct, state); one hospital did not report in 2024
pub const CONTRACT_OUTLIER_TRENDS: [(&str, u16, Option<f64>, &str); 12] = [
    ("SAME DAY SURGERY CENTER", 2021, Some(41.9), "SD"),
    ("BLACK HILLS SURGICAL HOSPITAL LLP", 2021, Some(22.9), "SD"),
    ("SALINA SURGICAL HOSPITAL", 2021, Some(17.5), "KS"),
    ("SAME DAY SURGERY CENTER", 2022, Some(43.3), "SD"),
    ("BLACK HILLS SURGICAL HOSPITAL LLP", 2022, Some(22.0), "SD"),
    ("SALINA SURGICAL HOSPITAL", 2022, Some(18.0), "KS"),
    ("SAME DAY SURGERY CENTER", 2023, Some(41.1), "SD"),
    ("BLACK HILLS SURGICAL HOSPITAL LLP", 2023, Some(20.2), "SD"),
    ("SALINA SURGICAL HOSPITAL", 2023, Some(17.8), "KS"),
    ("SAME DAY SURGERY CENTER", 2024, None, "SD"),
    ("BLACK HILLS SURGICAL HOSPITAL LLP", 2024, Some(20.2), "SD"),
    ("SALINA SURGICAL HOSPITAL", 2024, Some(16.7), "KS"),
];

// ============================================================================
// DATA QUALITY
// ============================================================================

/// (issue, count, severity)
pub const QUALITY_ISSUES: [(&str, u32, &str); 4] = [
    ("Negative Revenue", 25, "High"),
    ("Negative Operating Cost", 5, "High"),
    ("Negative FTE", 0, "None"),
    ("Negative Contract Labor", 9, "Medium"),
];

/// (metric, value, status)
pub const INTEGRITY_METRICS: [(&str, &str, &str); 4] = [
    ("Orphaned Financial Records", "0", "Good"),
    ("Orphaned Department Records", "0", "Good"),
    ("Total Records", "150,338", "Info"),
    ("Data Consistency", "Good", "Good"),
];

/// Critical issues surfaced on the overview
pub const CRITICAL_ISSUES: [(Priority, &str, &str); 4] = [
    (Priority::Critical, "Negative revenue records: 25", "Data integrity violation"),
    (Priority::High, "Negative operating costs: 5", "Validation needed"),
    (Priority::Medium, "Negative contract labor: 9", "Review required"),
    (Priority::High, "Contract labor data coverage: ~71%", "Incomplete reporting"),
];

/// Prioritized follow-ups, in display order
pub const RECOMMENDATIONS: [(Priority, &str, &str); 5] = [
    (
        Priority::High,
        "Contract Labor Coverage: Only ~71% of hospitals report contract labor data",
        "Implement mandatory reporting requirements and data validation checks",
    ),
    (
        Priority::Critical,
        "Negative Values: 25 hospitals with negative revenue need investigation",
        "Immediate data audit and correction procedures required",
    ),
    (
        Priority::Medium,
        "FTE Ratios: 3,337 hospitals have unreasonable FTE/bed ratios",
        "Review staffing calculation methodologies and outlier detection",
    ),
    (
        Priority::Medium,
        "Extreme Margins: High number of hospitals with extreme operating margins",
        "Investigate business model variations and reporting accuracy",
    ),
    (
        Priority::Low,
        "Data Validation: Implement stronger validation rules for financial metrics",
        "Establish automated quality checks and alert systems",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_stats_2023() {
        let stats = contract_stats(2023).unwrap();
        assert_eq!(stats.mean, 2.2);
        assert_eq!(stats.median, 1.9);
        assert_eq!(stats.max, 41.1);
        assert_eq!(stats.within_target, 14.2);
    }

    #[test]
    fn test_contract_stats_unknown_year() {
        assert!(contract_stats(2020).is_none());
        assert!(contract_stats(2025).is_none());
    }

    #[test]
    fn test_trend_has_exactly_one_gap() {
        let gaps: Vec<_> = CONTRACT_OUTLIER_TRENDS
            .iter()
            .filter(|(_, _, pct, _)| pct.is_none())
            .collect();
        assert_eq!(gaps.len(), 1);
        assert_eq!((gaps[0].0, gaps[0].1), ("SAME DAY SURGERY CENTER", 2024));
    }
}
