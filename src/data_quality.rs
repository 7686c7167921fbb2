// ✅ Data Quality Engine - integrity checks over the base tables
//
// The base tables have no enforced keys. These rules check the informal
// ones (year, state, hospital) plus the numeric invariants each table is
// supposed to hold, and report every result with a severity.

use crate::aggregations::TARGET_SUM_TOLERANCE;
use crate::sample_data::{SampleData, YEARS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub rule_name: String,
    pub table: String,
    pub message: String,
    pub confidence: f64,
    pub severity: Severity,
}

impl ValidationResult {
    pub fn pass(rule_name: &str, table: &str, message: &str) -> Self {
        ValidationResult {
            passed: true,
            rule_name: rule_name.to_string(),
            table: table.to_string(),
            message: message.to_string(),
            confidence: 1.0,
            severity: Severity::Info,
        }
    }

    pub fn fail(rule_name: &str, table: &str, message: &str, severity: Severity) -> Self {
        ValidationResult {
            passed: false,
            rule_name: rule_name.to_string(),
            table: table.to_string(),
            message: message.to_string(),
            confidence: if severity == Severity::Critical {
                0.0
            } else {
                0.5
            },
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Table breaks an invariant views rely on
    Warning,  // A join key does not line up across tables
    Info,     // Worth knowing, nothing breaks
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub table: String,
    pub issue: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub overall_quality: f64,
    pub overall_confidence: f64,
    pub validations: Vec<ValidationResult>,
    pub issues: Vec<QualityIssue>,
    pub passed_count: usize,
    pub failed_count: usize,
    pub needs_review: bool,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        format!(
            "Quality: {:.1}%, Confidence: {:.1}%, Issues: {} ({} critical)",
            self.overall_quality * 100.0,
            self.overall_confidence * 100.0,
            self.issues.len(),
            self.issues
                .iter()
                .filter(|i| i.severity == Severity::Critical)
                .count()
        )
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == Severity::Critical)
    }

    pub fn issues_for(&self, table: &str) -> Vec<&QualityIssue> {
        self.issues.iter().filter(|i| i.table == table).collect()
    }

    pub fn result(&self, rule_name: &str) -> Option<&ValidationResult> {
        self.validations.iter().find(|v| v.rule_name == rule_name)
    }
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

pub const CONTRACT_LABOR: &str = "contract_labor";
pub const OPERATING_METRICS: &str = "operating_metrics";
pub const STATE_FINANCIAL: &str = "state_financial";
pub const OUTLIERS: &str = "outliers";

pub struct DataQualityEngine {
    /// Years every per-year table must cover
    expected_years: Vec<u16>,

    /// Allowed drift of the three target shares from 100%
    target_tolerance: f64,

    /// Minimum confidence before the report asks for review
    review_threshold: f64,
}

impl DataQualityEngine {
    pub fn new() -> Self {
        DataQualityEngine {
            expected_years: YEARS.to_vec(),
            target_tolerance: TARGET_SUM_TOLERANCE,
            review_threshold: 0.7,
        }
    }

    /// Validate all four base tables
    pub fn validate(&self, data: &SampleData) -> QualityReport {
        let checks: Vec<(ValidationResult, &str)> = vec![
            (
                self.validate_non_empty(data),
                "Load the base tables before rendering",
            ),
            (
                self.validate_year_coverage(data),
                "Add contract labor and operating rows for every covered year",
            ),
            (
                self.validate_target_split(data),
                "Below, within and above target shares must add up to 100%",
            ),
            (
                self.validate_completeness_range(data),
                "Completeness percentages must lie between 0 and 100",
            ),
            (
                self.validate_unique_states(data),
                "Keep one row per state and year",
            ),
            (
                self.validate_unique_hospitals(data),
                "Keep one row per hospital and year",
            ),
            (
                self.validate_non_negative_amounts(data),
                "Audit negative costs and counts at the source",
            ),
            (
                self.validate_state_cross_reference(data),
                "Add contract labor rows for these states before joining on state",
            ),
            (
                self.validate_outlier_states(data),
                "Add state summaries for states that have outlier hospitals",
            ),
        ];

        let mut validations = Vec::with_capacity(checks.len());
        let mut issues = Vec::new();

        for (result, recommendation) in checks {
            if !result.passed {
                warn!(rule = %result.rule_name, severity = result.severity.as_str(), "{}", result.message);
                issues.push(QualityIssue {
                    severity: result.severity,
                    table: result.table.clone(),
                    issue: result.message.clone(),
                    recommendation: recommendation.to_string(),
                });
            }
            validations.push(result);
        }

        let passed_count = validations.iter().filter(|v| v.passed).count();
        let failed_count = validations.len() - passed_count;
        let overall_quality = passed_count as f64 / validations.len() as f64;
        let overall_confidence: f64 =
            validations.iter().map(|v| v.confidence).sum::<f64>() / validations.len() as f64;

        let report = QualityReport {
            overall_quality,
            overall_confidence,
            validations,
            issues,
            passed_count,
            failed_count,
            needs_review: overall_confidence < self.review_threshold,
        };
        debug!(summary = %report.summary(), "base tables validated");
        report
    }

    // ========================================================================
    // VALIDATION RULES
    // ========================================================================

    fn validate_non_empty(&self, data: &SampleData) -> ValidationResult {
        let empty: Vec<&str> = [
            (CONTRACT_LABOR, data.contract_labor.is_empty()),
            (OPERATING_METRICS, data.operating_metrics.is_empty()),
            (STATE_FINANCIAL, data.state_financials.is_empty()),
            (OUTLIERS, data.outlier_hospitals.is_empty()),
        ]
        .iter()
        .filter(|(_, is_empty)| *is_empty)
        .map(|(name, _)| *name)
        .collect();

        if !empty.is_empty() {
            return ValidationResult::fail(
                "tables_non_empty",
                &empty.join(","),
                &format!("Empty tables: {}", empty.join(", ")),
                Severity::Critical,
            );
        }

        ValidationResult::pass("tables_non_empty", "all", "All base tables have rows")
    }

    fn validate_year_coverage(&self, data: &SampleData) -> ValidationResult {
        let contract: HashSet<u16> = data.contract_labor.iter().map(|r| r.year).collect();
        let operating: HashSet<u16> = data.operating_metrics.iter().map(|r| r.year).collect();

        let missing: Vec<String> = self
            .expected_years
            .iter()
            .filter(|y| !contract.contains(y) || !operating.contains(y))
            .map(|y| y.to_string())
            .collect();

        if !missing.is_empty() {
            return ValidationResult::fail(
                "years_covered",
                CONTRACT_LABOR,
                &format!("Years without rows: {}", missing.join(", ")),
                Severity::Critical,
            );
        }

        ValidationResult::pass(
            "years_covered",
            CONTRACT_LABOR,
            &format!("All {} years covered", self.expected_years.len()),
        )
    }

    fn validate_target_split(&self, data: &SampleData) -> ValidationResult {
        let unbalanced: Vec<String> = data
            .contract_labor
            .iter()
            .filter(|r| (r.target_sum() - 100.0).abs() > self.target_tolerance + 1e-9)
            .map(|r| format!("{} {} ({:.2}%)", r.year, r.state, r.target_sum()))
            .collect();

        if !unbalanced.is_empty() {
            return ValidationResult::fail(
                "target_split_balanced",
                CONTRACT_LABOR,
                &format!("Target shares do not sum to 100%: {}", unbalanced.join(", ")),
                Severity::Critical,
            );
        }

        ValidationResult::pass(
            "target_split_balanced",
            CONTRACT_LABOR,
            "Target shares sum to 100% for every row",
        )
    }

    fn validate_completeness_range(&self, data: &SampleData) -> ValidationResult {
        let out_of_range: Vec<String> = data
            .operating_metrics
            .iter()
            .flat_map(|r| {
                r.completeness()
                    .into_iter()
                    .filter(|(_, v)| !(0.0..=100.0).contains(v))
                    .map(move |(column, v)| format!("{} {}={}", r.year, column, v))
            })
            .collect();

        if !out_of_range.is_empty() {
            return ValidationResult::fail(
                "completeness_in_range",
                OPERATING_METRICS,
                &format!("Completeness outside [0, 100]: {}", out_of_range.join(", ")),
                Severity::Critical,
            );
        }

        ValidationResult::pass(
            "completeness_in_range",
            OPERATING_METRICS,
            "Completeness percentages within [0, 100]",
        )
    }

    fn validate_unique_states(&self, data: &SampleData) -> ValidationResult {
        let duplicates = duplicates(data.state_financials.iter().map(|r| (r.year, r.state.as_str())));

        if !duplicates.is_empty() {
            return ValidationResult::fail(
                "state_unique_per_year",
                STATE_FINANCIAL,
                &format!("Duplicate states: {}", duplicates.join(", ")),
                Severity::Critical,
            );
        }

        ValidationResult::pass("state_unique_per_year", STATE_FINANCIAL, "States unique per year")
    }

    fn validate_unique_hospitals(&self, data: &SampleData) -> ValidationResult {
        let duplicates = duplicates(data.outlier_hospitals.iter().map(|r| (r.year, r.hospital.as_str())));

        if !duplicates.is_empty() {
            return ValidationResult::fail(
                "hospital_unique_per_year",
                OUTLIERS,
                &format!("Duplicate hospitals: {}", duplicates.join(", ")),
                Severity::Critical,
            );
        }

        ValidationResult::pass("hospital_unique_per_year", OUTLIERS, "Hospitals unique per year")
    }

    fn validate_non_negative_amounts(&self, data: &SampleData) -> ValidationResult {
        let negative: Vec<String> = data
            .contract_labor
            .iter()
            .filter(|r| r.mean_contract_pct < 0.0)
            .map(|r| format!("{} {} contract pct", r.year, r.state))
            .chain(
                data.state_financials
                    .iter()
                    .filter(|r| r.outlier_pct < 0.0)
                    .map(|r| format!("{} outlier pct", r.state)),
            )
            .collect();

        if !negative.is_empty() {
            return ValidationResult::fail(
                "amounts_non_negative",
                CONTRACT_LABOR,
                &format!("Negative values: {}", negative.join(", ")),
                Severity::Warning,
            );
        }

        ValidationResult::pass("amounts_non_negative", "all", "No negative percentages")
    }

    fn validate_state_cross_reference(&self, data: &SampleData) -> ValidationResult {
        let contract_states: HashSet<&str> =
            data.contract_labor.iter().map(|r| r.state.as_str()).collect();

        let missing: BTreeSet<&str> = data
            .state_financials
            .iter()
            .map(|r| r.state.as_str())
            .filter(|s| !contract_states.contains(s))
            .collect();

        if !missing.is_empty() {
            let missing: Vec<&str> = missing.into_iter().collect();
            return ValidationResult::fail(
                "states_cross_referenced",
                STATE_FINANCIAL,
                &format!("States without contract labor rows: {}", missing.join(", ")),
                Severity::Warning,
            );
        }

        ValidationResult::pass(
            "states_cross_referenced",
            STATE_FINANCIAL,
            "Every state has contract labor rows",
        )
    }

    fn validate_outlier_states(&self, data: &SampleData) -> ValidationResult {
        let known: HashSet<&str> = data.state_financials.iter().map(|r| r.state.as_str()).collect();

        let missing: BTreeSet<&str> = data
            .outlier_hospitals
            .iter()
            .map(|r| r.state.as_str())
            .filter(|s| !known.contains(s))
            .collect();

        if !missing.is_empty() {
            let missing: Vec<&str> = missing.into_iter().collect();
            return ValidationResult::fail(
                "outlier_states_known",
                OUTLIERS,
                &format!("Outlier states without a state summary: {}", missing.join(", ")),
                Severity::Info,
            );
        }

        ValidationResult::pass("outlier_states_known", OUTLIERS, "Outlier states have summaries")
    }
}

impl Default for DataQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys seen more than once, formatted "year key", in first-seen order
fn duplicates<'a>(keys: impl Iterator<Item = (u16, &'a str)>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for key in keys {
        if !seen.insert(key) {
            let label = format!("{} {}", key.0, key.1);
            if !dupes.contains(&label) {
                dupes.push(label);
            }
        }
    }
    dupes
}

// ============================================================================
// TESTS
// ============================================================================
