// 📋 Data Table - the shape handed to renderers and to the CSV export
//
// A small column-named table of loosely typed cells. Views build one per
// chart from the typed base records, then reshape it (derive, sort, drop,
// rename) before it crosses the renderer boundary.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// CELL VALUE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Cell text for the CSV export (floats keep their decimal point)
    pub fn to_csv_field(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) if v.is_nan() => String::new(),
            Value::Float(v) => format!("{:?}", v),
            Value::Text(s) => s.clone(),
            Value::Missing => String::new(),
        }
    }

    fn compare(&self, other: &Value) -> Ordering {
        match (self.is_missing(), other.is_missing()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }

        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => write!(f, "-"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map(Value::Float).unwrap_or(Value::Missing)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Typed records that can be laid out as a table
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    fn row(&self) -> Vec<Value>;
}

// ============================================================================
// DATA TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: &[&str]) -> Self {
        DataTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_records<T: Tabular>(records: &[T]) -> Self {
        let mut table = DataTable::new(T::COLUMNS);
        for record in records {
            table.push_row(record.row());
        }
        table
    }

    /// Append a row; short rows are padded with missing cells
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        debug_assert!(row.len() <= self.columns.len(), "row wider than table");
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Numeric view of a column; unknown columns yield an empty vector
    pub fn numbers(&self, column: &str) -> Vec<Option<f64>> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().map(|r| r[idx].as_f64()).collect(),
            None => Vec::new(),
        }
    }

    pub fn texts(&self, column: &str) -> Vec<String> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().map(|r| r[idx].to_string()).collect(),
            None => Vec::new(),
        }
    }

    /// Add (or replace) a column from precomputed values
    pub fn with_column(mut self, name: &str, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                let mut values = values.into_iter();
                for row in self.rows.iter_mut() {
                    row.push(values.next().unwrap_or(Value::Missing));
                }
            }
        }
        self
    }

    /// Derive a numeric column from another one; missing inputs stay missing
    pub fn map_column<F>(self, source: &str, name: &str, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let values = self
            .numbers(source)
            .into_iter()
            .map(|v| Value::from(v.map(&f)))
            .collect();
        self.with_column(name, values)
    }

    /// Derive a numeric column from two others (e.g. a ratio)
    pub fn combine_columns<F>(self, left: &str, right: &str, name: &str, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64,
    {
        let values = self
            .numbers(left)
            .into_iter()
            .zip(self.numbers(right))
            .map(|(l, r)| match (l, r) {
                (Some(l), Some(r)) => Value::Float(f(l, r)),
                _ => Value::Missing,
            })
            .collect();
        self.with_column(name, values)
    }

    /// Stable sort on one column; missing cells always sort last
    pub fn sorted_by(mut self, column: &str, order: SortOrder) -> Self {
        if let Some(idx) = self.column_index(column) {
            self.rows.sort_by(|a, b| {
                let (a, b) = (&a[idx], &b[idx]);
                if a.is_missing() || b.is_missing() {
                    return a.compare(b);
                }
                match order {
                    SortOrder::Ascending => a.compare(b),
                    SortOrder::Descending => b.compare(a),
                }
            });
        }
        self
    }

    /// Remove exactly the rows whose cell in `column` is missing
    pub fn drop_missing(mut self, column: &str) -> Self {
        if let Some(idx) = self.column_index(column) {
            self.rows.retain(|r| !r[idx].is_missing());
        }
        self
    }

    pub fn round_column(mut self, column: &str, decimals: i32) -> Self {
        if let Some(idx) = self.column_index(column) {
            let factor = 10f64.powi(decimals);
            for row in self.rows.iter_mut() {
                if let Value::Float(v) = row[idx] {
                    row[idx] = Value::Float((v * factor).round() / factor);
                }
            }
        }
        self
    }

    pub fn select(&self, columns: &[&str]) -> Self {
        let indices: Vec<Option<usize>> = columns.iter().map(|c| self.column_index(c)).collect();
        let mut table = DataTable::new(columns);
        for row in &self.rows {
            table.push_row(
                indices
                    .iter()
                    .map(|idx| idx.map(|i| row[i].clone()).unwrap_or(Value::Missing))
                    .collect(),
            );
        }
        table
    }

    pub fn rename(mut self, pairs: &[(&str, &str)]) -> Self {
        for (from, to) in pairs {
            if let Some(idx) = self.column_index(from) {
                self.columns[idx] = to.to_string();
            }
        }
        self
    }

    /// Stack tables vertically.
    ///
    /// Columns are the union of all inputs in first-appearance order; a row
    /// gets a missing cell for every column its own table lacks.
    pub fn concat(tables: &[DataTable]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for table in tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(tables.iter().map(|t| t.len()).sum());
        for table in tables {
            let positions: Vec<Option<usize>> =
                columns.iter().map(|c| table.column_index(c)).collect();
            for row in &table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|p| p.map(|i| row[i].clone()).unwrap_or(Value::Missing))
                        .collect(),
                );
            }
        }

        DataTable { columns, rows }
    }
}

// Serialized as a list of records, the layout chart libraries consume
impl Serialize for DataTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Record<'a>(&'a [String], &'a [Value]);

        impl Serialize for Record<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (column, value) in self.0.iter().zip(self.1) {
                    map.serialize_entry(column, value)?;
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record(&self.columns, row))?;
        }
        seq.end()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn outlier_table() -> DataTable {
        let mut table = DataTable::new(&["State", "Outlier_Percentage"]);
        table.push_row(vec!["TX".into(), Value::Float(14.9)]);
        table.push_row(vec!["CA".into(), Value::Float(10.0)]);
        table.push_row(vec!["LA".into(), Value::Float(16.4)]);
        table.push_row(vec!["GA".into(), Value::Float(10.0)]);
        table
    }

    #[test]
    fn test_sort_descending_keeps_tie_order() {
        let sorted = outlier_table().sorted_by("Outlier_Percentage", SortOrder::Descending);
        assert_eq!(sorted.texts("State"), vec!["LA", "TX", "CA", "GA"]);
    }

    #[test]
    fn test_sort_ascending_missing_last() {
        let mut table = DataTable::new(&["Year", "Pct"]);
        table.push_row(vec![2021u16.into(), Value::Missing]);
        table.push_row(vec![2022u16.into(), Value::Float(3.0)]);
        table.push_row(vec![2023u16.into(), Value::Float(1.0)]);

        let asc = table.clone().sorted_by("Pct", SortOrder::Ascending);
        assert_eq!(asc.numbers("Year"), vec![Some(2023.0), Some(2022.0), Some(2021.0)]);

        let desc = table.sorted_by("Pct", SortOrder::Descending);
        assert_eq!(desc.numbers("Year"), vec![Some(2022.0), Some(2023.0), Some(2021.0)]);
    }

    #[test]
    fn test_drop_missing_removes_only_missing_rows() {
        let mut table = DataTable::new(&["Hospital", "Contract_Pct"]);
        table.push_row(vec!["A".into(), Value::Float(41.9)]);
        table.push_row(vec!["B".into(), Value::Missing]);
        table.push_row(vec!["C".into(), Value::Float(f64::NAN)]);
        table.push_row(vec!["D".into(), Value::Float(17.5)]);

        let before = table.len();
        let dropped = table.drop_missing("Contract_Pct");

        assert!(dropped.len() <= before);
        assert_eq!(dropped.texts("Hospital"), vec!["A", "D"]);
    }

    #[test]
    fn test_drop_missing_unknown_column_is_noop() {
        let table = outlier_table();
        assert_eq!(table.clone().drop_missing("Nope"), table);
    }

    #[test]
    fn test_map_and_combine_columns() {
        let mut table = DataTable::new(&["FTE", "Beds"]);
        table.push_row(vec![1000u32.into(), 500u32.into()]);
        table.push_row(vec![Value::Missing, 10u32.into()]);

        let table = table
            .map_column("FTE", "FTE_Thousands", |v| v / 1000.0)
            .combine_columns("FTE", "Beds", "FTE_per_Bed", |f, b| f / b);

        assert_eq!(table.numbers("FTE_Thousands"), vec![Some(1.0), None]);
        assert_eq!(table.numbers("FTE_per_Bed"), vec![Some(2.0), None]);
    }

    #[test]
    fn test_concat_unions_columns_in_first_appearance_order() {
        let mut a = DataTable::new(&["Year", "State"]);
        a.push_row(vec![2021u16.into(), "TX".into()]);
        let mut b = DataTable::new(&["State", "Hospital"]);
        b.push_row(vec!["CA".into(), "UCSF".into()]);

        let both = DataTable::concat(&[a, b]);

        assert_eq!(both.columns(), &["Year", "State", "Hospital"]);
        assert_eq!(both.len(), 2);
        assert_eq!(both.get(0, "Hospital"), Some(&Value::Missing));
        assert_eq!(both.get(1, "Year"), Some(&Value::Missing));
        assert_eq!(both.get(1, "State"), Some(&Value::Text("CA".to_string())));
    }

    #[test]
    fn test_select_rename_round() {
        let table = outlier_table()
            .map_column("Outlier_Percentage", "Scaled", |v| v / 3.0)
            .round_column("Scaled", 1)
            .select(&["State", "Scaled"])
            .rename(&[("Scaled", "Scaled %")]);

        assert_eq!(table.columns(), &["State", "Scaled %"]);
        assert_eq!(table.numbers("Scaled %")[0], Some(5.0));
    }

    #[test]
    fn test_csv_field_formatting() {
        assert_eq!(Value::Float(85.0).to_csv_field(), "85.0");
        assert_eq!(Value::Float(2.4).to_csv_field(), "2.4");
        assert_eq!(Value::Int(6056).to_csv_field(), "6056");
        assert_eq!(Value::Missing.to_csv_field(), "");
    }

    #[test]
    fn test_serialize_as_records() {
        let mut table = DataTable::new(&["State", "Outlier_Percentage"]);
        table.push_row(vec!["TX".into(), Value::Float(14.9)]);
        let json = serde_json::to_value(table).unwrap();
        assert_eq!(json, serde_json::json!([{"State": "TX", "Outlier_Percentage": 14.9}]));
    }
}
