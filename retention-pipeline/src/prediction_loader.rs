//! CSV churn prediction loader.
//!
//! Parses the table produced by the upstream model pipeline into
//! `CustomerRecord` structs. Expected CSV columns:
//!   customerID, churn_probability, value_segment, tenure,
//!   MonthlyCharges, expected_loss, retention_cost, net_savings, action

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// One row of the prediction table: a customer's modeled churn risk and
/// the financial projection attached to it.
///
/// Field names on the wire follow the upstream header, mixed casing
/// included. The financial fields arrive precomputed and are trusted as
/// supplied; in particular `net_savings` is not re-derived from
/// `expected_loss - retention_cost` here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    pub churn_probability: f64,
    pub value_segment: String,
    pub tenure: u32,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    pub expected_loss: f64,
    pub retention_cost: f64,
    pub net_savings: f64,
    pub action: String,
}

/// Process-lifetime table cache keyed by source path.
///
/// The prediction table is static per run; entries are never
/// invalidated. Failed loads are not cached.
static TABLE_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Vec<CustomerRecord>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Load prediction records from a CSV reader.
pub fn load_predictions<R: Read>(reader: R) -> DashboardResult<Vec<CustomerRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let record: CustomerRecord = result.map_err(|e| DashboardError::MalformedRow {
            line: line_num + 2,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Load prediction records from a CSV file path.
pub fn load_predictions_file(path: impl AsRef<Path>) -> DashboardResult<Vec<CustomerRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| DashboardError::SourceUnavailable {
        path: path.display().to_string(),
        source: e,
    })?;
    load_predictions(file)
}

/// Memoized load: the first call per path reads the file, subsequent
/// calls return the cached table for the rest of the process lifetime.
pub fn load_predictions_cached(
    path: impl AsRef<Path>,
) -> DashboardResult<Arc<Vec<CustomerRecord>>> {
    let path = path.as_ref();

    let mut cache = match TABLE_CACHE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("prediction table cache lock was poisoned, recovering");
            poisoned.into_inner()
        }
    };

    if let Some(table) = cache.get(path) {
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(load_predictions_file(path)?);
    cache.insert(path.to_path_buf(), Arc::clone(&table));
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
customerID,churn_probability,value_segment,tenure,MonthlyCharges,expected_loss,retention_cost,net_savings,action
7590-VHVEG,0.92,High,2,89.10,1069.20,150.00,919.20,Priority call + 20% discount
3668-QPYBK,0.71,Medium,8,53.85,646.20,80.00,566.20,Loyalty coupon
9237-HQITU,0.55,Low,2,70.70,212.10,25.00,187.10,Email nudge
";

    #[test]
    fn load_sample_csv() {
        let records = load_predictions(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].customer_id, "7590-VHVEG");
        assert!((records[0].churn_probability - 0.92).abs() < 1e-9);
        assert_eq!(records[0].value_segment, "High");
        assert_eq!(records[0].tenure, 2);
        assert!((records[0].net_savings - 919.20).abs() < 0.01);
        assert_eq!(records[2].action, "Email nudge");
    }

    #[test]
    fn malformed_row_reports_line_number() {
        let csv_data = "\
customerID,churn_probability,value_segment,tenure,MonthlyCharges,expected_loss,retention_cost,net_savings,action
7590-VHVEG,0.92,High,2,89.10,1069.20,150.00,919.20,Priority call + 20% discount
3668-QPYBK,not-a-number,Medium,8,53.85,646.20,80.00,566.20,Loyalty coupon
";
        let err = load_predictions(csv_data.as_bytes()).unwrap_err();
        match err {
            DashboardError::MalformedRow { line, .. } => assert_eq!(line, 3),
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let err = load_predictions_file("no/such/predictions.csv").unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable { .. }));
    }

    #[test]
    fn cached_load_returns_the_same_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        let first = load_predictions_cached(&path).unwrap();
        let second = load_predictions_cached(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late_predictions.csv");

        assert!(load_predictions_cached(&path).is_err());

        // The source appearing after a failed attempt must be picked up.
        std::fs::write(&path, SAMPLE_CSV).unwrap();
        let table = load_predictions_cached(&path).unwrap();
        assert_eq!(table.len(), 3);
    }
}
