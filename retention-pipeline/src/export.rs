//! Retention list export.
//!
//! Writes the full action subset as delimited text with a header row
//! matching the prediction table schema. Callers offer the export only
//! when the subset is non-empty.

use std::io::Write;
use std::path::Path;

use crate::error::DashboardResult;
use crate::prediction_loader::CustomerRecord;

/// Default artifact name offered to the operator.
pub const EXPORT_FILE_NAME: &str = "retention_targets.csv";

/// Write the retention list to any writer.
pub fn write_retention_list<W: Write>(
    writer: W,
    actions: &[CustomerRecord],
) -> DashboardResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in actions {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the retention list to a file path.
pub fn write_retention_list_file(
    path: impl AsRef<Path>,
    actions: &[CustomerRecord],
) -> DashboardResult<()> {
    let file = std::fs::File::create(path).map_err(csv::Error::from)?;
    write_retention_list(file, actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(id: &str, net_savings: f64) -> CustomerRecord {
        CustomerRecord {
            customer_id: id.to_string(),
            churn_probability: 0.8,
            value_segment: "High".to_string(),
            tenure: 12,
            monthly_charges: 70.0,
            expected_loss: net_savings + 50.0,
            retention_cost: 50.0,
            net_savings,
            action: "Priority call".to_string(),
        }
    }

    #[test]
    fn export_writes_schema_header_and_all_rows() {
        let actions = vec![make_record("A", 100.0), make_record("B", 50.0)];
        let mut buffer = Vec::new();
        write_retention_list(&mut buffer, &actions).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "customerID,churn_probability,value_segment,tenure,MonthlyCharges,\
             expected_loss,retention_cost,net_savings,action"
        );
        assert_eq!(lines.count(), 2);
    }
}
