//! Derived-view aggregation over filtered prediction rows.
//!
//! Grouping is explicit: accumulate into a map keyed in first-seen
//! order, then materialize an ordered sequence with a stable descending
//! sort. Equal sums therefore keep their input order.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::prediction_loader::CustomerRecord;

/// The four headline metrics of a render cycle. All fields are always
/// defined; sums over an empty subset are 0.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_customers: usize,
    pub at_risk_customers: usize,
    pub revenue_at_risk: f64,
    pub net_savings_total: f64,
}

/// Summed expected loss for one value segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentExposure {
    pub value_segment: String,
    pub expected_loss: f64,
}

/// Per-action rollup over the retention list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionRollup {
    pub action: String,
    pub customers: usize,
    pub total_net_savings: f64,
}

/// Headline metrics over the full table and the current risk subset.
pub fn summarize(full: &[CustomerRecord], risk: &[CustomerRecord]) -> KpiSummary {
    KpiSummary {
        total_customers: full.len(),
        at_risk_customers: risk.len(),
        revenue_at_risk: risk.iter().map(|c| c.expected_loss).sum(),
        net_savings_total: risk.iter().map(|c| c.net_savings).sum(),
    }
}

/// Revenue exposure per value segment over the risk subset, largest
/// exposure first. Empty input yields an empty sequence; the caller
/// renders an informational message, not a blank chart.
pub fn exposure_by_segment(risk: &[CustomerRecord]) -> Vec<SegmentExposure> {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for record in risk {
        let entry = sums.entry(record.value_segment.as_str()).or_insert_with(|| {
            order.push(record.value_segment.as_str());
            0.0
        });
        *entry += record.expected_loss;
    }

    let mut exposures: Vec<SegmentExposure> = order
        .into_iter()
        .map(|segment| SegmentExposure {
            value_segment: segment.to_string(),
            expected_loss: sums[segment],
        })
        .collect();

    exposures.sort_by(|a, b| {
        b.expected_loss
            .partial_cmp(&a.expected_loss)
            .unwrap_or(Ordering::Equal)
    });
    exposures
}

/// Per-action counts and summed net savings over the retention list,
/// highest total first. Empty input yields an empty sequence.
pub fn rollup_by_action(actions: &[CustomerRecord]) -> Vec<ActionRollup> {
    let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for record in actions {
        let entry = totals.entry(record.action.as_str()).or_insert_with(|| {
            order.push(record.action.as_str());
            (0, 0.0)
        });
        entry.0 += 1;
        entry.1 += record.net_savings;
    }

    let mut rollups: Vec<ActionRollup> = order
        .into_iter()
        .map(|action| {
            let (customers, total_net_savings) = totals[action];
            ActionRollup {
                action: action.to_string(),
                customers,
                total_net_savings,
            }
        })
        .collect();

    rollups.sort_by(|a, b| {
        b.total_net_savings
            .partial_cmp(&a.total_net_savings)
            .unwrap_or(Ordering::Equal)
    });
    rollups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(
        id: &str,
        segment: &str,
        expected_loss: f64,
        net_savings: f64,
        action: &str,
    ) -> CustomerRecord {
        CustomerRecord {
            customer_id: id.to_string(),
            churn_probability: 0.8,
            value_segment: segment.to_string(),
            tenure: 12,
            monthly_charges: 70.0,
            expected_loss,
            retention_cost: expected_loss - net_savings,
            net_savings,
            action: action.to_string(),
        }
    }

    #[test]
    fn summarize_empty_subset_yields_zeros() {
        let full = vec![make_record("A", "High", 100.0, 50.0, "Call")];
        let kpis = summarize(&full, &[]);
        assert_eq!(kpis.total_customers, 1);
        assert_eq!(kpis.at_risk_customers, 0);
        assert_eq!(kpis.revenue_at_risk, 0.0);
        assert_eq!(kpis.net_savings_total, 0.0);
    }

    #[test]
    fn summarize_sums_over_the_risk_subset() {
        let full = vec![
            make_record("A", "High", 100.0, 50.0, "Call"),
            make_record("B", "Low", 40.0, -10.0, "Email"),
            make_record("C", "High", 60.0, 20.0, "Call"),
        ];
        let kpis = summarize(&full, &full[1..]);
        assert_eq!(kpis.total_customers, 3);
        assert_eq!(kpis.at_risk_customers, 2);
        assert!((kpis.revenue_at_risk - 100.0).abs() < 0.01);
        assert!((kpis.net_savings_total - 10.0).abs() < 0.01);
    }

    #[test]
    fn segment_exposure_orders_descending() {
        let risk = vec![
            make_record("A", "Low", 40.0, 10.0, "Email"),
            make_record("B", "High", 100.0, 50.0, "Call"),
            make_record("C", "High", 60.0, 20.0, "Call"),
            make_record("D", "Medium", 90.0, 30.0, "Coupon"),
        ];
        let exposures = exposure_by_segment(&risk);
        assert_eq!(exposures.len(), 3);
        assert_eq!(exposures[0].value_segment, "High");
        assert!((exposures[0].expected_loss - 160.0).abs() < 0.01);
        assert_eq!(exposures[1].value_segment, "Medium");
        assert_eq!(exposures[2].value_segment, "Low");
    }

    #[test]
    fn segment_exposure_total_matches_revenue_at_risk() {
        let risk = vec![
            make_record("A", "Low", 40.0, 10.0, "Email"),
            make_record("B", "High", 100.0, 50.0, "Call"),
            make_record("C", "Medium", 90.0, 30.0, "Coupon"),
        ];
        let kpis = summarize(&risk, &risk);
        let segment_total: f64 = exposure_by_segment(&risk)
            .iter()
            .map(|s| s.expected_loss)
            .sum();
        assert!((segment_total - kpis.revenue_at_risk).abs() < 0.01);
    }

    #[test]
    fn action_rollup_counts_and_sums() {
        let actions = vec![
            make_record("A", "High", 200.0, 100.0, "Call"),
            make_record("B", "Medium", 120.0, 50.0, "Coupon"),
            make_record("C", "High", 150.0, 80.0, "Call"),
        ];
        let rollups = rollup_by_action(&actions);
        assert_eq!(rollups.len(), 2);
        assert_eq!(rollups[0].action, "Call");
        assert_eq!(rollups[0].customers, 2);
        assert!((rollups[0].total_net_savings - 180.0).abs() < 0.01);
        assert_eq!(rollups[1].action, "Coupon");
        assert_eq!(rollups[1].customers, 1);
    }

    #[test]
    fn empty_inputs_yield_empty_sequences() {
        assert!(exposure_by_segment(&[]).is_empty());
        assert!(rollup_by_action(&[]).is_empty());
    }
}
