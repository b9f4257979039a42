use crate::prediction_loader::CustomerRecord;
use crate::stage::{Filter, Stage};
use crate::types::DashboardQuery;

/// Keeps customers whose churn probability meets the operator's
/// threshold.
///
/// The threshold rides on the query because it is the interactive input,
/// not wiring-time configuration. Its domain is enforced upstream by
/// `ThresholdQueryHydrator` and not re-validated here.
pub struct RiskThresholdFilter;

impl Stage<DashboardQuery> for RiskThresholdFilter {}

impl Filter<DashboardQuery, CustomerRecord> for RiskThresholdFilter {
    fn keep(&self, query: &DashboardQuery, candidate: &CustomerRecord) -> bool {
        candidate.churn_probability >= query.threshold
    }
}
