use crate::prediction_loader::CustomerRecord;
use crate::stage::{Filter, Stage};
use crate::types::DashboardQuery;

/// Keeps customers whose intervention is worth more than it costs:
/// `net_savings > 0`, strictly. Break-even customers are excluded; the
/// dashboard never recommends spending more on retention than the loss
/// it avoids.
pub struct PositiveRoiFilter;

impl Stage<DashboardQuery> for PositiveRoiFilter {}

impl Filter<DashboardQuery, CustomerRecord> for PositiveRoiFilter {
    fn keep(&self, _query: &DashboardQuery, candidate: &CustomerRecord) -> bool {
        candidate.net_savings > 0.0
    }
}
