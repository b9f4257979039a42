use crate::prediction_loader::CustomerRecord;
use crate::stage::{Selector, Stage};
use crate::types::DashboardQuery;

/// Orders the retention list by net savings, highest first.
///
/// No cap: the exported list is unbounded. The rendered table caps
/// itself at `view::ACTION_TABLE_ROWS`.
pub struct NetSavingsSelector;

impl Stage<DashboardQuery> for NetSavingsSelector {}

impl Selector<DashboardQuery, CustomerRecord> for NetSavingsSelector {
    fn score(&self, candidate: &CustomerRecord) -> f64 {
        candidate.net_savings
    }
}
