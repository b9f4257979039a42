use async_trait::async_trait;

use crate::prediction_loader::CustomerRecord;
use crate::stage::{SideEffect, Stage};
use crate::types::DashboardQuery;

/// Logs one line per completed render cycle.
pub struct RenderLogSideEffect;

impl Stage<DashboardQuery> for RenderLogSideEffect {}

#[async_trait]
impl SideEffect<DashboardQuery, CustomerRecord> for RenderLogSideEffect {
    async fn run(
        &self,
        query: &DashboardQuery,
        selected: &[CustomerRecord],
    ) -> Result<(), String> {
        log::info!(
            "request_id={} threshold={:.2} selected {} retention targets",
            query.request_id,
            query.threshold,
            selected.len()
        );
        Ok(())
    }
}
