use async_trait::async_trait;
use std::sync::Arc;

use crate::prediction_loader::CustomerRecord;
use crate::stage::{Source, Stage};
use crate::types::DashboardQuery;

/// Source backed by the loaded prediction table.
///
/// The table is shared, read-only, process-lifetime state; every render
/// cycle draws the same records and derives fresh views from them.
pub struct PredictionTableSource {
    records: Arc<Vec<CustomerRecord>>,
}

impl PredictionTableSource {
    pub fn new(records: Arc<Vec<CustomerRecord>>) -> Self {
        Self { records }
    }
}

impl Stage<DashboardQuery> for PredictionTableSource {
    fn applies(&self, _query: &DashboardQuery) -> bool {
        !self.records.is_empty()
    }
}

#[async_trait]
impl Source<DashboardQuery, CustomerRecord> for PredictionTableSource {
    async fn fetch(&self, _query: &DashboardQuery) -> Result<Vec<CustomerRecord>, String> {
        Ok(self.records.as_ref().clone())
    }
}
