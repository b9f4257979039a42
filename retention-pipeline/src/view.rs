//! Render-cycle view model.
//!
//! `render` is the whole interactive contract: one threshold in, one
//! fully recomputed view out. Derived views own no state of their own
//! and are rebuilt from the loaded table on every call.

use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::{self, ActionRollup, KpiSummary, SegmentExposure};
use crate::candidate_pipeline::CandidatePipeline;
use crate::pipelines::retention_digest::RetentionDigestPipeline;
use crate::prediction_loader::CustomerRecord;
use crate::types::DashboardQuery;

/// Rows the rendered action table displays. The underlying list, and
/// the export built from it, are unbounded.
pub const ACTION_TABLE_ROWS: usize = 25;

/// Everything one render cycle produces for the presentation layer.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardView {
    /// Threshold after control-domain normalization.
    pub threshold: f64,
    pub kpis: KpiSummary,
    /// Per-segment revenue exposure, largest first.
    pub segments: Vec<SegmentExposure>,
    /// Full retention list, best net savings first.
    pub actions: Vec<CustomerRecord>,
    pub action_summary: Vec<ActionRollup>,
}

impl DashboardView {
    /// The rows the action table displays.
    pub fn action_table(&self) -> &[CustomerRecord] {
        &self.actions[..self.actions.len().min(ACTION_TABLE_ROWS)]
    }
}

/// Run one full render cycle over the loaded table.
///
/// Callers reach this only in the Loaded state; an unavailable source
/// fails at the loader and halts the cycle before any view computes.
pub async fn render(records: Arc<Vec<CustomerRecord>>, query: DashboardQuery) -> DashboardView {
    let pipeline = RetentionDigestPipeline::with_predictions(records);
    let result = pipeline.execute(query).await;

    DashboardView {
        threshold: result.query.threshold,
        kpis: aggregate::summarize(&result.retrieved_candidates, &result.kept_candidates),
        segments: aggregate::exposure_by_segment(&result.kept_candidates),
        action_summary: aggregate::rollup_by_action(&result.selected_candidates),
        actions: result.selected_candidates,
    }
}
