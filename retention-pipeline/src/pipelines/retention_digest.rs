use async_trait::async_trait;
use std::sync::Arc;

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::net_savings_selector::NetSavingsSelector;
use crate::components::positive_roi_filter::PositiveRoiFilter;
use crate::components::prediction_table_source::PredictionTableSource;
use crate::components::render_log_side_effect::RenderLogSideEffect;
use crate::components::risk_threshold_filter::RiskThresholdFilter;
use crate::components::threshold_query_hydrator::ThresholdQueryHydrator;
use crate::prediction_loader::CustomerRecord;
use crate::stage::{Filter, QueryHydrator, Selector, SideEffect, Source};
use crate::types::DashboardQuery;

/// The retention dashboard's render-cycle pipeline.
///
/// Pipeline flow:
/// 1. ThresholdQueryHydrator normalizes the threshold to the control grid
/// 2. PredictionTableSource emits the loaded prediction rows
/// 3. RiskThresholdFilter keeps rows at or above the threshold
/// 4. NetSavingsSelector orders the survivors by net savings
/// 5. PositiveRoiFilter (post-selection) drops retention-negative rows
/// 6. RenderLogSideEffect logs the completed cycle
///
/// The filter-phase survivors are the risk subset the KPI and segment
/// aggregations consume; the post-selection output is the action list.
pub struct RetentionDigestPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<DashboardQuery>>>,
    sources: Vec<Box<dyn Source<DashboardQuery, CustomerRecord>>>,
    filters: Vec<Box<dyn Filter<DashboardQuery, CustomerRecord>>>,
    selector: NetSavingsSelector,
    post_selection_filters: Vec<Box<dyn Filter<DashboardQuery, CustomerRecord>>>,
    side_effects: Vec<Box<dyn SideEffect<DashboardQuery, CustomerRecord>>>,
}

impl RetentionDigestPipeline {
    /// Create a pipeline over the loaded prediction table.
    pub fn with_predictions(records: Arc<Vec<CustomerRecord>>) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<DashboardQuery>>> =
            vec![Box::new(ThresholdQueryHydrator)];

        let sources: Vec<Box<dyn Source<DashboardQuery, CustomerRecord>>> =
            vec![Box::new(PredictionTableSource::new(records))];

        let filters: Vec<Box<dyn Filter<DashboardQuery, CustomerRecord>>> =
            vec![Box::new(RiskThresholdFilter)];

        let post_selection_filters: Vec<Box<dyn Filter<DashboardQuery, CustomerRecord>>> =
            vec![Box::new(PositiveRoiFilter)];

        let side_effects: Vec<Box<dyn SideEffect<DashboardQuery, CustomerRecord>>> =
            vec![Box::new(RenderLogSideEffect)];

        Self {
            query_hydrators,
            sources,
            filters,
            selector: NetSavingsSelector,
            post_selection_filters,
            side_effects,
        }
    }
}

#[async_trait]
impl CandidatePipeline<DashboardQuery, CustomerRecord> for RetentionDigestPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<DashboardQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<DashboardQuery, CustomerRecord>>] {
        &self.sources
    }

    fn filters(&self) -> &[Box<dyn Filter<DashboardQuery, CustomerRecord>>] {
        &self.filters
    }

    fn selector(&self) -> &dyn Selector<DashboardQuery, CustomerRecord> {
        &self.selector
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<DashboardQuery, CustomerRecord>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> &[Box<dyn SideEffect<DashboardQuery, CustomerRecord>>] {
        &self.side_effects
    }
}
