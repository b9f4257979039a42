//! Render-cycle orchestration.
//!
//! A `CandidatePipeline` wires stage components into one deterministic
//! pass: hydrate the query, source candidates, partition with the
//! filters, select, re-filter the selection, then run side effects. A
//! failing hydrator, source, or side effect is logged and skipped; the
//! pass always completes with whatever survived.

use async_trait::async_trait;

use crate::stage::{Filter, QueryHydrator, Selector, SideEffect, Source};

/// Queries carry a request id so every log line of a render cycle can be
/// correlated.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything one pipeline pass produces. Each field is a distinct
/// derived view; no stage mutates another's output in place.
#[derive(Clone, Debug)]
pub struct PipelineResult<Q, C> {
    /// The query after hydration. Downstream readers see the normalized
    /// form, not the raw operator input.
    pub query: Q,
    /// Every candidate the sources produced.
    pub retrieved_candidates: Vec<C>,
    /// Candidates the filter phase removed.
    pub filtered_candidates: Vec<C>,
    /// Filter-phase survivors, before selection. For the retention
    /// pipeline this is the risk subset the KPI and segment views
    /// aggregate over.
    pub kept_candidates: Vec<C>,
    /// The ordered output after selection and post-selection filtering.
    pub selected_candidates: Vec<C>,
}

#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];

    fn sources(&self) -> &[Box<dyn Source<Q, C>>];

    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];

    fn selector(&self) -> &dyn Selector<Q, C>;

    fn post_selection_filters(&self) -> &[Box<dyn Filter<Q, C>>];

    fn side_effects(&self) -> &[Box<dyn SideEffect<Q, C>>];

    /// Run one full pass over the configured stages.
    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let mut query = query;

        for hydrator in self.query_hydrators() {
            if !hydrator.applies(&query) {
                continue;
            }
            if let Err(e) = hydrator.hydrate(&mut query).await {
                log::warn!(
                    "request_id={} query hydrator {} failed: {}",
                    query.request_id(),
                    hydrator.name(),
                    e
                );
            }
        }

        let mut retrieved: Vec<C> = Vec::new();
        for source in self.sources() {
            if !source.applies(&query) {
                continue;
            }
            match source.fetch(&query).await {
                Ok(mut candidates) => retrieved.append(&mut candidates),
                Err(e) => log::warn!(
                    "request_id={} source {} failed: {}",
                    query.request_id(),
                    source.name(),
                    e
                ),
            }
        }

        let mut kept = retrieved.clone();
        let mut removed: Vec<C> = Vec::new();
        for filter in self.filters() {
            if !filter.applies(&query) {
                continue;
            }
            let (survivors, dropped): (Vec<C>, Vec<C>) = kept
                .into_iter()
                .partition(|candidate| filter.keep(&query, candidate));
            kept = survivors;
            removed.extend(dropped);
        }

        let selector = self.selector();
        let mut selected = if selector.applies(&query) {
            selector.select(&query, kept.clone())
        } else {
            kept.clone()
        };

        for filter in self.post_selection_filters() {
            if !filter.applies(&query) {
                continue;
            }
            selected.retain(|candidate| filter.keep(&query, candidate));
        }

        for effect in self.side_effects() {
            if !effect.applies(&query) {
                continue;
            }
            if let Err(e) = effect.run(&query, &selected).await {
                log::warn!(
                    "request_id={} side effect {} failed: {}",
                    query.request_id(),
                    effect.name(),
                    e
                );
            }
        }

        PipelineResult {
            query,
            retrieved_candidates: retrieved,
            filtered_candidates: removed,
            kept_candidates: kept,
            selected_candidates: selected,
        }
    }
}
