//! Stage contracts for the render-cycle pipeline.
//!
//! Every stage shares one small surface (`Stage`) for gating and log
//! naming; the per-phase traits add the single operation each phase
//! performs. Filters and selectors are pure and synchronous; sources,
//! hydrators, and side effects may await I/O.

use async_trait::async_trait;

/// Behavior common to every pipeline stage.
pub trait Stage<Q>: Send + Sync {
    /// Decide whether this stage participates in the given cycle.
    fn applies(&self, _query: &Q) -> bool {
        true
    }

    /// Stable name for log correlation.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit_once("::").map_or(full, |(_, tail)| tail)
    }
}

/// Query hydrators run first and normalize the query in place. They run
/// sequentially, each owning the fields it touches.
#[async_trait]
pub trait QueryHydrator<Q>: Stage<Q>
where
    Q: Send + Sync + 'static,
{
    /// Normalize or enrich the query before any candidates are fetched.
    async fn hydrate(&self, query: &mut Q) -> Result<(), String>;
}

/// A source produces the candidate rows a render cycle starts from.
#[async_trait]
pub trait Source<Q, C>: Stage<Q>
where
    Q: Send + Sync + 'static,
    C: Send + 'static,
{
    /// Fetch candidates for the given query.
    async fn fetch(&self, query: &Q) -> Result<Vec<C>, String>;
}

/// Filters are per-row predicates. The pipeline partitions the stream
/// with them and keeps the rows a stage rejects available for
/// reporting. Rejection is an ordinary outcome, never an error.
pub trait Filter<Q, C>: Stage<Q> {
    /// Decide whether a single candidate survives this filter.
    fn keep(&self, query: &Q, candidate: &C) -> bool;
}

/// Selectors order the surviving candidates and optionally cap the
/// list.
pub trait Selector<Q, C>: Stage<Q> {
    /// Ranking score for one candidate, higher first.
    fn score(&self, candidate: &C) -> f64;

    /// Maximum number of candidates to keep, if any.
    fn limit(&self) -> Option<usize> {
        None
    }

    /// Sort descending by score and apply the limit.
    ///
    /// The sort is stable, so equal scores keep their input order. NaN
    /// ranks below every real score: a malformed projection must never
    /// surface at the top of the action list.
    fn select(&self, _query: &Q, mut candidates: Vec<C>) -> Vec<C> {
        candidates.sort_by(|a, b| {
            let (sa, sb) = (self.score(a), self.score(b));
            sb.partial_cmp(&sa)
                .unwrap_or_else(|| sa.is_nan().cmp(&sb.is_nan()))
        });
        if let Some(limit) = self.limit() {
            candidates.truncate(limit);
        }
        candidates
    }
}

/// Side effects observe the completed selection; they cannot alter it.
#[async_trait]
pub trait SideEffect<Q, C>: Stage<Q>
where
    Q: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    /// Run after selection. Failures are logged by the pipeline and do
    /// not affect the render cycle's result.
    async fn run(&self, query: &Q, selected: &[C]) -> Result<(), String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ByValue;

    impl Stage<()> for ByValue {}

    impl Selector<(), f64> for ByValue {
        fn score(&self, candidate: &f64) -> f64 {
            *candidate
        }
    }

    #[test]
    fn stage_name_strips_the_module_path() {
        assert_eq!(Stage::<()>::name(&ByValue), "ByValue");
    }

    #[test]
    fn selector_sorts_descending_with_nan_last() {
        let sorted = ByValue.select(&(), vec![1.0, f64::NAN, 5.0, 3.0]);
        assert_eq!(&sorted[..3], &[5.0, 3.0, 1.0]);
        assert!(sorted[3].is_nan());
    }
}
