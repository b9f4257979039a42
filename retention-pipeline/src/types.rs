use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Threshold control domain
// ---------------------------------------------------------------------------

/// Lowest selectable churn-probability threshold.
pub const THRESHOLD_MIN: f64 = 0.1;
/// Highest selectable churn-probability threshold.
pub const THRESHOLD_MAX: f64 = 0.9;
/// Step granularity of the threshold control.
pub const THRESHOLD_STEP: f64 = 0.05;
/// Threshold the dashboard starts with.
pub const THRESHOLD_DEFAULT: f64 = 0.6;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// One operator interaction: the sole external input to a render cycle.
///
/// The threshold is the only mutable interactive state the dashboard has.
/// It is normalized to the control domain by `ThresholdQueryHydrator`
/// before any downstream stage reads it.
#[derive(Clone, Debug)]
pub struct DashboardQuery {
    pub request_id: String,
    pub threshold: f64,
}

impl DashboardQuery {
    pub fn new(request_id: impl Into<String>, threshold: f64) -> Self {
        Self {
            request_id: request_id.into(),
            threshold,
        }
    }
}

impl HasRequestId for DashboardQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}
