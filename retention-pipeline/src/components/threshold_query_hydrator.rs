use async_trait::async_trait;

use crate::stage::{QueryHydrator, Stage};
use crate::types::{
    DashboardQuery, THRESHOLD_DEFAULT, THRESHOLD_MAX, THRESHOLD_MIN, THRESHOLD_STEP,
};

/// Normalizes the operator's threshold to the control domain:
/// [0.1, 0.9] in steps of 0.05, default 0.6.
///
/// The slider in front of the dashboard enforces the same domain; this
/// hydrator makes programmatic queries behave like the control, so no
/// downstream stage re-validates the threshold.
pub struct ThresholdQueryHydrator;

impl ThresholdQueryHydrator {
    fn snap(threshold: f64) -> f64 {
        if threshold.is_nan() {
            return THRESHOLD_DEFAULT;
        }
        let clamped = threshold.clamp(THRESHOLD_MIN, THRESHOLD_MAX);
        // Snap in integer hundredths so the result compares equal to the
        // same decimal parsed out of the prediction CSV.
        let centi = (clamped * 100.0).round();
        let step_centi = (THRESHOLD_STEP * 100.0).round();
        let snapped_centi = (centi / step_centi).round() * step_centi;
        snapped_centi / 100.0
    }
}

impl Stage<DashboardQuery> for ThresholdQueryHydrator {}

#[async_trait]
impl QueryHydrator<DashboardQuery> for ThresholdQueryHydrator {
    async fn hydrate(&self, query: &mut DashboardQuery) -> Result<(), String> {
        query.threshold = Self::snap(query.threshold);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_values_snap_to_the_grid() {
        assert!((ThresholdQueryHydrator::snap(0.6) - 0.6).abs() < 1e-12);
        assert!((ThresholdQueryHydrator::snap(0.62) - 0.6).abs() < 1e-12);
        assert!((ThresholdQueryHydrator::snap(0.63) - 0.65).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert!((ThresholdQueryHydrator::snap(0.0) - 0.1).abs() < 1e-12);
        assert!((ThresholdQueryHydrator::snap(1.5) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn nan_falls_back_to_the_default() {
        assert!((ThresholdQueryHydrator::snap(f64::NAN) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn snapped_value_compares_equal_to_parsed_decimal() {
        let parsed: f64 = "0.6".parse().unwrap();
        assert_eq!(ThresholdQueryHydrator::snap(0.6), parsed);
    }

    #[tokio::test]
    async fn hydrate_rewrites_the_query_in_place() {
        let mut query = DashboardQuery::new("test-001", 1.5);
        ThresholdQueryHydrator.hydrate(&mut query).await.unwrap();
        assert!((query.threshold - 0.9).abs() < 1e-12);
        assert_eq!(query.request_id, "test-001");
    }
}
