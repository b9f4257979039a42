pub mod net_savings_selector;
pub mod positive_roi_filter;
pub mod prediction_table_source;
pub mod render_log_side_effect;
pub mod risk_threshold_filter;
pub mod threshold_query_hydrator;
