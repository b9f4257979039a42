//! Core pipeline for the churn retention dashboard.
//!
//! Loads a precomputed churn prediction table, filters it by an
//! operator-controlled probability threshold, and derives the summary
//! metrics, the per-segment exposure series, and the ranked retention
//! action lists the presentation layer renders. The presentation layer
//! itself (terminal, JSON, export) lives in the server binary.

pub mod aggregate;
pub mod candidate_pipeline;
pub mod components;
pub mod error;
pub mod export;
pub mod pipelines;
pub mod prediction_loader;
pub mod stage;
pub mod types;
pub mod view;
