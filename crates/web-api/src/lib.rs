//! REST surface over the pairs analytics pipeline.
//!
//! Thin axum layer: handlers translate HTTP parameters into
//! `AnalysisRequest`s and shape the analyst's output into the JSON the
//! dashboard consumes. No statistics live here.

pub mod handlers;
pub mod server;

pub use server::{ApiServer, ApiState};
