//! Client-side pipeline for the feedback sentiment dashboard: submitting
//! comments to the analysis service, holding the session's records,
//! aggregating them and rendering tables, charts and reports.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod session;
pub mod submit;
pub mod view;
