//! Leadscore: Lead Intent Scoring Library
//!
//! A library for scoring marketing leads for purchase intent using
//! a preprocessing transformer, a class-weighted logistic classifier,
//! and per-lead factor attribution.

pub mod cli;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod store;
pub mod utils;

pub use error::{Result, ScoreError};
