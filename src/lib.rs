//! Column-driven filter and aggregate engine for flat sales datasets.
//!
//! The [`data`] module holds the whole pipeline; the dashboard binary is a
//! thin caller that re-runs it on every selection change.

pub mod config;
pub mod data;
pub mod error;

pub use error::EngineError;
