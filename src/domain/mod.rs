//! Core domain types and analytics.

pub mod analysis;
pub mod config;
pub mod config_validation;
pub mod correlation;
pub mod error;
pub mod forecast;
pub mod indicator;
pub mod metrics;
pub mod ohlcv;
pub mod returns;
pub mod stats;
pub mod trend;
