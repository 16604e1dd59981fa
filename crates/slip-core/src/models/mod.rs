//! Data models: product catalog, parse results and configuration.

pub mod catalog;
pub mod config;
pub mod slip;
