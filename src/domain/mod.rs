//! Core domain types and logic: indicators, analyzers, scoring and the
//! backtest simulator.

pub mod analysis;
pub mod backtest;
pub mod composite;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod ledger;
pub mod metrics;
pub mod opportunity;
pub mod position;
pub mod price;
pub mod score_table;
pub mod selector;
pub mod signal;
pub mod universe;
