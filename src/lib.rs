//! scoretrader: technical-signal scoring and a walk-forward single-position
//! backtest.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command wiring in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
