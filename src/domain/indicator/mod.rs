//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values

pub mod adx;
pub mod donchian;
pub mod ema;
pub mod rsi;
pub mod volume_sma;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    /// Placeholder for a bar still inside the warm-up window.
    pub fn warmup(date: NaiveDate) -> Self {
        IndicatorPoint {
            date,
            valid: false,
            value: IndicatorValue::Simple(0.0),
        }
    }

    pub fn simple(date: NaiveDate, value: f64) -> Self {
        IndicatorPoint {
            date,
            valid: true,
            value: IndicatorValue::Simple(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Directional {
        adx: f64,
        plus_di: f64,
        minus_di: f64,
    },
    Channel {
        upper: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Adx(usize),
    Donchian(usize),
    VolumeSma(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn empty(indicator_type: IndicatorType) -> Self {
        IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        }
    }

    /// Point `back` steps from the end (0 = latest), if it is past warm-up.
    pub fn valid_from_end(&self, back: usize) -> Option<&IndicatorValue> {
        let idx = self.values.len().checked_sub(back + 1)?;
        let point = &self.values[idx];
        point.valid.then_some(&point.value)
    }

    /// Simple value `back` steps from the end.
    pub fn simple_from_end(&self, back: usize) -> Option<f64> {
        match self.valid_from_end(back)? {
            IndicatorValue::Simple(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Donchian(period) => write!(f, "DONCHIAN({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
        }
    }
}
