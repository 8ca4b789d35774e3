//! ADX (Average Directional Index) with +DI / -DI, Wilder smoothing.
//!
//! 1. +DM / -DM and true range from consecutive bars (first bar has none)
//! 2. Wilder-smooth +DM, -DM and TR over n changes
//! 3. +DI = 100 * sDM+ / sTR, -DI = 100 * sDM- / sTR (both 0 when sTR == 0)
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI) (0 when the sum is 0)
//! 5. ADX = Wilder-smoothed DX
//!
//! Warmup: ADX is valid from bar 2n - 1; earlier points are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{true_ranges, wilder_smooth};
use crate::domain::price::PriceBar;

pub fn calculate_adx(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Adx(period));
    }

    let n = bars.len();
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;

        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }

    let tr = true_ranges(bars);
    let smooth_tr = wilder_smooth(&tr, 1, period);
    let smooth_plus = wilder_smooth(&plus_dm, 1, period);
    let smooth_minus = wilder_smooth(&minus_dm, 1, period);

    let mut plus_di = vec![0.0; n];
    let mut minus_di = vec![0.0; n];
    let mut dx = vec![0.0; n];

    for i in period..n {
        let (Some(s_tr), Some(s_plus), Some(s_minus)) = (smooth_tr[i], smooth_plus[i], smooth_minus[i])
        else {
            continue;
        };
        if s_tr > 0.0 {
            plus_di[i] = 100.0 * s_plus / s_tr;
            minus_di[i] = 100.0 * s_minus / s_tr;
        }
        let di_sum = plus_di[i] + minus_di[i];
        if di_sum > 0.0 {
            dx[i] = 100.0 * (plus_di[i] - minus_di[i]).abs() / di_sum;
        }
    }

    let adx = wilder_smooth(&dx, period, period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match adx[i] {
            Some(value) => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Directional {
                    adx: value,
                    plus_di: plus_di[i],
                    minus_di: minus_di[i],
                },
            },
            None => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Directional {
                    adx: 0.0,
                    plus_di: 0.0,
                    minus_di: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Adx(period),
        values,
    }
}
