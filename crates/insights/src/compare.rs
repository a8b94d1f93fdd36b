use serde::Serialize;

/// Percentage change from `previous` to `current`.
///
/// Returns 0 when the baseline is not positive, so a first month with
/// revenue reads as "no change" instead of `inf`.
pub fn change_percent(current: f64, previous: f64) -> f64 {
    if previous.is_nan() || previous <= 0.0 {
        return 0.0;
    }
    let change = (current - previous) / previous * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// A current/previous pair with its change percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub current: i64,
    pub previous: i64,
    pub change_percent: f64,
}

impl Comparison {
    pub fn new(current: i64, previous: i64) -> Self {
        Self {
            current,
            previous,
            change_percent: change_percent(current as f64, previous as f64),
        }
    }
}
