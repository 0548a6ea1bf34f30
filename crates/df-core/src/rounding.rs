//! Decimal rounding for wire payloads.
//!
//! Elapsed milliseconds are reported at two decimal places, budget figures
//! at four.

/// Round to `places` decimal places, half away from zero.
#[must_use]
pub fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
