//! Elapsed-time measurement returned as plain values.

use std::time::{Duration, Instant};

/// Result of a timed call.
#[derive(Clone, Debug, PartialEq)]
pub struct Timed<T> {
    /// Value returned by the call.
    pub value: T,
    /// Wall-clock time spent in the call.
    pub elapsed: Duration,
    /// Number of calls measured (always 1 for [`timed`]).
    pub calls: u64,
}

/// Runs `f` and returns its value together with the elapsed time.
pub fn timed<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    Timed {
        value,
        elapsed: start.elapsed(),
        calls: 1,
    }
}

/// Formats a duration like `%.4g` with a unit: milliseconds below one
/// second, seconds otherwise, e.g. `"12.35ms elapsed"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let mut value = elapsed.as_secs_f64();
    let mut unit = "s";
    if value < 1.0 {
        value *= 1000.0;
        unit = "ms";
    }
    format!("{}{unit} elapsed", four_significant(value))
}

/// Four significant digits; scientific notation when the rounded exponent is
/// below -4 or at least 4.
fn four_significant(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value:.3}");
    }
    // `{:.3e}` rounds first, so the exponent already accounts for carries.
    let rounded = format!("{value:.3e}");
    let Some((mantissa, exponent)) = rounded.split_once('e') else {
        return rounded;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return rounded;
    };
    if !(-4..4).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }
    let decimals = (3 - exponent) as usize;
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_returns_value() {
        let t = timed(|| 6 * 7);
        assert_eq!(t.value, 42);
        assert_eq!(t.calls, 1);
    }

    #[test]
    fn formats_four_significant_digits() {
        assert_eq!(format_elapsed(Duration::from_micros(12_346)), "12.35ms elapsed");
        assert_eq!(format_elapsed(Duration::from_micros(500)), "0.5000ms elapsed");
        assert_eq!(format_elapsed(Duration::from_millis(2_500)), "2.500s elapsed");
        assert_eq!(format_elapsed(Duration::ZERO), "0.000ms elapsed");
    }

    #[test]
    fn rounding_carry_keeps_four_significant_digits() {
        assert_eq!(format_elapsed(Duration::from_nanos(9_999_960)), "10.00ms elapsed");
        assert_eq!(format_elapsed(Duration::from_nanos(999_999_000)), "1000ms elapsed");
        assert_eq!(format_elapsed(Duration::from_nanos(99_999_600)), "100.0ms elapsed");
    }

    #[test]
    fn large_and_tiny_values_use_exponents() {
        assert_eq!(format_elapsed(Duration::from_secs(12_346)), "1.235e+04s elapsed");
        assert_eq!(format_elapsed(Duration::from_secs(9_999)), "9999s elapsed");
        assert_eq!(format_elapsed(Duration::from_nanos(1)), "1.000e-06ms elapsed");
    }
}
