//! Property tests for the indicator engine.

use coinlens_core::indicators::{
    self, mayer_multiple, relative_strength_index, simple_moving_average, IndicatorWindows,
};
use coinlens_tests::{arithmetic_series, assert_close, daily_series, positive_closes};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn moving_average_is_defined_at_exactly_the_last_positions(raw: Vec<u16>, window: u8) -> TestResult {
    let closes = positive_closes(&raw);
    if closes.is_empty() {
        return TestResult::discard();
    }
    let window = 1 + usize::from(window) % closes.len();

    let averages = simple_moving_average(&closes, window);
    let undefined_prefix = averages.iter().take(window - 1).all(Option::is_none);
    let defined_suffix = averages.iter().skip(window - 1).all(Option::is_some);
    TestResult::from_bool(undefined_prefix && defined_suffix)
}

#[quickcheck]
fn moving_average_scales_linearly(raw: Vec<u16>, window: u8, k: u8) -> TestResult {
    let closes = positive_closes(&raw);
    if closes.is_empty() || k == 0 {
        return TestResult::discard();
    }
    let window = 1 + usize::from(window) % closes.len();

    let k = f64::from(k) / 8.0;
    let scaled: Vec<f64> = closes.iter().map(|close| close * k).collect();
    let base = simple_moving_average(&closes, window);
    let multiplied = simple_moving_average(&scaled, window);

    let linear = base.iter().zip(&multiplied).all(|pair| match pair {
        (Some(a), Some(b)) => (a * k - b).abs() <= 1e-9 * b.abs().max(1.0),
        (None, None) => true,
        _ => false,
    });
    TestResult::from_bool(linear)
}

#[quickcheck]
fn rsi_stays_within_bounds(raw: Vec<u16>, window: u8) -> TestResult {
    let window = usize::from(window);
    if window == 0 {
        return TestResult::discard();
    }

    let rsi = relative_strength_index(&positive_closes(&raw), window);
    TestResult::from_bool(rsi.iter().flatten().all(|value| (0.0..=100.0).contains(value)))
}

#[quickcheck]
fn mayer_multiple_is_never_non_finite(raw: Vec<u16>, window: u8) -> TestResult {
    let window = usize::from(window);
    if window == 0 {
        return TestResult::discard();
    }

    let closes = positive_closes(&raw);
    let long = simple_moving_average(&closes, window);
    TestResult::from_bool(
        mayer_multiple(&closes, &long)
            .iter()
            .flatten()
            .all(|value| value.is_finite() && *value > 0.0),
    )
}

#[test]
fn strictly_rising_prices_saturate_rsi_after_warm_up() {
    // Given: 40 strictly increasing closes and a 14-day window
    let closes: Vec<f64> = (0..40).map(|i| 10.0 + 0.5 * f64::from(i)).collect();

    // When: RSI is computed
    let rsi = relative_strength_index(&closes, 14);

    // Then: the warm-up is undefined and every later point is exactly 100
    assert!(rsi[..14].iter().all(Option::is_none));
    assert!(rsi[14..].iter().all(|value| *value == Some(100.0)));
}

#[test]
fn strictly_falling_prices_floor_rsi_at_zero() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 - f64::from(i)).collect();
    let rsi = relative_strength_index(&closes, 14);
    assert!(rsi[14..].iter().all(|value| *value == Some(0.0)));
}

#[test]
fn mayer_multiple_is_one_where_close_equals_long_average() {
    // Given: a flat series, so every close equals its trailing average
    let series = daily_series(std::iter::repeat(42.0).take(30));

    // When: indicators are computed with a 10-day long window
    let computed = indicators::compute(
        &series,
        IndicatorWindows {
            short: 5,
            long: 10,
            rsi: 14,
        },
    )
    .expect("valid windows");

    // Then: Mayer Multiple is exactly 1.0 wherever it is defined
    let defined: Vec<f64> = computed.rows().iter().filter_map(|row| row.mayer_multiple).collect();
    assert_eq!(defined.len(), 21);
    assert!(defined.iter().all(|value| *value == 1.0));
}

#[test]
fn windows_longer_than_the_series_degrade_instead_of_failing() {
    // Given: 30 days of history and the default 50/200/14 windows
    let series = arithmetic_series(100.0, 1.0, 30);

    // When: indicators are computed
    let computed = indicators::compute(&series, IndicatorWindows::default()).expect("computes");

    // Then: the moving averages are undefined everywhere but RSI still fills in
    assert_eq!(computed.len(), 30);
    assert!(computed.rows().iter().all(|row| row.ma_short.is_none() && row.ma_long.is_none()));
    assert!(computed.rows().iter().all(|row| row.mayer_multiple.is_none()));
    assert_eq!(computed.rows().iter().filter(|row| row.rsi.is_some()).count(), 16);
}

#[test]
fn long_running_average_does_not_drift() {
    // Given: a long series with large, slowly varying prices
    let closes: Vec<f64> = (0..20_000)
        .map(|i| 60_000.0 + 0.1 * f64::from(i % 997))
        .collect();

    // When: a 200-day moving average is computed incrementally
    let averages = simple_moving_average(&closes, 200);

    // Then: the last value matches a direct recomputation of its window
    let tail = &closes[closes.len() - 200..];
    let direct = tail.iter().sum::<f64>() / 200.0;
    assert_close(averages.last().copied().flatten().expect("defined"), direct);
}
