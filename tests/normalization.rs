//! Currency and unit conversions are plain scalar multiplications.

use coinlens_core::indicators::{self, IndicatorWindows};
use coinlens_core::{
    ForecastAdapter, ForecastSettings, HoltLinear, Normalizer, ValidationError,
    GRAMS_PER_TROY_OUNCE,
};
use coinlens_tests::{arithmetic_series, assert_close};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
}

#[quickcheck]
fn gram_and_currency_conversions_commute(price: u32, rate_cents: u16) -> TestResult {
    if rate_cents == 0 {
        return TestResult::discard();
    }

    let price = f64::from(price) / 100.0;
    let currency = Normalizer::exchange_rate(f64::from(rate_cents) / 100.0).expect("positive");
    let grams = Normalizer::ounce_to_gram();

    let gram_first = currency.apply(grams.apply(price));
    let currency_first = grams.apply(currency.apply(price));
    let composed = grams.then(currency).apply(price);
    let composed_reversed = currency.then(grams).apply(price);

    TestResult::from_bool(
        close_enough(gram_first, currency_first)
            && close_enough(gram_first, composed)
            && close_enough(composed, composed_reversed),
    )
}

#[quickcheck]
fn composition_is_associative(a: u16, b: u16, c: u16) -> TestResult {
    if a == 0 || b == 0 || c == 0 {
        return TestResult::discard();
    }

    let [a, b, c] = [a, b, c].map(|raw| Normalizer::exchange_rate(f64::from(raw) / 97.0).expect("positive"));
    TestResult::from_bool(close_enough(
        a.then(b).then(c).factor(),
        a.then(b.then(c)).factor(),
    ))
}

#[test]
fn one_troy_ounce_is_exactly_the_gram_constant() {
    // Given: gold at 2,350 USD per troy ounce and 5.4 BRL per USD
    let per_gram_usd = Normalizer::ounce_to_gram().apply(2_350.0);
    let per_gram_brl = Normalizer::ounce_to_gram()
        .then(Normalizer::exchange_rate(5.4).expect("rate"))
        .apply(2_350.0);

    // Then: the per-gram prices use 31.1034768 g/oz
    assert_eq!(GRAMS_PER_TROY_OUNCE, 31.103_476_8);
    assert_close(per_gram_usd, 2_350.0 / 31.103_476_8);
    assert_close(per_gram_brl, 2_350.0 / 31.103_476_8 * 5.4);
}

#[test]
fn one_rate_scales_series_indicators_and_forecast_alike() {
    // Given: a USD history and a single 5.0 exchange rate
    let usd = arithmetic_series(100.0, 1.0, 60);
    let rate = Normalizer::exchange_rate(5.0).expect("rate");
    let windows = IndicatorWindows {
        short: 10,
        long: 20,
        rsi: 14,
    };

    // When: converting before and after the computation
    let converted = rate.series(&usd).expect("series");
    let computed_then_scaled = rate.indicators(&indicators::compute(&usd, windows).expect("usd"));
    let scaled_then_computed = indicators::compute(&converted, windows).expect("local");

    // Then: prices scale while RSI and Mayer Multiple stay unit-free
    for (a, b) in computed_then_scaled.rows().iter().zip(scaled_then_computed.rows()) {
        assert_eq!(a.date, b.date);
        for (x, y) in [(a.ma_short, b.ma_short), (a.ma_long, b.ma_long)] {
            assert_eq!(x.is_some(), y.is_some());
            if let (Some(x), Some(y)) = (x, y) {
                assert_close(x, y);
            }
        }
        assert_eq!(a.rsi, b.rsi);
        if let (Some(x), Some(y)) = (a.mayer_multiple, b.mayer_multiple) {
            assert_close(x, y);
        }
    }

    // And: forecast bounds scale with the estimate
    let adapter = ForecastAdapter::new(HoltLinear::default(), ForecastSettings::default());
    let forecast = adapter.run(&usd).expect("forecast");
    let local = rate.forecast(&forecast).expect("scaled");
    for (usd_point, local_point) in forecast.points().iter().zip(local.points()) {
        assert_close(local_point.estimate, usd_point.estimate * 5.0);
        assert_close(local_point.lower_bound, usd_point.lower_bound * 5.0);
        assert_close(local_point.upper_bound, usd_point.upper_bound * 5.0);
    }
}

#[test]
fn non_positive_rates_are_rejected() {
    for rate in [0.0, -5.4, f64::NAN, f64::INFINITY] {
        let error = Normalizer::exchange_rate(rate).expect_err("must fail");
        assert!(
            matches!(
                error,
                ValidationError::NonPositiveValue { .. } | ValidationError::NonFiniteValue { .. }
            ),
            "{rate}: {error:?}"
        );
    }
}
