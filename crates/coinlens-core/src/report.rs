//! Plain-text narrative of a [`Dashboard`].

use std::fmt::Write as _;

use crate::{Dashboard, QUOTE_CURRENCY};

const UNAVAILABLE: &str = "n/a";

/// Renders the eight-section market summary.
///
/// Missing sections print `n/a` instead of being dropped, so the section
/// numbering is stable across runs.
pub fn render_summary(dashboard: &Dashboard) -> String {
    let currency = dashboard.currency.as_str();
    let local = |value: f64| money(currency, value);
    let local_opt = |value: Option<f64>| value.map_or_else(|| UNAVAILABLE.to_owned(), local);
    let ratio = |value: Option<f64>| {
        value.map_or_else(|| UNAVAILABLE.to_owned(), |v| format!("{v:.2}"))
    };

    let mut out = String::from("Bitcoin market summary\n\n");

    let (btc_usd, btc_local) = match dashboard.spot {
        Some(spot) => (money(QUOTE_CURRENCY, spot.btc_usd), local(spot.btc_local)),
        None => (UNAVAILABLE.to_owned(), UNAVAILABLE.to_owned()),
    };
    section(
        &mut out,
        1,
        "Current Bitcoin price",
        &[
            format!("{QUOTE_CURRENCY}: {btc_usd}"),
            format!("{currency}: {btc_local}"),
        ],
    );

    let gold = format!("{currency}: {}", local_opt(dashboard.gold_per_gram));
    section(&mut out, 2, "Gold price per gram", &[gold]);

    let dominance = dashboard
        .btc_dominance_pct
        .map_or_else(|| UNAVAILABLE.to_owned(), |pct| format!("{pct:.2}%"));
    section(&mut out, 3, "Bitcoin market dominance", &[dominance]);

    let (fng_value, fng_class) = match &dashboard.fear_greed {
        Some(reading) => (reading.value.to_string(), reading.classification.clone()),
        None => (UNAVAILABLE.to_owned(), UNAVAILABLE.to_owned()),
    };
    section(
        &mut out,
        4,
        "Fear & Greed index",
        &[
            format!("Value: {fng_value}"),
            format!("Classification: {fng_class}"),
        ],
    );

    let latest = dashboard.latest;
    let mayer = format!("Value: {}", ratio(latest.and_then(|row| row.mayer_multiple)));
    section(&mut out, 5, "Current Mayer Multiple", &[mayer]);

    let stats = &dashboard.all_time;
    section(
        &mut out,
        6,
        "Historical statistics",
        &[
            format!("Lowest close: {}", local(stats.min)),
            format!("Highest close: {}", local(stats.max)),
            format!("Average close: {}", local(stats.mean)),
        ],
    );

    let projection = match &dashboard.forecast {
        Some(forecast) => match forecast.averages {
            Some(avg) => format!(
                "Over the next {} days the {} model projects an average price of {} with bounds between {} and {}.",
                forecast.horizon_days,
                forecast.forecaster,
                local(avg.estimate),
                local(avg.lower_bound),
                local(avg.upper_bound)
            ),
            None => "The forecast horizon is empty.".to_owned(),
        },
        None => "No projection available.".to_owned(),
    };
    section(&mut out, 7, "Projection", &[projection]);

    section(
        &mut out,
        8,
        "Technical indicators",
        &[
            format!(
                "Short moving average: {}",
                local_opt(latest.and_then(|row| row.ma_short))
            ),
            format!(
                "Long moving average: {}",
                local_opt(latest.and_then(|row| row.ma_long))
            ),
            format!("RSI: {}", ratio(latest.and_then(|row| row.rsi))),
        ],
    );

    out
}

fn section(out: &mut String, number: usize, title: &str, lines: &[String]) {
    let _ = writeln!(out, "{number}. {title}");
    for line in lines {
        let _ = writeln!(out, "   - {line}");
    }
    out.push('\n');
}

/// `1234567.891` -> `USD 1,234,567.89`.
pub fn money(currency: &str, value: f64) -> String {
    format!("{currency} {}", thousands(value))
}

fn thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}
