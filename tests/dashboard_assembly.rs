//! Dashboard assembly over offline market data.

use coinlens_core::{
    render_summary, AnalyticsConfig, AnalyticsError, Dashboard, DashboardInputs,
    DashboardSection, ForecastSeries, Forecaster, HoltLinear, LinearTrend, MarketSnapshot,
    Observation,
};
use coinlens_feeds::{Asset, FeedConfig, MarketData, MarketFeeds};
use coinlens_tests::{assert_close, date};

async fn offline_data(history_limit: usize) -> MarketData {
    let config = FeedConfig {
        history_limit,
        ..FeedConfig::default()
    };
    MarketFeeds::offline(&config, date("2024-06-30"))
        .market_data(Some(Asset::Eth))
        .await
        .expect("offline data")
}

/// Always fails to fit.
struct Broken;

impl Forecaster for Broken {
    type Model = ();

    fn name(&self) -> &'static str {
        "broken"
    }

    fn fit(&self, _history: &[Observation]) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::forecaster("model did not converge"))
    }

    fn predict(&self, _model: &(), _horizon_days: usize) -> Result<ForecastSeries, AnalyticsError> {
        Err(AnalyticsError::forecaster("unreachable"))
    }
}

#[tokio::test]
async fn full_offline_dashboard_has_every_section() {
    // Given: 400 days of offline data
    let data = offline_data(399).await;

    // When: the dashboard is assembled for the second quarter
    let dashboard = Dashboard::assemble(
        DashboardInputs {
            primary: &data.primary,
            comparison: data.comparison.as_ref(),
            snapshot: &data.snapshot,
            range: Some((date("2024-04-01"), date("2024-06-30"))),
            forecaster: HoltLinear::default(),
        },
        &AnalyticsConfig::default(),
    )
    .expect("assembles");

    // Then: nothing is degraded and every price is in BRL
    assert!(!dashboard.is_degraded(), "{:?}", dashboard.failures);
    assert_eq!(dashboard.currency, "BRL");
    assert_close(dashboard.exchange_rate.factor(), 5.4);
    assert_close(
        dashboard.gold_per_gram.expect("gold"),
        2_350.0 / 31.103_476_8 * 5.4,
    );
    let last_close = data.primary.last().expect("non-empty").close;
    assert_close(dashboard.all_time.last, last_close * 5.4);

    // And: chart rows cover exactly the selected range
    assert_eq!(dashboard.rows.len(), 91);
    assert_eq!(dashboard.range.map(|range| range.count), Some(91));
    assert!(dashboard.rows.iter().all(|row| row.ma_long.is_some()));

    // And: the forecast horizon starts the day after the last close
    let forecast = dashboard.forecast.as_ref().expect("forecast");
    assert_eq!(forecast.horizon_days, 30);
    assert_eq!(forecast.points.first().map(|p| p.date), Some(date("2024-07-01")));
    assert!(forecast.averages.is_some());

    // And: the comparison series is converted with the same rate
    let eth_usd = data.comparison.as_ref().expect("eth").last().expect("eth close").close;
    let eth_local = dashboard.comparison.as_ref().expect("eth").last().expect("eth close").close;
    assert_close(eth_local, eth_usd * 5.4);
}

#[tokio::test]
async fn failing_forecaster_degrades_only_its_section() {
    let data = offline_data(299).await;

    let dashboard = Dashboard::assemble(
        DashboardInputs {
            primary: &data.primary,
            comparison: None,
            snapshot: &data.snapshot,
            range: None,
            forecaster: Broken,
        },
        &AnalyticsConfig::default(),
    )
    .expect("assembles");

    assert!(dashboard.forecast.is_none());
    assert_eq!(dashboard.failures.len(), 1);
    let failure = dashboard.failure(DashboardSection::Forecast).expect("forecast failure");
    assert_eq!(failure.code, "analytics.forecaster");
    assert!(dashboard.latest.is_some());
    assert!(dashboard.spot.is_some());
}

#[tokio::test]
async fn missing_snapshot_keeps_usd_and_reports_each_piece() {
    let data = offline_data(249).await;
    let empty = MarketSnapshot::default();

    let dashboard = Dashboard::assemble(
        DashboardInputs {
            primary: &data.primary,
            comparison: None,
            snapshot: &empty,
            range: None,
            forecaster: LinearTrend::default(),
        },
        &AnalyticsConfig::default(),
    )
    .expect("assembles");

    assert_eq!(dashboard.currency, "USD");
    assert_eq!(dashboard.exchange_rate.factor(), 1.0);
    for section in [
        DashboardSection::Spot,
        DashboardSection::Gold,
        DashboardSection::Dominance,
        DashboardSection::FearGreed,
    ] {
        assert!(dashboard.failure(section).is_some(), "{section:?}");
    }
    assert!(dashboard.forecast.is_some());
}

#[tokio::test]
async fn summary_numbers_all_eight_sections() {
    // Given: a healthy offline dashboard
    let data = offline_data(299).await;
    let dashboard = Dashboard::assemble(
        DashboardInputs {
            primary: &data.primary,
            comparison: None,
            snapshot: &data.snapshot,
            range: None,
            forecaster: HoltLinear::default(),
        },
        &AnalyticsConfig::default(),
    )
    .expect("assembles");

    // When: the narrative is rendered
    let text = render_summary(&dashboard);

    // Then: the sections appear in order and nothing is unavailable
    let mut cursor = 0;
    for number in 1..=8 {
        let heading = format!("\n{number}. ");
        let position = text[cursor..].find(&heading).expect("section present");
        cursor += position + heading.len();
    }
    assert!(!text.contains("n/a"), "{text}");
    assert!(text.contains("BRL"));
    assert!(text.contains("Value: 62"), "{text}");
    assert!(text.contains("Classification: Greed"), "{text}");
}
