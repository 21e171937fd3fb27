use std::sync::Arc;

use crate::common::{self, FrozenClock};
use chrono::{TimeZone, Utc};
use httpmock::Method::GET;
use yhistory_rs::{HistoryBuilder, Interval, YhError};

#[tokio::test]
async fn between_sends_unix_second_period_params() {
    let server = common::setup_server();
    let (_c, _k) = common::mock_cookie_crumb(&server);

    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2023, 6, 30, 0, 0, 0).unwrap();

    let dl = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/download/AAPL")
            .query_param("period1", start.timestamp().to_string())
            .query_param("period2", end.timestamp().to_string())
            .query_param("interval", "1wk")
            .query_param("events", "history")
            .query_param("crumb", "crumb-value");
        then.status(200)
            .header("content-type", "text/csv")
            .body(common::HISTORY_CSV);
    });

    let client = common::client_for(&server);
    HistoryBuilder::new(&client, "AAPL")
        .between(start, end)
        .interval(Interval::W1)
        .candles()
        .await
        .unwrap();

    dl.assert();
}

#[tokio::test]
async fn default_window_is_epoch_start_through_now() {
    let server = common::setup_server();
    let (_c, _k) = common::mock_cookie_crumb(&server);

    let now = Utc.with_ymd_and_hms(2023, 7, 1, 12, 0, 0).unwrap();
    let dl = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/download/AAPL")
            .query_param("period1", "0")
            .query_param("period2", now.timestamp().to_string())
            .query_param("interval", "1d");
        then.status(200)
            .header("content-type", "text/csv")
            .body(common::HISTORY_CSV);
    });

    let client = common::builder_for(&server)
        .clock(Arc::new(FrozenClock(now)))
        .build()
        .unwrap();

    HistoryBuilder::new(&client, "AAPL").candles().await.unwrap();
    dl.assert();
}

#[tokio::test]
async fn lookback_reaches_back_from_the_injected_now() {
    let server = common::setup_server();
    let (_c, _k) = common::mock_cookie_crumb(&server);

    let now = Utc.with_ymd_and_hms(2023, 7, 1, 12, 0, 0).unwrap();
    let ten_days = 10 * 24 * 60 * 60;
    let dl = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/download/AAPL")
            .query_param("period1", (now.timestamp() - ten_days).to_string())
            .query_param("period2", now.timestamp().to_string());
        then.status(200)
            .header("content-type", "text/csv")
            .body(common::HISTORY_CSV);
    });

    let client = common::builder_for(&server)
        .clock(Arc::new(FrozenClock(now)))
        .build()
        .unwrap();

    HistoryBuilder::new(&client, "AAPL")
        .lookback(chrono::Duration::days(10))
        .candles()
        .await
        .unwrap();
    dl.assert();
}

#[tokio::test]
async fn start_in_the_future_fails_before_any_network_call() {
    let server = common::setup_server();
    let (cookie, crumb) = common::mock_cookie_crumb(&server);

    let now = Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap();
    let future = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let client = common::builder_for(&server)
        .clock(Arc::new(FrozenClock(now)))
        .build()
        .unwrap();

    let err = HistoryBuilder::new(&client, "AAPL")
        .between(future, future + chrono::Duration::days(1))
        .candles()
        .await
        .unwrap_err();

    assert!(matches!(err, YhError::InvalidDates));
    assert_eq!(cookie.hits(), 0);
    assert_eq!(crumb.hits(), 0);
}

#[tokio::test]
async fn start_after_end_fails_before_any_network_call() {
    let server = common::setup_server();
    let (cookie, _k) = common::mock_cookie_crumb(&server);

    let start = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();

    let client = common::client_for(&server);
    let err = HistoryBuilder::new(&client, "AAPL")
        .between(start, end)
        .candles()
        .await
        .unwrap_err();

    assert!(matches!(err, YhError::InvalidDates));
    assert_eq!(cookie.hits(), 0);
}

#[tokio::test]
async fn blank_symbol_is_rejected() {
    let server = common::setup_server();
    let (cookie, _k) = common::mock_cookie_crumb(&server);

    let client = common::client_for(&server);
    let err = HistoryBuilder::new(&client, "   ")
        .candles()
        .await
        .unwrap_err();

    assert!(matches!(err, YhError::InvalidParams(_)));
    assert_eq!(cookie.hits(), 0);
}
