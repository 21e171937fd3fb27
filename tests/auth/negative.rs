use crate::common;
use httpmock::Method::GET;
use yhistory_rs::{HistoryBuilder, YhError};

#[tokio::test]
async fn missing_set_cookie_header_exhausts_the_retry_budget() {
    let server = common::setup_server();

    // Cookie endpoint answers 200 but never sets a cookie.
    let cookie = server.mock(|when, then| {
        when.method(GET).path("/consent");
        then.status(200);
    });
    let crumb = server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(200).body("crumb-value");
    });
    let dl = common::mock_download(&server, "AAPL", "history", common::HISTORY_CSV);

    let client = common::client_for(&server);
    let err = HistoryBuilder::new(&client, "AAPL")
        .candles()
        .await
        .unwrap_err();

    match err {
        YhError::Auth(s) => assert!(s.contains("no cookie"), "unexpected error: {s}"),
        other => panic!("expected Auth error, got {other:?}"),
    }
    assert_eq!(cookie.hits(), 5, "bootstrap retries exactly 5 times");
    assert_eq!(crumb.hits(), 0, "crumb must not be fetched without a cookie");
    assert_eq!(dl.hits(), 0, "no data request without a session");
}

#[tokio::test]
async fn bootstrap_failure_leaves_the_session_retryable() {
    let server = common::setup_server();

    let mut bad_cookie = server.mock(|when, then| {
        when.method(GET).path("/consent");
        then.status(200);
    });

    let client = common::client_for(&server);
    let hb = HistoryBuilder::new(&client, "AAPL");

    let err = hb.candles().await.unwrap_err();
    assert!(matches!(err, YhError::Auth(_)));
    assert_eq!(bad_cookie.hits(), 5);

    // Provider recovers: the next call re-runs creation from scratch.
    bad_cookie.delete();
    let (cookie, crumb) = common::mock_cookie_crumb(&server);
    let dl = common::mock_download(&server, "AAPL", "history", common::HISTORY_CSV);

    let candles = hb.candles().await.unwrap().unwrap();
    assert_eq!(candles.len(), 3);
    cookie.assert();
    crumb.assert();
    dl.assert();
}

#[tokio::test]
async fn empty_crumb_body_is_an_error() {
    let server = common::setup_server();

    let _cookie = server.mock(|when, then| {
        when.method(GET).path("/consent");
        then.status(200).header("set-cookie", "A=B; Path=/");
    });
    let _crumb = server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(200).body("");
    });

    let client = common::client_for(&server);
    let err = HistoryBuilder::new(&client, "AAPL")
        .candles()
        .await
        .unwrap_err();

    match err {
        YhError::Auth(s) => assert!(s.contains("invalid crumb"), "unexpected: {s}"),
        other => panic!("expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn html_crumb_body_is_an_error() {
    let server = common::setup_server();

    let _cookie = server.mock(|when, then| {
        when.method(GET).path("/consent");
        then.status(200).header("set-cookie", "A=B; Path=/");
    });
    let _crumb = server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(200).body("<html>Too Many Requests</html>");
    });

    let client = common::client_for(&server);
    let err = HistoryBuilder::new(&client, "AAPL")
        .candles()
        .await
        .unwrap_err();

    assert!(matches!(err, YhError::Auth(_)));
}
