use exptracker::config::Config;
use exptracker::core::fetcher::{HttpFetcher, LeaderboardSource, RetryPolicy, retry_with_backoff};
use exptracker::errors::AppError;
use std::time::Duration;

mod common;
use common::stub_server;

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_secs(3),
    }
}

#[test]
fn test_default_policy() {
    let p = RetryPolicy::default();
    assert_eq!(p.max_attempts, 3);
    assert_eq!(p.base_delay, Duration::from_secs(3));
}

#[test]
fn test_exhaustion_returns_last_error_with_linear_delays() {
    let mut delays = Vec::new();
    let mut calls = 0;

    let result: Result<(), AppError> = retry_with_backoff(
        &policy(3),
        |attempt| {
            calls += 1;
            Err(AppError::Other(format!("fail {attempt}")))
        },
        |d| delays.push(d),
    );

    assert_eq!(calls, 3);
    // no delay after the final attempt
    assert_eq!(delays, vec![Duration::from_secs(3), Duration::from_secs(6)]);
    match result {
        Err(AppError::Other(msg)) => assert_eq!(msg, "fail 3"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_success_after_retry() {
    let mut delays = Vec::new();

    let result = retry_with_backoff(
        &policy(3),
        |attempt| {
            if attempt < 2 {
                Err(AppError::Other("transient".into()))
            } else {
                Ok("page")
            }
        },
        |d| delays.push(d),
    );

    assert_eq!(result.expect("second attempt succeeds"), "page");
    assert_eq!(delays, vec![Duration::from_secs(3)]);
}

#[test]
fn test_zero_attempts_still_tries_once() {
    let mut calls = 0;
    let result: Result<(), AppError> = retry_with_backoff(
        &policy(0),
        |_| {
            calls += 1;
            Err(AppError::Other("down".into()))
        },
        |_| panic!("no sleep expected"),
    );

    assert!(result.is_err());
    assert_eq!(calls, 1);
}

#[test]
fn test_http_fetch_sends_user_agent() {
    let (url, server) = stub_server(vec![(200, "<html>ranking</html>".into())]);
    let fetcher = HttpFetcher::new(
        url,
        "exptracker-test/1.0",
        Duration::from_secs(5),
        RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        },
    )
    .expect("client");

    let body = fetcher.fetch().expect("fetch");
    assert_eq!(body, "<html>ranking</html>");

    let requests = server.join().expect("server thread");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].to_lowercase().contains("user-agent: exptracker-test/1.0"));
}

#[test]
fn test_http_fetch_retries_server_errors() {
    let (url, server) = stub_server(vec![
        (503, "busy".into()),
        (200, "<html>ok</html>".into()),
    ]);
    let fetcher = HttpFetcher::new(
        url,
        "exptracker-test/1.0",
        Duration::from_secs(5),
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        },
    )
    .expect("client");

    assert_eq!(fetcher.fetch().expect("fetch"), "<html>ok</html>");
    assert_eq!(server.join().expect("server thread").len(), 2);
}

#[test]
fn test_http_fetch_exhaustion_is_network_error() {
    let (url, server) = stub_server(vec![(500, "boom".into()), (502, "bad gateway".into())]);
    let fetcher = HttpFetcher::new(
        url,
        "exptracker-test/1.0",
        Duration::from_secs(5),
        RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::ZERO,
        },
    )
    .expect("client");

    let err = fetcher.fetch().unwrap_err();
    assert!(matches!(err, AppError::NetworkExhausted { attempts: 2, .. }));
    assert!(err.to_string().contains("502"));
    server.join().expect("server thread");
}

#[test]
fn test_delay_saturates_instead_of_overflowing() {
    let p = RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::MAX,
    };
    assert_eq!(p.delay_after(2), Duration::MAX);
}

#[test]
fn test_out_of_range_backoff_is_a_config_error() {
    let cfg = Config {
        backoff_base_secs: u64::MAX,
        ..Config::default()
    };
    let err = HttpFetcher::from_config(&cfg).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("backoff_base_secs")));
}
