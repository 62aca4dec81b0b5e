//! Integration tests for the content extractor against a mock server.
//!
//! The mock server listens on loopback, so every extractor here is built with
//! `allow_private_hosts` unless the test is about refusing private targets.

use std::time::{Duration, Instant};

use phishguard::content::{default_content_features, CONTENT_FEATURES};
use phishguard::error_handling::FetchFailureKind;
use phishguard::features::FeatureValue;
use phishguard::{normalize_url, Config, ContentExtractor, HostPolicy, LogFormat, LogLevel};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<html>
<head>
  <title>Account Login</title>
  <link rel="icon" href="/favicon.ico">
  <meta name="robots" content="noindex">
  <script src="/static/app.js"></script>
  <script src="https://cdn.example.net/lib.js"></script>
</head>
<body>
  <a href="/help">Help</a>
  <a href="https://twitter.com/someone">Follow us</a>
  <form action="/session" method="post">
    <input type="password" name="pw">
    <button>Sign in</button>
  </form>
</body>
</html>"#;

fn create_test_config(timeout_seconds: u64, allow_private_hosts: bool) -> Config {
    Config {
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        timeout_seconds,
        user_agent: "phishguard-test/1.0".to_string(),
        allow_private_hosts,
        ..Default::default()
    }
}

fn html(body: impl Into<Vec<u8>>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

fn extractor(timeout_seconds: u64) -> ContentExtractor {
    ContentExtractor::new(&create_test_config(timeout_seconds, true))
        .expect("Failed to build content extractor")
}

#[tokio::test]
async fn test_extracts_features_from_html_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html(LOGIN_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = normalize_url(&format!("{}/login", mock_server.uri()), HostPolicy::Preserve);
    let record = extractor(5)
        .try_extract(&url)
        .await
        .expect("page should be analyzed");

    assert_eq!(record.len(), CONTENT_FEATURES.len());
    assert_eq!(
        record.get("Title"),
        Some(&FeatureValue::Text("Account Login".to_string()))
    );
    assert_eq!(record.number("HasTitle"), Some(1.0));
    assert_eq!(record.number("HasFavicon"), Some(1.0));
    assert_eq!(record.number("Robots"), Some(1.0));
    assert_eq!(record.number("NoOfJS"), Some(2.0));
    assert_eq!(record.number("HasPasswordField"), Some(1.0));
    assert_eq!(record.number("HasSubmitButton"), Some(1.0));
    assert_eq!(record.number("HasExternalFormSubmit"), Some(0.0));
    assert_eq!(record.number("HasSocialNet"), Some(1.0));
    // /help and /static/app.js
    assert_eq!(record.number("NoOfSelfRef"), Some(2.0));
    // twitter and the CDN script
    assert_eq!(record.number("NoOfExternalRef"), Some(2.0));
    assert_eq!(record.number("NoOfSelfRedirect"), Some(1.0));
}

#[tokio::test]
async fn test_follows_redirects_within_one_fetch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/final"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(html(LOGIN_PAGE))
        .mount(&mock_server)
        .await;

    let url = normalize_url(&format!("{}/start", mock_server.uri()), HostPolicy::Preserve);
    let record = extractor(5).try_extract(&url).await.expect("redirect followed");
    assert_eq!(record.number("HasTitle"), Some(1.0));
}

#[tokio::test]
async fn test_forced_timeout_returns_defaults_within_bound() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(LOGIN_PAGE).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let extractor = extractor(1);
    let url = normalize_url(&format!("{}/slow", mock_server.uri()), HostPolicy::Preserve);

    let start = Instant::now();
    let record = extractor.extract(&url).await;
    let elapsed = start.elapsed();

    assert_eq!(record, default_content_features());
    assert!(
        elapsed < Duration::from_secs(3),
        "extract took {:.2}s with a 1s timeout",
        elapsed.as_secs_f64()
    );

    let err = extractor.try_extract(&url).await.expect_err("must time out");
    assert_eq!(err.kind(), FetchFailureKind::Timeout);
}

#[tokio::test]
async fn test_non_success_status_returns_defaults() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(LOGIN_PAGE, "text/html"))
        .mount(&mock_server)
        .await;

    let extractor = extractor(5);
    let url = normalize_url(&format!("{}/gone", mock_server.uri()), HostPolicy::Preserve);

    let err = extractor.try_extract(&url).await.expect_err("404");
    assert_eq!(err.kind(), FetchFailureKind::Status);
    assert_eq!(extractor.extract(&url).await, default_content_features());
}

#[tokio::test]
async fn test_non_html_content_returns_defaults() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"ok":true}"#, "application/json"))
        .mount(&mock_server)
        .await;

    let extractor = extractor(5);
    let url = normalize_url(&format!("{}/api", mock_server.uri()), HostPolicy::Preserve);

    let err = extractor.try_extract(&url).await.expect_err("json");
    assert_eq!(err.kind(), FetchFailureKind::NotHtml);
    assert_eq!(extractor.extract(&url).await, default_content_features());
}

#[tokio::test]
async fn test_oversize_body_returns_defaults() {
    let mock_server = MockServer::start().await;
    let body = format!("<html><body>{}</body></html>", "a".repeat(3 * 1024 * 1024));
    Mock::given(method("GET"))
        .respond_with(html(body))
        .mount(&mock_server)
        .await;

    let extractor = extractor(5);
    let url = normalize_url(&format!("{}/huge", mock_server.uri()), HostPolicy::Preserve);

    let err = extractor.try_extract(&url).await.expect_err("too large");
    assert_eq!(err.kind(), FetchFailureKind::TooLarge);
}

#[tokio::test]
async fn test_invalid_utf8_returns_defaults() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(vec![b'<', b'p', b'>', 0xff, 0xfe, 0xfd]))
        .mount(&mock_server)
        .await;

    let extractor = extractor(5);
    let url = normalize_url(&format!("{}/binary", mock_server.uri()), HostPolicy::Preserve);

    let err = extractor.try_extract(&url).await.expect_err("not utf-8");
    assert_eq!(err.kind(), FetchFailureKind::Decode);
    assert_eq!(extractor.extract(&url).await, default_content_features());
}

#[tokio::test]
async fn test_private_target_refused_without_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(LOGIN_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let extractor = ContentExtractor::new(&create_test_config(5, false))
        .expect("Failed to build content extractor");
    let url = normalize_url(&format!("{}/login", mock_server.uri()), HostPolicy::Preserve);

    let err = extractor.try_extract(&url).await.expect_err("loopback refused");
    assert_eq!(err.kind(), FetchFailureKind::UnsafeTarget);
    assert_eq!(extractor.extract(&url).await, default_content_features());
}

#[tokio::test]
async fn test_connection_refused_returns_defaults() {
    // Bind and drop a listener to get a port nothing listens on
    let port = {
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
        listener.local_addr().expect("listener address").port()
    };

    let extractor = extractor(2);
    let url = normalize_url(&format!("http://127.0.0.1:{port}/"), HostPolicy::Preserve);

    let err = extractor.try_extract(&url).await.expect_err("nothing listening");
    assert_eq!(err.kind(), FetchFailureKind::Connect);
    assert_eq!(extractor.extract(&url).await, default_content_features());
}

#[tokio::test]
async fn test_add_www_policy_fetches_the_submitted_host() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html(LOGIN_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let port = mock_server.address().port();
    let url = normalize_url(&format!("localhost:{port}/login"), HostPolicy::AddWww);
    assert_eq!(url.host, "www.localhost");

    let record = extractor(5)
        .try_extract(&url)
        .await
        .expect("page on the submitted host should be analyzed");
    assert_eq!(record.number("HasTitle"), Some(1.0));
    assert_eq!(record.number("HasPasswordField"), Some(1.0));
}
