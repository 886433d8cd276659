use std::time::Duration;

use danglescan::probe::{build_client, HttpProbe, HttpProber};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn prober(timeout: Duration) -> HttpProber {
    HttpProber::new(build_client(timeout).unwrap(), timeout)
}

#[tokio::test]
async fn test_probe_falls_back_to_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&mock_server)
        .await;

    // plain-text server: the https attempt fails, http answers
    let host = mock_server.address().to_string();
    let outcome = prober(Duration::from_secs(3)).probe(&host).await;

    assert_eq!(outcome.status, Some(200));
    assert_eq!(outcome.final_url, Some(format!("http://{}/", host)));
}

#[tokio::test]
async fn test_probe_follows_redirects() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/landing"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let host = mock_server.address().to_string();
    let outcome = prober(Duration::from_secs(3)).probe(&host).await;

    assert_eq!(outcome.status, Some(200));
    assert!(outcome.final_url.unwrap().ends_with("/landing"));
}

#[tokio::test]
async fn test_probe_reports_error_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let outcome = prober(Duration::from_secs(3))
        .probe(&mock_server.address().to_string())
        .await;

    assert_eq!(outcome.status, Some(404));
    assert!(outcome.is_reachable());
}

#[tokio::test]
async fn test_probe_unreachable_host() {
    let outcome = prober(Duration::from_secs(2)).probe("127.0.0.1:1").await;

    assert_eq!(outcome.status, None);
    assert_eq!(outcome.final_url, None);
}

#[tokio::test]
async fn test_probe_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let outcome = prober(Duration::from_millis(300))
        .probe(&mock_server.address().to_string())
        .await;

    assert!(!outcome.is_reachable());
    assert_eq!(outcome.final_url, None);
}
