//! Tests for HTTP client configuration as seen by a server.

use jextract_store::download::DownloadClient;
use jextract_store::http::{create_http_client, HttpClientConfig, USER_AGENT as DEFAULT_AGENT};
use jextract_store::ProgressBarOpts;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::helpers::*;

#[test]
fn test_create_http_client_with_headers_and_retries() {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("build-test-agent"));
    let config = HttpClientConfig {
        retries: 2,
        connect_timeout: Duration::from_secs(1),
        proxy: None,
        headers: Some(headers),
    };
    assert!(create_http_client(config).is_ok());
}

#[tokio::test]
async fn test_default_user_agent_is_sent() {
    let server = MockServer::start().await;
    let body = b"payload".to_vec();
    Mock::given(method("GET"))
        .and(path("/file.tar.gz"))
        .and(header("user-agent", DEFAULT_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = create_temp_dir();
    let client = DownloadClient::new(HttpClientConfig::default(), ProgressBarOpts::hidden()).unwrap();
    let resource = served_resource(&server, "file.tar.gz", &body);
    client
        .download(&resource, &dir.path().join("file.tar.gz"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;
    let body = b"payload".to_vec();
    Mock::given(method("GET"))
        .and(path("/file.tar.gz"))
        .and(header("authorization", "Bearer mirror-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer mirror-token"));
    let config = HttpClientConfig {
        headers: Some(headers),
        ..HttpClientConfig::default()
    };

    let dir = create_temp_dir();
    let client = DownloadClient::new(config, ProgressBarOpts::hidden()).unwrap();
    let resource = served_resource(&server, "file.tar.gz", &body);
    client
        .download(&resource, &dir.path().join("file.tar.gz"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_retries_are_opt_in() {
    let server = MockServer::start().await;
    let body = b"payload".to_vec();
    Mock::given(method("GET"))
        .and(path("/file.tar.gz"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_file(&server, "file.tar.gz", body.clone(), 1).await;

    let config = HttpClientConfig {
        retries: 1,
        ..HttpClientConfig::default()
    };
    let dir = create_temp_dir();
    let client = DownloadClient::new(config, ProgressBarOpts::hidden()).unwrap();
    let resource = served_resource(&server, "file.tar.gz", &body);
    client
        .download(&resource, &dir.path().join("file.tar.gz"))
        .await
        .unwrap();
}
