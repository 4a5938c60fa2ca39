//! Requests under the API prefix.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;

use dev_proxy::config::UpstreamTarget;
use dev_proxy::ProxyConfig;

mod common;
use common::CannedResponse;

fn static_config(web_dir: &std::path::Path, api: UpstreamTarget) -> ProxyConfig {
    ProxyConfig {
        web_dir: web_dir.to_path_buf(),
        api_target: api,
        ..ProxyConfig::default()
    }
}

#[tokio::test]
async fn test_api_down_is_bad_gateway_naming_the_api() {
    let bundle = common::web_bundle();
    let api = common::upstream(common::closed_addr());
    let (proxy_addr, shutdown) = common::start_proxy(static_config(bundle.path(), api.clone())).await;

    let res = common::client()
        .get(format!("http://{proxy_addr}/v1/accounts"))
        .send()
        .await
        .expect("proxy must answer, not reset");

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body = res.text().await.unwrap();
    assert!(body.contains(api.as_str()), "body was {body:?}");
    assert!(body.starts_with("Upstream unreachable"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_silent_upstream_times_out() {
    let api_addr = common::start_silent_backend().await;
    let bundle = common::web_bundle();
    let mut config = static_config(bundle.path(), common::upstream(api_addr));
    config.timeouts.upstream_secs = 1;
    let (proxy_addr, shutdown) = common::start_proxy(config).await;

    let started = std::time::Instant::now();
    let res = common::client()
        .get(format!("http://{proxy_addr}/v1/slow"))
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .expect("proxy must answer, not hang");

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    let body = res.text().await.unwrap();
    assert!(body.starts_with("Upstream unreachable"), "body was {body:?}");
    assert!(body.contains("no response within 1s"), "body was {body:?}");

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_error_status_passes_through() {
    let (api_addr, captured) = common::start_backend(|_| CannedResponse {
        status_line: "404 Not Found",
        headers: vec![
            ("Content-Type", "application/json".into()),
            ("X-Upstream", "api".into()),
        ],
        body: br#"{"error":"no such account"}"#.to_vec(),
    })
    .await;

    let bundle = common::web_bundle();
    let (proxy_addr, shutdown) =
        common::start_proxy(static_config(bundle.path(), common::upstream(api_addr))).await;

    let res = common::client()
        .get(format!("http://{proxy_addr}/v1/accounts/42"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers().get("x-upstream").unwrap(), "api");
    assert_eq!(res.headers().get("content-type").unwrap(), "application/json");
    assert!(res.headers().get("keep-alive").is_none());
    assert!(res.headers().get("connection").is_none());
    assert_eq!(res.bytes().await.unwrap(), &br#"{"error":"no such account"}"#[..]);
    assert_eq!(captured.lock().unwrap().len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_body_round_trips_byte_for_byte() {
    let (api_addr, captured) = common::start_echo_backend().await;
    let bundle = common::web_bundle();
    let (proxy_addr, shutdown) =
        common::start_proxy(static_config(bundle.path(), common::upstream(api_addr))).await;

    let payload: Vec<u8> = (0u8..=255).chain(0u8..=255).collect();
    let res = common::client()
        .post(format!("http://{proxy_addr}/v1/send?dry_run=true"))
        .header("content-type", "application/octet-stream")
        .body(payload.clone())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-echo-method").unwrap(), "POST");
    assert_eq!(res.headers().get("x-echo-target").unwrap(), "/v1/send?dry_run=true");
    assert_eq!(res.bytes().await.unwrap().to_vec(), payload);

    let seen = captured.lock().unwrap();
    assert_eq!(seen[0].body, payload);
    assert_eq!(seen[0].header("content-type"), Some("application/octet-stream"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_hop_by_hop_headers_not_forwarded() {
    let (api_addr, captured) = common::start_echo_backend().await;
    let bundle = common::web_bundle();
    let (proxy_addr, shutdown) =
        common::start_proxy(static_config(bundle.path(), common::upstream(api_addr))).await;

    let mut headers = HeaderMap::new();
    headers.insert("keep-alive", HeaderValue::from_static("timeout=99"));
    headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
    headers.append("x-tag", HeaderValue::from_static("first"));
    headers.append("x-tag", HeaderValue::from_static("second"));

    let res = common::client()
        .get(format!("http://{proxy_addr}/v1/profile"))
        .headers(headers)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("keep-alive").is_none());

    let seen = captured.lock().unwrap();
    let request = &seen[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/v1/profile");
    assert!(request.header("keep-alive").is_none());
    assert!(request.header("transfer-encoding").is_none());
    assert_eq!(request.header("host"), Some(api_addr.to_string().as_str()));
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
    assert_eq!(request.header_all("x-tag"), vec!["first", "second"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unsupported_method_never_reaches_api() {
    let (api_addr, captured) = common::start_echo_backend().await;
    let bundle = common::web_bundle();
    let (proxy_addr, shutdown) =
        common::start_proxy(static_config(bundle.path(), common::upstream(api_addr))).await;

    let res = common::client()
        .put(format!("http://{proxy_addr}/v1/accounts/42"))
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
    assert!(captured.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_rejected_before_forwarding() {
    let (api_addr, captured) = common::start_echo_backend().await;
    let bundle = common::web_bundle();
    let mut config = static_config(bundle.path(), common::upstream(api_addr));
    config.limits.max_body_bytes = 8;
    let (proxy_addr, shutdown) = common::start_proxy(config).await;

    let res = common::client()
        .post(format!("http://{proxy_addr}/v1/upload"))
        .body(vec![1u8; 64])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(captured.lock().unwrap().is_empty());

    shutdown.trigger();
}
