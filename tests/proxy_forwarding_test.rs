use serde_json::{json, Value};
use spa_devgate::bootstrap::bootstrap_from_config;
use spa_devgate::config::Config;
use spa_devgate::registry::icons;
use spa_devgate::state::AppState;
use spa_devgate::web;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::path::FullPath;
use warp::test::request;
use warp::Filter;

/// Backend that echoes what it received.
async fn spawn_backend() -> SocketAddr {
    let header = |headers: &HeaderMap, name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null)
    };

    let login = warp::path!("api" / "login").and(warp::post()).map(|| {
        warp::http::Response::builder()
            .status(302)
            .header("location", "/api/me")
            .header("set-cookie", "sessionid=new; Path=/")
            .body(String::new())
            .unwrap()
    });

    let asset = warp::path!("media" / "big.bin").map(|| "x".repeat(1000));

    let echo = warp::path::full()
        .and(warp::method())
        .and(
            warp::query::raw()
                .or(warp::any().map(String::new))
                .unify(),
        )
        .and(warp::header::headers_cloned())
        .and(warp::body::bytes())
        .map(move |path: FullPath, method: warp::http::Method, query: String, headers: HeaderMap, body: bytes::Bytes| {
            warp::reply::json(&json!({
                "path": path.as_str(),
                "method": method.as_str(),
                "query": query,
                "host": header(&headers, "host"),
                "origin": header(&headers, "origin"),
                "cookie": header(&headers, "cookie"),
                "authorization": header(&headers, "authorization"),
                "body": String::from_utf8_lossy(&body),
            }))
        });

    let (addr, server) = warp::serve(login.or(asset).or(echo)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn gateway_state(backend: SocketAddr, static_dir: &std::path::Path) -> Arc<AppState> {
    let mut config = Config::default();
    config.backend.dev_origin = format!("http://{}", backend);
    config.dev_server.static_dir = static_dir.to_path_buf();

    let runtime = bootstrap_from_config(&config, icons::catalog()).unwrap();
    let (state, _) = AppState::new(config, runtime).unwrap();
    state
}

#[tokio::test]
async fn test_api_request_forwards_credentials_and_rewrites_origin() {
    let backend = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let routes = web::routes(gateway_state(backend, dir.path()));

    let resp = request()
        .method("GET")
        .path("/api/users?page=2")
        .header("host", "localhost:5173")
        .header("origin", "http://localhost:5173")
        .header("cookie", "sessionid=abc")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["path"], "/api/users");
    assert_eq!(body["query"], "page=2");
    assert_eq!(body["host"], backend.to_string());
    assert_eq!(body["origin"], format!("http://{}", backend));
    assert_eq!(body["cookie"], "sessionid=abc");
}

#[tokio::test]
async fn test_media_request_drops_credentials() {
    let backend = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let routes = web::routes(gateway_state(backend, dir.path()));

    let resp = request()
        .method("GET")
        .path("/media/logo.png")
        .header("host", "localhost:5173")
        .header("cookie", "sessionid=abc")
        .header("authorization", "Bearer t0k")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["path"], "/media/logo.png");
    assert_eq!(body["host"], backend.to_string());
    assert_eq!(body["cookie"], Value::Null);
    assert_eq!(body["authorization"], Value::Null);
}

#[tokio::test]
async fn test_post_body_is_forwarded() {
    let backend = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let routes = web::routes(gateway_state(backend, dir.path()));

    let resp = request()
        .method("POST")
        .path("/api/songs/bid")
        .header("content-type", "application/json")
        .body(r#"{"song_id":7,"amount":40}"#)
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["body"], r#"{"song_id":7,"amount":40}"#);
}

#[tokio::test]
async fn test_redirects_and_cookies_are_relayed() {
    let backend = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let routes = web::routes(gateway_state(backend, dir.path()));

    let resp = request()
        .method("POST")
        .path("/api/login")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers()["location"], "/api/me");
    assert_eq!(resp.headers()["set-cookie"], "sessionid=new; Path=/");
}

#[tokio::test]
async fn test_unmatched_path_is_not_forwarded() {
    let backend = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "index").unwrap();
    let routes = web::routes(gateway_state(backend, dir.path()));

    let resp = request().method("GET").path("/about").reply(&routes).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.body().as_ref(), b"index");
}

#[tokio::test]
async fn test_head_keeps_content_length() {
    let backend = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let routes = web::routes(gateway_state(backend, dir.path()));

    let resp = request()
        .method("HEAD")
        .path("/media/big.bin")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-length"], "1000");
    assert!(resp.body().is_empty());
}
