use super::*;
use crate::bootstrap::bootstrap_from_config;
use crate::config::Config;
use crate::registry::icons;
use serde_json::Value;
use std::path::Path;
use warp::test::request;

fn create_test_config(static_dir: &Path) -> Config {
    let mut config = Config::default();
    config.dev_server.static_dir = static_dir.to_path_buf();
    config
}

fn create_test_state(config: Config) -> Arc<AppState> {
    let runtime = bootstrap_from_config(&config, icons::catalog()).unwrap();
    let (state, _) = AppState::new(config, runtime).unwrap();
    state
}

fn static_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<div id=\"app\"></div>").unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/main.js"), "console.log('main')").unwrap();
    dir
}

#[tokio::test]
async fn test_bootstrap_json_local() {
    let dir = static_dir();
    let state = create_test_state(create_test_config(dir.path()));
    let routes = routes(state);

    let resp = request()
        .method("GET")
        .path("/__devgate/bootstrap.json")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["apiBaseUrl"], "http://localhost:8000");
    assert_eq!(body["environment"], "local");
    assert_eq!(body["page"], "http://localhost:5173");
    assert_eq!(body["capabilities"].as_array().unwrap().len(), icons::CATALOG.len());

    let rules = body["proxyRules"].as_array().unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0]["pathPrefix"], "/api");
    assert_eq!(rules[0]["target"], "http://localhost:8000");
    assert_eq!(rules[0]["forwardCredentials"], true);
    assert_eq!(rules[1]["pathPrefix"], "/media");
    assert_eq!(rules[1]["forwardCredentials"], false);
}

#[tokio::test]
async fn test_bootstrap_json_deployed_has_inert_proxy() {
    let dir = static_dir();
    let mut config = create_test_config(dir.path());
    config.dev_server.public_url = Some("https://contest.example.org/".to_string());
    let state = create_test_state(config);
    assert!(state.proxy_table.is_empty());

    let routes = routes(state);
    let resp = request()
        .method("GET")
        .path("/__devgate/bootstrap.json")
        .reply(&routes)
        .await;

    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["apiBaseUrl"], "https://contest.example.org");
    assert_eq!(body["environment"], "deployed");
    assert!(body["proxyRules"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bootstrap_script_sets_api_base_url() {
    let dir = static_dir();
    let routes = routes(create_test_state(create_test_config(dir.path())));

    let resp = request()
        .method("GET")
        .path("/__devgate/bootstrap.js")
        .reply(&routes)
        .await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/javascript");
    assert_eq!(resp.headers()["cache-control"], "no-store");
    assert_eq!(
        std::str::from_utf8(resp.body()).unwrap(),
        "window.API_BASE_URL = \"http://localhost:8000\";\n"
    );
}

#[tokio::test]
async fn test_icon_lookup() {
    let dir = static_dir();
    let routes = routes(create_test_state(create_test_config(dir.path())));

    let resp = request()
        .method("GET")
        .path("/__devgate/icons/Upload.svg")
        .reply(&routes)
        .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/svg+xml");
    assert!(std::str::from_utf8(resp.body()).unwrap().starts_with("<svg"));

    let resp = request()
        .method("GET")
        .path("/__devgate/icons/Missing.svg")
        .reply(&routes)
        .await;
    assert_eq!(resp.status(), 404);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert!(body["error"].as_str().unwrap().contains("Missing.svg"));

    let resp = request()
        .method("GET")
        .path("/__devgate/icons/Upload")
        .reply(&routes)
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_health() {
    let dir = static_dir();
    let routes = routes(create_test_state(create_test_config(dir.path())));

    let resp = request().method("GET").path("/__devgate/health").reply(&routes).await;
    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "spa-devgate");
}

#[tokio::test]
async fn test_static_files_and_history_fallback() {
    let dir = static_dir();
    let routes = routes(create_test_state(create_test_config(dir.path())));

    let resp = request().method("GET").path("/assets/main.js").reply(&routes).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.body().as_ref(), b"console.log('main')");

    let resp = request().method("GET").path("/about").reply(&routes).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.body().as_ref(), b"<div id=\"app\"></div>");
}

#[tokio::test]
async fn test_without_fallback_unknown_path_is_not_found() {
    let dir = static_dir();
    let mut config = create_test_config(dir.path());
    config.dev_server.spa_fallback = false;
    let routes = routes(create_test_state(config));

    let resp = request().method("GET").path("/about").reply(&routes).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let dir = static_dir();
    let mut config = create_test_config(dir.path());
    config.backend.dev_origin = "http://127.0.0.1:1".to_string();
    config.backend.request_timeout_ms = 2000;
    let routes = routes(create_test_state(config));

    let resp = request().method("GET").path("/api/users").reply(&routes).await;
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let dir = static_dir();
    let mut config = create_test_config(dir.path());
    config.backend.dev_origin = "http://127.0.0.1:1".to_string();
    config.proxy.max_body_bytes = 16;
    let routes = routes(create_test_state(config));

    let resp = request()
        .method("POST")
        .path("/api/songs")
        .body(vec![b'a'; 64])
        .reply(&routes)
        .await;
    assert_eq!(resp.status(), 413);
}
