//! HTTP API integration tests against an OCI layout store in a temp directory.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use skr_server::{ServerConfig, build_router, site};
use skr_store::catalog::{ANNOTATION_AUTHOR, ANNOTATION_DESCRIPTION, ANNOTATION_VERSION};
use skr_store::{Manifest, OciLayoutStore};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

async fn seed(root: &Path) -> OciLayoutStore {
    let store = OciLayoutStore::open(root);
    store
        .tag_manifest(
            "ghcr.io/acme/pdf:v1",
            &Manifest::with_annotations([
                (ANNOTATION_DESCRIPTION, "PDF tools"),
                (ANNOTATION_AUTHOR, "acme"),
                (ANNOTATION_VERSION, "1.0.0"),
            ]),
        )
        .await
        .unwrap();
    store
        .tag_manifest(
            "ghcr.io/acme/pdf:latest",
            &Manifest::with_annotations([(ANNOTATION_DESCRIPTION, "ignored")]),
        )
        .await
        .unwrap();
    store
}

fn app(root: &Path, web_ui: bool) -> axum::Router {
    let config = ServerConfig {
        web_ui,
        ..Default::default()
    };
    build_router(config, Arc::new(OciLayoutStore::open(root)))
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(req).await.unwrap()
}

// ── Skills API ─────────────────────────────────────────────────

#[tokio::test]
async fn test_api_skills_aggregates_store() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path()).await;

    let resp = get(app(dir.path(), false), "/api/skills").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    let skills = json.as_array().unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0]["id"], "ghcr.io/acme/pdf");
    assert_eq!(skills[0]["name"], "pdf");
    assert_eq!(skills[0]["description"], "PDF tools");
    assert_eq!(skills[0]["author"], "acme");
    assert_eq!(skills[0]["latestTag"], "ghcr.io/acme/pdf:latest");
    assert_eq!(skills[0]["versions"][0]["version"], "1.0.0");
    assert_eq!(skills[0]["versions"][1]["version"], "latest");
}

#[tokio::test]
async fn test_api_skills_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let resp = get(app(dir.path(), false), "/api/skills").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "[]");
}

#[tokio::test]
async fn test_api_skills_corrupt_index_is_500() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.json"), "{broken").unwrap();

    let resp = get(app(dir.path(), false), "/api/skills").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(resp).await.starts_with("Failed to list skills"));
}

#[tokio::test]
async fn test_skills_json_redirects() {
    let dir = tempfile::tempdir().unwrap();
    let resp = get(app(dir.path(), false), "/skills.json").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/api/skills");
}

// ── Health & Metrics ───────────────────────────────────────────

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let resp = get(app(dir.path(), false), "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let resp = get(app(dir.path(), false), "/metrics").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(ct.starts_with("text/plain"));
    assert!(body_string(resp).await.contains("skr_http_requests_total"));
}

// ── Embedded UI ────────────────────────────────────────────────

#[tokio::test]
async fn test_root_serves_index_html() {
    let dir = tempfile::tempdir().unwrap();
    let resp = get(app(dir.path(), true), "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
    assert!(ct.starts_with("text/html"));
    assert!(body_string(resp).await.contains("app.js"));
}

#[tokio::test]
async fn test_unknown_asset_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let resp = get(app(dir.path(), true), "/nope.png").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ui_disabled_has_no_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let resp = get(app(dir.path(), false), "/").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Static export ──────────────────────────────────────────────

#[tokio::test]
async fn test_generate_site_writes_catalog_and_assets() {
    let store_dir = tempfile::tempdir().unwrap();
    let store = seed(store_dir.path()).await;
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("build").join("http");

    let generated = site::generate_site(&store, &output, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(generated.skills, 1);
    assert!(generated.skipped.is_empty());
    assert_eq!(generated.files.len(), 1 + site::SITE_ASSETS.len());

    let raw = std::fs::read_to_string(output.join("skills.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["latestTag"], "ghcr.io/acme/pdf:latest");
    for asset in site::SITE_ASSETS {
        assert!(output.join(asset).is_file(), "{asset} not written");
    }
}

#[tokio::test]
async fn test_generate_site_fails_on_corrupt_store() {
    let store_dir = tempfile::tempdir().unwrap();
    std::fs::write(store_dir.path().join("index.json"), "nope").unwrap();
    let store = OciLayoutStore::open(store_dir.path());
    let out = tempfile::tempdir().unwrap();

    let result = site::generate_site(&store, out.path(), Duration::from_secs(5)).await;
    assert!(result.is_err());
    assert!(!out.path().join("skills.json").exists());
}
