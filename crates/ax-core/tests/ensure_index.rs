#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]
//! Cache revalidation protocol against a mock documentation server.

use std::fs;
use std::path::Path;

use ax_core::{
    CacheLayout, Config, ContentFormat, CorpusConfig, Fetcher, LazySearcher, SearchOptions,
    Searcher,
};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn corpus(server: &MockServer) -> CorpusConfig {
    CorpusConfig {
        name: "test-docs".into(),
        outline_url: format!("{}/llms.txt", server.uri()),
        content_url: format!("{}/llms-full.txt", server.uri()),
        format: ContentFormat::Frontmatter,
        cache: CacheLayout::new("cache-metadata.json", "search-index"),
    }
}

fn outline(server: &MockServer) -> String {
    format!(
        "# Apps in Toss\n\n> Mini app docs.\n\n## Getting Started\n\n- [Overview]({0}/intro/overview.md): What mini apps are\n\n## Payments\n\n- [Toss Pay]({0}/pay/toss-pay.md): Accept payments\n",
        server.uri()
    )
}

fn full_content_v1(server: &MockServer) -> String {
    format!(
        "---\nurl: {0}/intro/overview.md\n---\n\n# Overview\n\nMini apps run inside the Toss app.\n\n---\nurl: {0}/pay/toss-pay.md\n---\n\n# Toss Pay\n\n토스페이로 결제를 받는 방법을 설명합니다.\n",
        server.uri()
    )
}

fn full_content_v2(server: &MockServer) -> String {
    format!(
        "---\nurl: {0}/intro/launch.md\n---\n\n# Launch Checklist\n\nEverything to verify before release.\n",
        server.uri()
    )
}

async fn mount_outline(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/llms.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(outline(server)))
        .mount(server)
        .await;
}

async fn mount_content(server: &MockServer, body: String, etag: &str) {
    Mock::given(method("HEAD"))
        .and(path("/llms-full.txt"))
        .respond_with(ResponseTemplate::new(200).insert_header("etag", etag))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/llms-full.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("etag", etag),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn searcher(server: &MockServer, cache_root: &Path) -> Searcher {
    Searcher::with_fetcher(corpus(server), Fetcher::new().unwrap(), cache_root).unwrap()
}

async fn built_searcher(server: &MockServer, cache_root: &Path) -> Searcher {
    mount_outline(server).await;
    mount_content(server, full_content_v1(server), "\"v1\"").await;
    let mut searcher = searcher(server, cache_root);
    searcher.ensure_index().await.expect("initial build");
    server.verify().await;
    server.reset().await;
    searcher
}

fn index_meta(cache_root: &Path) -> String {
    fs::read_to_string(cache_root.join("search-index").join("meta.json")).unwrap()
}

#[tokio::test]
async fn initial_build_indexes_and_records_etag() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let searcher = built_searcher(&server, temp_dir.path()).await;

    assert!(searcher.is_open());
    assert_eq!(searcher.cache().cached_etag().as_deref(), Some("\"v1\""));

    let hits = searcher.search("overview", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].title, "Overview");
    assert_eq!(hits[0].category, "Getting Started");
    assert_eq!(hits[0].description, "");

    let korean = searcher.search("결제", &SearchOptions::default()).unwrap();
    assert_eq!(korean[0].title, "Toss Pay");
    assert_eq!(korean[0].category, "Payments");
}

#[tokio::test]
async fn unchanged_content_reuses_index_without_download() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = built_searcher(&server, temp_dir.path()).await;
    let overview_id = first.search("overview", &SearchOptions::default()).unwrap()[0]
        .id
        .clone();
    drop(first);
    let meta_before = index_meta(temp_dir.path());

    Mock::given(method("HEAD"))
        .and(path("/llms-full.txt"))
        .and(header("If-None-Match", "\"v1\""))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut second = searcher(&server, temp_dir.path());
    second.ensure_index().await.unwrap();

    assert_eq!(index_meta(temp_dir.path()), meta_before);
    let doc = second.get_document(&overview_id).unwrap().expect("document");
    assert_eq!(doc.title, "Overview");
    assert!(doc.score.abs() < f32::EPSILON);
    server.verify().await;
}

#[tokio::test]
async fn changed_content_replaces_index() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut searcher = built_searcher(&server, temp_dir.path()).await;
    let old_id = searcher.search("overview", &SearchOptions::default()).unwrap()[0]
        .id
        .clone();

    mount_outline(&server).await;
    mount_content(&server, full_content_v2(&server), "\"v2\"").await;
    searcher.ensure_index().await.unwrap();

    assert!(searcher.get_document(&old_id).unwrap().is_none());
    let hits = searcher.search("launch", &SearchOptions::default()).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Launch Checklist");
    assert!(searcher.get_document(&hits[0].id).unwrap().is_some());
    assert_eq!(searcher.cache().cached_etag().as_deref(), Some("\"v2\""));
    server.verify().await;
}

#[tokio::test]
async fn revalidation_failure_serves_cached_index() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    drop(built_searcher(&server, temp_dir.path()).await);

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut searcher = searcher(&server, temp_dir.path());
    searcher.ensure_index().await.unwrap();
    assert_eq!(
        searcher.search("overview", &SearchOptions::default()).unwrap().len(),
        1
    );
    server.verify().await;
}

#[tokio::test]
async fn corrupt_index_is_rebuilt_even_when_unchanged() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    drop(built_searcher(&server, temp_dir.path()).await);
    fs::remove_file(temp_dir.path().join("search-index").join("meta.json")).unwrap();

    Mock::given(method("HEAD"))
        .and(path("/llms-full.txt"))
        .and(header("If-None-Match", "\"v1\""))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;
    mount_outline(&server).await;
    mount_content(&server, full_content_v1(&server), "\"v1\"").await;

    let mut searcher = searcher(&server, temp_dir.path());
    searcher.ensure_index().await.unwrap();
    assert!(!searcher.search("overview", &SearchOptions::default()).unwrap().is_empty());
    server.verify().await;
}

#[tokio::test]
async fn missing_outline_means_no_categories() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    Mock::given(method("GET"))
        .and(path("/llms.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_content(&server, full_content_v1(&server), "\"v1\"").await;

    let mut searcher = searcher(&server, temp_dir.path());
    searcher.ensure_index().await.unwrap();

    let hits = searcher.search("overview", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].category, "");
}

#[tokio::test]
async fn failed_download_surfaces_and_leaves_no_index() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    Mock::given(method("GET"))
        .and(path("/llms-full.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut searcher = searcher(&server, temp_dir.path());
    let err = searcher.ensure_index().await.unwrap_err();
    assert_eq!(err.category(), "fetch");
    assert!(!searcher.cache().index_exists());
    assert!(searcher.cache().cached_etag().is_none());
}

#[tokio::test]
async fn unsaved_etag_fails_the_build() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    mount_outline(&server).await;
    mount_content(&server, full_content_v1(&server), "\"v1\"").await;

    // A non-empty directory where the metadata file belongs cannot be replaced.
    let blocked = temp_dir.path().join("cache-metadata.json");
    fs::create_dir_all(blocked.join("occupied")).unwrap();

    let mut searcher = searcher(&server, temp_dir.path());
    let err = searcher.ensure_index().await.unwrap_err();
    assert_eq!(err.category(), "storage");
    assert!(!searcher.is_open());
    assert!(searcher.cache().cached_etag().is_none());
}

#[tokio::test]
async fn close_releases_the_index() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut searcher = built_searcher(&server, temp_dir.path()).await;

    searcher.close();
    assert!(searcher.search("overview", &SearchOptions::default()).is_err());
}

#[tokio::test]
async fn lazy_searcher_builds_on_first_get() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    mount_outline(&server).await;
    mount_content(&server, full_content_v1(&server), "\"v1\"").await;

    let mut config = Config::default();
    config.paths.cache_root = temp_dir.path().to_path_buf();
    let lazy = LazySearcher::for_corpus(corpus(&server), config);

    let first = lazy.get().await.unwrap();
    let second = lazy.get().await.unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(
        first.search("toss pay", &SearchOptions::default()).unwrap()[0].title,
        "Toss Pay"
    );
    server.verify().await;
}
