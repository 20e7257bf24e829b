//! Integration tests for form login
//!
//! A wiremock server plays the login endpoint; the tests check the submitted
//! form and the failure heuristic.

use doc_harvest::config::{AuthConfig, Config, CrawlConfig};
use doc_harvest::crawler::{login, open_session, Coordinator};
use doc_harvest::output::{ArtifactMerger, MERGED_FILE_NAME};
use doc_harvest::render::Renderer;
use doc_harvest::state::PageState;
use doc_harvest::HarvestError;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_FORM: &str = r#"<html><body><form method="post" action="/login">
<input type="hidden" name="csrf_token" value="tok123">
<input name="Username"><input name="Password" type="password">
</form></body></html>"#;

/// Writes the title as the artifact content
struct TitleRenderer;

impl Renderer for TitleRenderer {
    async fn render(&self, _markup: &str, title: &str, output: &Path) -> Result<(), HarvestError> {
        fs::write(output, title)?;
        Ok(())
    }
}

/// Concatenates the artifacts as plain bytes
struct ConcatMerger;

impl ArtifactMerger for ConcatMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), HarvestError> {
        let mut merged = Vec::new();
        for input in inputs {
            merged.extend(fs::read(input)?);
        }
        fs::write(output, merged)?;
        Ok(())
    }
}

fn auth_config(server: &MockServer) -> AuthConfig {
    AuthConfig {
        login_url: format!("{}/login", server.uri()),
        username: "alice".to_string(),
        password: "s3cret".to_string(),
    }
}

fn crawl_config() -> CrawlConfig {
    let mut config = CrawlConfig::default();
    config.timeout_seconds = 5;
    config
}

async fn mount_login_form(server: &MockServer, form: &str) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(form))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_echoes_csrf_token() {
    let server = MockServer::start().await;
    mount_login_form(&server, LOGIN_FORM).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("Username=alice"))
        .and(body_string_contains("Password=s3cret"))
        .and(body_string_contains("csrf_token=tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Welcome back</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let session = login(&crawl_config(), &auth_config(&server)).await;
    assert!(session.expect("Login should succeed").is_authenticated());
}

#[tokio::test]
async fn test_login_without_token() {
    let server = MockServer::start().await;
    mount_login_form(&server, r#"<form><input name="Username"></form>"#).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Welcome"))
        .mount(&server)
        .await;

    assert!(login(&crawl_config(), &auth_config(&server)).await.is_some());

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.to_string() == "POST")
        .expect("No login POST received");
    let body = String::from_utf8_lossy(&post.body);
    assert!(!body.contains("csrf_token"));
}

#[tokio::test]
async fn test_invalid_password_yields_no_session() {
    let server = MockServer::start().await;
    mount_login_form(&server, LOGIN_FORM).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Invalid password</p>"))
        .mount(&server)
        .await;

    assert!(login(&crawl_config(), &auth_config(&server)).await.is_none());
}

#[tokio::test]
async fn test_unreachable_login_page_yields_no_session() {
    let auth = AuthConfig {
        login_url: "http://127.0.0.1:9/login".to_string(),
        username: "alice".to_string(),
        password: "s3cret".to_string(),
    };

    assert!(login(&crawl_config(), &auth).await.is_none());
}

#[tokio::test]
async fn test_session_keeps_login_cookie() {
    let server = MockServer::start().await;
    mount_login_form(&server, LOGIN_FORM).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc; Path=/")
                .set_body_string("Welcome"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("members only"))
        .mount(&server)
        .await;

    let session = login(&crawl_config(), &auth_config(&server))
        .await
        .expect("Login should succeed");
    let url = Url::parse(&format!("{}/private", server.uri())).unwrap();
    let page = session.fetch_page(&url).await.expect("Cookie was not sent");
    assert_eq!(page.raw_markup, "members only");
}

#[tokio::test]
async fn test_failed_login_falls_back_to_anonymous() {
    let server = MockServer::start().await;
    mount_login_form(&server, LOGIN_FORM).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Username or password incorrect"))
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/",
        r#"<nav id="menu"><a href="/guide/intro">Intro</a></nav>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/guide/intro"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Intro</title></head><body><main>Public</main></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.crawl = crawl_config();
    config.crawl.delay_seconds = 0;
    config.crawl.menu_selector = Some("#menu".to_string());
    config.output.directory = dir.path().display().to_string();
    config.auth = Some(auth_config(&server));

    let session = open_session(&config).await.unwrap();
    assert!(!session.is_authenticated());

    // The crawl itself goes ahead with the anonymous session
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let report = Coordinator::new(config, base_url, session, TitleRenderer, ConcatMerger)
        .run()
        .await
        .unwrap();

    assert!(report.success());
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].state, PageState::Rendered);
    assert_eq!(
        fs::read_to_string(dir.path().join(MERGED_FILE_NAME)).unwrap(),
        "Intro"
    );
}
