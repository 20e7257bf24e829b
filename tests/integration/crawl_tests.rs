//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small documentation site and run the
//! full harvest cycle end-to-end, with a renderer that writes one-page PDFs
//! instead of calling wkhtmltopdf.

use doc_harvest::config::Config;
use doc_harvest::crawler::{Coordinator, HttpSession};
use doc_harvest::output::{PdfMerger, MERGED_FILE_NAME};
use doc_harvest::render::Renderer;
use doc_harvest::state::PageState;
use doc_harvest::HarvestError;
use lopdf::{dictionary, Document, Object};
use std::fs;
use std::path::Path;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = r#"<html><head><title>Docs</title></head><body>
<nav id="sidebar">
  <a href="/guide/intro">Intro</a>
  <a href="/guide/setup">Setup</a>
  <a href="/guide/intro">Intro again</a>
  <a href="https://other.example.org/elsewhere">Elsewhere</a>
</nav>
<footer><a href="/legal">Legal</a></footer>
</body></html>"#;

const INTRO: &str = r#"<html><head><title>Intro</title></head><body>
<nav>menu</nav><main><h1>Introduction</h1></main>
</body></html>"#;

const SETUP: &str = r#"<html><head><title>Setup</title></head><body>
<nav>menu</nav><main><h1>Installing</h1></main>
</body></html>"#;

/// Writes a one-page PDF labelled with the document title
///
/// For the `fail_on` title it writes a truncated PDF, then fails, the way
/// wkhtmltopdf can exit non-zero after starting its output.
struct LabelRenderer {
    fail_on: Option<&'static str>,
}

impl LabelRenderer {
    fn new() -> Self {
        Self { fail_on: None }
    }
}

impl Renderer for LabelRenderer {
    async fn render(&self, _markup: &str, title: &str, output: &Path) -> Result<(), HarvestError> {
        if self.fail_on == Some(title) {
            fs::write(output, b"%PDF-1.4\n1 0 obj")?;
            return Err(HarvestError::Render {
                output: output.display().to_string(),
                message: "renderer exited with status 1".to_string(),
            });
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Label" => Object::string_literal(title),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(output)?;
        Ok(())
    }
}

fn page_labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load merged PDF");
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_dictionary(*id).unwrap();
            let label = page.get(b"Label").unwrap().as_str().unwrap();
            String::from_utf8_lossy(label).into_owned()
        })
        .collect()
}

fn create_test_config(output: &Path) -> Config {
    let mut config = Config::default();
    config.output.directory = output.display().to_string();
    config.crawl.delay_seconds = 0;
    config.crawl.timeout_seconds = 5;
    config.crawl.menu_selector = Some("#sidebar".to_string());
    config
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn coordinator(
    config: Config,
    server: &MockServer,
    renderer: LabelRenderer,
) -> Coordinator<LabelRenderer, PdfMerger> {
    let base_url = Url::parse(&format!("{}/", server.uri())).expect("Failed to parse base URL");
    let session = HttpSession::anonymous(&config.crawl).expect("Failed to build session");
    Coordinator::new(config, base_url, session, renderer, PdfMerger::new())
}

#[tokio::test]
async fn test_full_harvest_single_site() {
    let server = MockServer::start().await;
    mount_page(&server, "/", INDEX).await;

    // Deduplicated: the intro page is linked twice but fetched once
    Mock::given(method("GET"))
        .and(path("/guide/intro"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INTRO))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/guide/setup", SETUP).await;

    // Outside the menu, never requested
    Mock::given(method("GET"))
        .and(path("/legal"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("documentacion");
    let report = coordinator(create_test_config(&output), &server, LabelRenderer::new())
        .run()
        .await
        .expect("Harvest failed");

    assert!(report.success());
    assert_eq!(report.links_discovered, 3);
    assert_eq!(report.pages.len(), 2);
    assert!(report.pages.iter().all(|p| p.state == PageState::Rendered));
    assert_eq!(report.pages[0].index, 1);
    assert!(report.pages[0].url.ends_with("/guide/intro"));
    assert!(report.pages[1].url.ends_with("/guide/setup"));

    // Raw page kept as fetched
    let raw = fs::read_to_string(output.join("doc_001.html")).unwrap();
    assert_eq!(raw, INTRO);

    // Normalized page holds only the main content
    let normalized = fs::read_to_string(output.join("doc_001_limpio.html")).unwrap();
    assert!(normalized.contains("<main><h1>Introduction</h1></main>"));
    assert!(normalized.contains("<title>Intro</title>"));
    assert!(!normalized.contains("<nav>"));

    assert!(output.join("doc_002.pdf").exists());
    assert!(!output.join("doc_003.html").exists());
    assert_eq!(
        page_labels(&output.join(MERGED_FILE_NAME)),
        vec!["Intro", "Setup"]
    );
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/", INDEX).await;
    mount_page(&server, "/guide/intro", INTRO).await;

    Mock::given(method("GET"))
        .and(path("/guide/setup"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let report = coordinator(create_test_config(&output), &server, LabelRenderer::new())
        .run()
        .await
        .unwrap();

    assert!(report.success());
    assert_eq!(report.pages[0].state, PageState::Rendered);
    assert_eq!(report.pages[1].state, PageState::FetchFailed);
    assert!(report.pages[1].error.as_deref().unwrap().contains("404"));
    assert!(!output.join("doc_002.html").exists());
    assert_eq!(page_labels(&output.join(MERGED_FILE_NAME)), vec!["Intro"]);
}

#[tokio::test]
async fn test_failed_render_leaves_no_pdf() {
    let server = MockServer::start().await;
    mount_page(&server, "/", INDEX).await;
    mount_page(&server, "/guide/intro", INTRO).await;
    mount_page(&server, "/guide/setup", SETUP).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let renderer = LabelRenderer {
        fail_on: Some("Intro"),
    };
    let report = coordinator(create_test_config(&output), &server, renderer)
        .run()
        .await
        .unwrap();

    assert!(report.success());
    assert_eq!(report.pages[0].state, PageState::RenderFailed);
    assert_eq!(report.pages[1].state, PageState::Rendered);

    // Intermediate files of the failed page are still on disk, its
    // truncated PDF is not
    assert!(output.join("doc_001_limpio.html").exists());
    assert!(!output.join("doc_001.pdf").exists());
    assert!(report.pages[0].artifact.is_none());
    assert_eq!(page_labels(&output.join(MERGED_FILE_NAME)), vec!["Setup"]);
}

#[tokio::test]
async fn test_index_failure_produces_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let report = coordinator(create_test_config(&output), &server, LabelRenderer::new())
        .run()
        .await
        .unwrap();

    assert!(!report.success());
    assert!(report.pages.is_empty());
    assert!(output.is_dir());
    assert!(!output.join(MERGED_FILE_NAME).exists());
}

#[tokio::test]
async fn test_url_pattern_replaces_origin_check() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/guide/intro">Intro</a><a href="/blog/news">News</a>"#,
    )
    .await;
    mount_page(&server, "/guide/intro", INTRO).await;

    Mock::given(method("GET"))
        .and(path("/blog/news"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawl.menu_selector = None;
    config.crawl.url_pattern = Some("/guide/".to_string());

    let report = coordinator(config, &server, LabelRenderer::new())
        .run()
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 1);
    assert!(report.pages[0].url.ends_with("/guide/intro"));
}

#[tokio::test]
async fn test_missing_content_selector_keeps_raw_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/", INDEX).await;
    mount_page(&server, "/guide/intro", INTRO).await;
    mount_page(&server, "/guide/setup", SETUP).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawl.content_selector = Some(".missing".to_string());

    let report = coordinator(config, &server, LabelRenderer::new())
        .run()
        .await
        .unwrap();

    let normalized = fs::read_to_string(dir.path().join("doc_001_limpio.html")).unwrap();
    assert_eq!(normalized, INTRO);
    assert_eq!(report.pages[0].content_source.as_deref(), Some("raw markup"));
}

#[tokio::test]
async fn test_dry_run_discovery() {
    let server = MockServer::start().await;
    mount_page(&server, "/", INDEX).await;

    let dir = tempfile::tempdir().unwrap();
    let (pages, discovered) = coordinator(create_test_config(dir.path()), &server, LabelRenderer::new())
        .discover_pages()
        .await
        .unwrap();

    assert_eq!(discovered, 3);
    let paths: Vec<&str> = pages.iter().map(|u| u.path()).collect();
    assert_eq!(paths, vec!["/guide/intro", "/guide/setup"]);
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}
