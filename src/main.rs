//! Doc-Harvest main entry point
//!
//! This is the command-line interface for the documentation harvester.

use anyhow::{bail, Context};
use clap::Parser;
use doc_harvest::config::{load_config_with_hash, validate, AuthConfig, Config};
use doc_harvest::crawler::{open_session, run_crawl, Coordinator};
use doc_harvest::output::{merge_directory, write_markdown_report, PdfMerger};
use doc_harvest::render::WkhtmltopdfRenderer;
use doc_harvest::url::parse_base_url;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Doc-Harvest: documentation site to single PDF
///
/// Doc-Harvest reads the navigation menu of a documentation site, downloads
/// every linked page, keeps only its main content, renders each page to PDF
/// with wkhtmltopdf and merges everything into documentacion_completa.pdf.
#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Turn a documentation site into a single PDF", long_about = None)]
struct Cli {
    /// Base URL of the documentation (the page holding the menu)
    #[arg(value_name = "URL")]
    url: String,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Shorthand selector of the navigation menu (#id, .class or tag)
    #[arg(short, long, value_name = "SELECTOR")]
    menu: Option<String>,

    /// Shorthand selector of the main content (#id, .class or tag)
    #[arg(short, long, value_name = "SELECTOR")]
    content: Option<String>,

    /// Regular expression a link must match to be followed
    #[arg(short, long, value_name = "REGEX")]
    pattern: Option<String>,

    /// Login page URL
    #[arg(short, long, value_name = "URL")]
    login: Option<String>,

    /// Login username
    #[arg(short, long)]
    user: Option<String>,

    /// Login password
    #[arg(short = 'P', long)]
    password: Option<String>,

    /// Seconds to wait between page requests
    #[arg(short, long, value_name = "SECONDS")]
    delay: Option<u64>,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a Markdown report of the run to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discover and list the pages that would be harvested, then exit
    #[arg(long, conflicts_with = "merge_only")]
    dry_run: bool,

    /// Only merge the PDFs already in the output directory
    #[arg(long, conflicts_with = "dry_run")]
    merge_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Invalid base URL aborts before any network activity
    let base_url = parse_base_url(&cli.url)?;

    let config = build_config(&cli)?;

    // Handle different modes
    let merged = if cli.dry_run {
        handle_dry_run(config, base_url).await?;
        true
    } else if cli.merge_only {
        handle_merge_only(&config)
    } else {
        handle_crawl(config, base_url, cli.report.as_deref()).await?
    };

    if !merged {
        bail!("no merged document was produced");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_harvest=info,warn"),
            1 => EnvFilter::new("doc_harvest=debug,info"),
            2 => EnvFilter::new("doc_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and layers the command line on top
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
    if let Some(menu) = &cli.menu {
        config.crawl.menu_selector = Some(menu.clone());
    }
    if let Some(content) = &cli.content {
        config.crawl.content_selector = Some(content.clone());
    }
    if let Some(pattern) = &cli.pattern {
        config.crawl.url_pattern = Some(pattern.clone());
    }
    if let Some(delay) = cli.delay {
        config.crawl.delay_seconds = delay;
    }
    if let Some(auth) = auth_from_flags(&cli.login, &cli.user, &cli.password) {
        config.auth = Some(auth);
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Builds login credentials from the command line
///
/// All three flags are needed. With only some of them the run goes on
/// anonymously (or with the `[auth]` section of the config file).
fn auth_from_flags(
    login_url: &Option<String>,
    username: &Option<String>,
    password: &Option<String>,
) -> Option<AuthConfig> {
    match (login_url, username, password) {
        (Some(login_url), Some(username), Some(password)) => Some(AuthConfig {
            login_url: login_url.clone(),
            username: username.clone(),
            password: password.clone(),
        }),
        (None, None, None) => None,
        _ => {
            tracing::warn!(
                "--login, --user and --password are all needed to log in, ignoring them"
            );
            None
        }
    }
}

/// Handles the --dry-run mode: lists the pages that would be harvested
async fn handle_dry_run(config: Config, base_url: url::Url) -> anyhow::Result<()> {
    println!("=== Doc-Harvest Dry Run ===\n");

    println!("Base URL: {}", base_url);
    println!("Output directory: {}", config.output.directory);
    println!(
        "Menu selector: {}",
        config.crawl.menu_selector.as_deref().unwrap_or("(whole page)")
    );
    println!(
        "Content selector: {}",
        config.crawl.content_selector.as_deref().unwrap_or("(automatic)")
    );
    if let Some(pattern) = &config.crawl.url_pattern {
        println!("URL pattern: {}", pattern);
    }
    println!("Delay: {}s", config.crawl.delay_seconds);

    let session = open_session(&config).await?;
    let renderer = WkhtmltopdfRenderer::new(config.render.clone());
    let coordinator = Coordinator::new(config, base_url, session, renderer, PdfMerger::new());
    let (pages, discovered) = coordinator.discover_pages().await?;

    println!("\nPages ({} unique of {} links):", pages.len(), discovered);
    for (i, url) in pages.iter().enumerate() {
        println!("  {:03} {}", i + 1, url);
    }

    Ok(())
}

/// Handles the --merge-only mode: merges existing PDFs
fn handle_merge_only(config: &Config) -> bool {
    let directory = Path::new(&config.output.directory);
    tracing::info!("Merging PDFs in {}", directory.display());
    merge_directory(directory, &PdfMerger::new())
}

/// Handles the main harvest operation
async fn handle_crawl(
    config: Config,
    base_url: url::Url,
    report_path: Option<&Path>,
) -> anyhow::Result<bool> {
    tracing::info!("Starting harvest of {}", base_url);
    tracing::info!("Output directory: {}", config.output.directory);

    let report = run_crawl(config, base_url)
        .await
        .context("harvest failed")?;

    if let Some(path) = report_path {
        write_markdown_report(&report, path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("Report written to: {}", path.display());
    }

    if report.success() {
        tracing::info!("Harvest completed successfully");
    }

    Ok(report.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_auth_from_all_flags() {
        let auth = auth_from_flags(
            &some("https://docs.example.com/login"),
            &some("alice"),
            &some("s3cret"),
        )
        .unwrap();
        assert_eq!(auth.login_url, "https://docs.example.com/login");
        assert_eq!(auth.username, "alice");
        assert_eq!(auth.password, "s3cret");
    }

    #[test]
    fn test_partial_flags_continue_anonymously() {
        assert!(auth_from_flags(&some("https://docs.example.com/login"), &None, &None).is_none());
        assert!(auth_from_flags(&None, &some("alice"), &some("s3cret")).is_none());
        assert!(auth_from_flags(&None, &None, &None).is_none());
    }

    #[test]
    fn test_partial_flags_are_not_fatal() {
        let cli = Cli::parse_from([
            "doc-harvest",
            "https://docs.example.com/",
            "--user",
            "alice",
        ]);
        let config = build_config(&cli).unwrap();
        assert!(config.auth.is_none());
    }
}
