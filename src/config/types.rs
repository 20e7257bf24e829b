use serde::Deserialize;

/// Default User-Agent sent with every page request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "documentacion";

/// Main configuration structure for Doc-Harvest
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below. Command-line options are applied on top.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
    pub auth: Option<AuthConfig>,
    pub render: RenderConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Pause between consecutive page requests (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: u64,

    /// Shorthand selector (`#id`, `.class`, `tag`) of the navigation menu
    #[serde(rename = "menu-selector")]
    pub menu_selector: Option<String>,

    /// Shorthand selector of the main content container
    #[serde(rename = "content-selector")]
    pub content_selector: Option<String>,

    /// Regular expression that discovered URLs must match
    #[serde(rename = "url-pattern")]
    pub url_pattern: Option<String>,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            delay_seconds: 1,
            menu_selector: None,
            content_selector: None,
            url_pattern: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving per-page files and the merged PDF
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

/// Login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// URL of the login form (fetched, then posted to)
    #[serde(rename = "login-url")]
    pub login_url: String,

    pub username: String,

    pub password: String,
}

/// Options passed to the HTML-to-PDF renderer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Path or name of the wkhtmltopdf executable
    #[serde(rename = "wkhtmltopdf-path")]
    pub wkhtmltopdf_path: String,

    #[serde(rename = "page-size")]
    pub page_size: String,

    /// Margin applied to all four sides (e.g. "0.75in")
    pub margin: String,

    pub encoding: String,

    #[serde(rename = "enable-javascript")]
    pub enable_javascript: bool,

    /// Time given to page scripts before rendering (milliseconds)
    #[serde(rename = "javascript-delay-ms")]
    pub javascript_delay_ms: u64,

    /// Generate a PDF outline from headings
    pub outline: bool,

    /// Additional raw arguments appended before the input/output arguments
    #[serde(rename = "extra-args")]
    pub extra_args: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wkhtmltopdf_path: "wkhtmltopdf".to_string(),
            page_size: "A4".to_string(),
            margin: "0.75in".to_string(),
            encoding: "UTF-8".to_string(),
            enable_javascript: true,
            javascript_delay_ms: 2000,
            outline: false,
            extra_args: Vec::new(),
        }
    }
}
