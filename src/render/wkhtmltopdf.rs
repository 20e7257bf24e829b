use crate::config::RenderConfig;
use crate::render::Renderer;
use crate::HarvestError;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Renders HTML with the `wkhtmltopdf` command-line tool
///
/// The markup is written to the tool's stdin (`-` input argument) and the PDF
/// path is passed as the last argument.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    config: RenderConfig,
}

impl WkhtmltopdfRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Builds the argument list for one page
    ///
    /// Defaults: A4, 0.75in margins, UTF-8, JavaScript enabled with a 2000 ms
    /// delay, no outline, quiet.
    pub fn build_args(&self, title: &str, output: &Path) -> Vec<String> {
        let config = &self.config;
        let mut args = vec!["--page-size".to_string(), config.page_size.clone()];

        for side in ["top", "right", "bottom", "left"] {
            args.push(format!("--margin-{}", side));
            args.push(config.margin.clone());
        }

        args.push("--encoding".to_string());
        args.push(config.encoding.clone());
        args.push("--title".to_string());
        args.push(title.to_string());

        if config.enable_javascript {
            args.push("--enable-javascript".to_string());
            args.push("--javascript-delay".to_string());
            args.push(config.javascript_delay_ms.to_string());
        } else {
            args.push("--disable-javascript".to_string());
        }

        args.push(if config.outline { "--outline" } else { "--no-outline" }.to_string());
        args.push("--quiet".to_string());
        args.extend(config.extra_args.iter().cloned());

        args.push("-".to_string());
        args.push(output.display().to_string());
        args
    }
}

impl Renderer for WkhtmltopdfRenderer {
    async fn render(&self, markup: &str, title: &str, output: &Path) -> Result<(), HarvestError> {
        let render_error = |message: String| HarvestError::Render {
            output: output.display().to_string(),
            message,
        };

        let mut child = Command::new(&self.config.wkhtmltopdf_path)
            .args(self.build_args(title, output))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                render_error(format!(
                    "could not start '{}': {}",
                    self.config.wkhtmltopdf_path, e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(markup.as_bytes())
                .await
                .map_err(|e| render_error(format!("could not send markup: {}", e)))?;
            // Closing stdin signals the end of the document
            drop(stdin);
        }

        let result = child
            .wait_with_output()
            .await
            .map_err(|e| render_error(e.to_string()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(render_error(format!(
                "{} exited with {}: {}",
                self.config.wkhtmltopdf_path,
                result.status,
                stderr.trim()
            )));
        }

        tracing::info!("PDF saved as: {}", output.display());
        Ok(())
    }
}
