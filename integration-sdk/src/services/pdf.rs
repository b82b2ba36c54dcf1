//! HTML-to-PDF rendering through an external command
//!
//! The HTML document is piped to the child's stdin and every `{output}`
//! occurrence in the argument list is replaced with the target path. The
//! default invocation is `wkhtmltopdf --quiet - <output>`.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::{ConfigProvider, PdfRendererConfig, ServiceConfig, DEFAULT_PROVIDER};
use crate::core::PdfRenderer;
use crate::error::{Result, ServiceError};

/// Renders PDFs by running a converter program
#[derive(Debug, Clone, Default)]
pub struct CommandPdfRenderer {
    config: PdfRendererConfig,
}

impl CommandPdfRenderer {
    pub fn new_with_config(config: PdfRendererConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new_with_config(PdfRendererConfig::from_provider(&**DEFAULT_PROVIDER)?)
    }

    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        Self::new_with_config(PdfRendererConfig::from_provider(provider)?)
    }

    /// Use an arbitrary program and argument template
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new_with_config(PdfRendererConfig {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    fn resolved_args(&self, output: &Path) -> Vec<String> {
        let output = output.to_string_lossy();
        self.config
            .args
            .iter()
            .map(|arg| arg.replace("{output}", &output))
            .collect()
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    async fn render_to_file(&self, html: &str, output: &Path) -> Result<()> {
        let args = self.resolved_args(output);
        debug!("Rendering PDF with {} {:?}", self.config.program, args);

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ServiceError::external_service(format!(
                    "Failed to start PDF renderer '{}': {}",
                    self.config.program, e
                ))
            })?;

        // Feed stdin while stderr is drained, so a chatty renderer cannot fill
        // its pipe and stall. A renderer that exits early closes its stdin;
        // report its exit status rather than the broken pipe.
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                Some(mut stdin) => {
                    let written = stdin.write_all(html.as_bytes()).await;
                    drop(stdin);
                    written
                }
                None => Ok(()),
            }
        };

        let (fed, result) = tokio::join!(feed, child.wait_with_output());
        let result = result?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ServiceError::external_service(format!(
                "PDF renderer exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }
        fed?;

        let written = tokio::fs::metadata(output).await?;
        if written.len() == 0 {
            return Err(ServiceError::external_service("PDF renderer produced an empty file"));
        }

        Ok(())
    }
}
