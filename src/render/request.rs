//! Render request model
//!
//! The request body accepted by the service: either a URL to
//! fetch-and-load or literal HTML content, plus optional PDF output
//! options. When both `url` and `html` are present the explicit HTML
//! content wins over the fetch.

use serde::Deserialize;

use super::error::RenderError;

/// A request to render content to PDF
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderRequest {
    /// URL whose HTML should be fetched and rendered
    pub url: Option<String>,
    /// Literal HTML content to render (takes precedence over `url`)
    pub html: Option<String>,
    /// PDF output options
    #[serde(default)]
    pub options: PdfOptions,
    /// Per-request deadline in seconds; falls back to the configured
    /// default when absent
    pub deadline_secs: Option<u64>,
}

/// The content source resolved from a validated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource<'a> {
    Html(&'a str),
    Url(&'a str),
}

impl RenderRequest {
    /// Create a request rendering literal HTML
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }

    /// Create a request rendering a fetched URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Resolve the content source, validating the request shape
    ///
    /// HTML takes precedence when both fields are present. Fails with
    /// [`RenderError::Validation`] when neither is present; this check
    /// runs before any engine interaction.
    pub fn source(&self) -> Result<ContentSource<'_>, RenderError> {
        if let Some(html) = self.html.as_deref() {
            return Ok(ContentSource::Html(html));
        }
        if let Some(url) = self.url.as_deref() {
            return Ok(ContentSource::Url(url));
        }
        Err(RenderError::Validation(
            "either 'url' or 'html' must be provided".to_string(),
        ))
    }
}

/// PDF output options, merged over full-bleed A4 defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfOptions {
    /// Paper format (default: A4)
    pub format: PaperFormat,
    /// Landscape orientation
    pub landscape: bool,
    /// Print background graphics (default: true)
    pub print_background: bool,
    /// Render scale (0.1 - 2.0, default 1.0)
    pub scale: f64,
    /// Margins in inches, all four sides (default: 0)
    pub margin: Margins,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            format: PaperFormat::A4,
            landscape: false,
            print_background: true,
            scale: 1.0,
            margin: Margins::default(),
        }
    }
}

/// Page margins in inches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

/// Supported paper formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    A4,
    A3,
    Letter,
    Legal,
    Tabloid,
}

impl PaperFormat {
    /// Paper dimensions as (width, height) in inches
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PaperFormat::A4 => (8.27, 11.69),
            PaperFormat::A3 => (11.69, 16.54),
            PaperFormat::Letter => (8.5, 11.0),
            PaperFormat::Legal => (8.5, 14.0),
            PaperFormat::Tabloid => (11.0, 17.0),
        }
    }
}
