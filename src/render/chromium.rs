//! Chromium engine adapter
//!
//! Production implementation of the engine traits over the
//! `chromiumoxide` CDP client. One engine = one headless Chromium
//! process with a single page; the pool decides when to launch, reuse,
//! and discard instances.
//!
//! URL rendering fetches the HTML out-of-band with `reqwest` and
//! injects it into the page, rather than navigating the browser to the
//! URL directly. This sidesteps in-browser CORS and sandbox limits
//! when pulling documents from storage endpoints, and keeps TLS
//! handling (including opt-in acceptance of self-signed certificates)
//! in one place.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::EngineConfig;

use super::engine::{EngineLauncher, RenderEngine};
use super::error::EngineError;
use super::request::PdfOptions;

/// Launches headless Chromium processes
pub struct ChromiumLauncher {
    config: EngineConfig,
    client: reqwest::Client,
}

impl ChromiumLauncher {
    /// Build a launcher from engine configuration
    ///
    /// The HTTP client used for URL fetches is constructed once here;
    /// engine instances share it.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| EngineError::Launch(format!("http client init failed: {}", e)))?;
        Ok(Self { config, client })
    }

    fn browser_config(&self) -> Result<BrowserConfig, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage");

        if let Some(path) = &self.config.executable {
            builder = builder.chrome_executable(path);
        }
        for arg in &self.config.extra_args {
            builder = builder.arg(arg);
        }

        builder.build().map_err(EngineError::Launch)
    }
}

#[async_trait]
impl EngineLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn RenderEngine>, EngineError> {
        let config = self.browser_config()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EngineError::Launch(e.to_string()))?;

        let alive = Arc::new(AtomicBool::new(true));

        // Drive the CDP event stream. When it ends the process is gone;
        // the flag is how mid-operation failures get classified as
        // crashes rather than render errors.
        let alive_flag = alive.clone();
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
            alive_flag.store(false, Ordering::SeqCst);
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Launch(format!("failed to open page: {}", e)))?;

        let id = Uuid::new_v4();
        tracing::debug!("Launched Chromium engine {}", id);

        Ok(Box::new(ChromiumEngine {
            id,
            browser: Mutex::new(Some(browser)),
            page,
            alive,
            client: self.client.clone(),
        }))
    }
}

/// One headless Chromium process
pub struct ChromiumEngine {
    id: Uuid,
    /// Taken out on close so a second close is a no-op
    browser: Mutex<Option<Browser>>,
    page: Page,
    alive: Arc<AtomicBool>,
    client: reqwest::Client,
}

impl ChromiumEngine {
    /// Classify a CDP failure: if the process died underneath the
    /// operation, report a crash instead of a render error.
    fn classify(&self, context: &str, err: impl std::fmt::Display) -> EngineError {
        if !self.is_alive() {
            EngineError::Crashed(format!("{}: {}", context, err))
        } else {
            EngineError::Failed(format!("{}: {}", context, err))
        }
    }
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    fn id(&self) -> Uuid {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn load_html(&self, content: &str) -> Result<(), EngineError> {
        self.page
            .set_content(content)
            .await
            .map(|_| ())
            .map_err(|e| self.classify("set content", e))
    }

    async fn load_url(&self, url: &str) -> Result<(), EngineError> {
        tracing::debug!("Fetching HTML from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EngineError::Failed(format!("fetch '{}': {}", url, e)))?;

        if !response.status().is_success() {
            return Err(EngineError::Failed(format!(
                "fetch '{}': upstream returned {}",
                url,
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| EngineError::Failed(format!("read body of '{}': {}", url, e)))?;

        self.load_html(&html).await
    }

    async fn generate_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>, EngineError> {
        self.page
            .pdf(print_params(options))
            .await
            .map_err(|e| self.classify("print to pdf", e))
    }

    async fn close(&self) {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return;
        };
        self.alive.store(false, Ordering::SeqCst);
        if let Err(e) = browser.close().await {
            tracing::warn!("Engine {} close failed: {}", self.id, e);
        }
        let _ = browser.wait().await;
        tracing::debug!("Engine {} closed", self.id);
    }
}

/// Translate output options into CDP `Page.printToPdf` parameters
fn print_params(options: &PdfOptions) -> PrintToPdfParams {
    let (width, height) = options.format.dimensions();
    let (paper_width, paper_height) = if options.landscape {
        (height, width)
    } else {
        (width, height)
    };

    PrintToPdfParams {
        landscape: Some(options.landscape),
        print_background: Some(options.print_background),
        scale: Some(options.scale),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: Some(options.margin.top),
        margin_right: Some(options.margin.right),
        margin_bottom: Some(options.margin.bottom),
        margin_left: Some(options.margin.left),
        ..Default::default()
    }
}
