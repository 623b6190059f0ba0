//! Render engine adapter traits
//!
//! The narrow seam between the renderer pool and the external headless
//! browser. The pool only ever talks to these traits; the production
//! implementation lives in [`crate::render::chromium`], and tests
//! substitute scripted mocks.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::EngineError;
use super::request::PdfOptions;

/// A live handle to one external browser-process instance
///
/// Owned exclusively by the pool. Operations are object-safe so the
/// pool can hold `Box<dyn RenderEngine>` regardless of backend.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Unique identifier for this engine instance
    fn id(&self) -> Uuid;

    /// Whether the underlying process is still alive
    fn is_alive(&self) -> bool;

    /// Load literal HTML content into the engine
    async fn load_html(&self, content: &str) -> Result<(), EngineError>;

    /// Fetch a URL and load its content into the engine
    async fn load_url(&self, url: &str) -> Result<(), EngineError>;

    /// Generate a PDF from the currently loaded content
    async fn generate_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>, EngineError>;

    /// Close the engine process. Idempotent, best-effort.
    async fn close(&self);
}

/// Launches fresh engine instances on demand
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    /// Start a new engine process
    async fn launch(&self) -> Result<Box<dyn RenderEngine>, EngineError>;
}
