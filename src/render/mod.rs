//! Rendering subsystem
//!
//! - `pool`: bounded-lifetime renderer pool (the core)
//! - `engine`: adapter traits the pool consumes
//! - `chromium`: chromiumoxide-backed production adapter
//! - `request`: request model and PDF output options
//! - `error`: render and engine error taxonomy

pub mod chromium;
pub mod engine;
pub mod error;
pub mod pool;
pub mod request;

pub use chromium::ChromiumLauncher;
pub use engine::{EngineLauncher, RenderEngine};
pub use error::{EngineError, RenderError};
pub use pool::{Lease, PoolConfig, PoolStats, RendererPool};
pub use request::{PdfOptions, RenderRequest};
