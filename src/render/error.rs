//! Render error types
//!
//! Unified error handling for the renderer pool and the engine adapter.

use thiserror::Error;

/// Errors surfaced by the renderer pool to its callers
#[derive(Debug, Error)]
pub enum RenderError {
    /// Bad request shape - neither URL nor HTML given
    #[error("Invalid render request: {0}")]
    Validation(String),

    /// The render engine could not be started
    #[error("Failed to launch render engine: {0}")]
    Launch(String),

    /// The per-request deadline elapsed before completion
    #[error("Render timed out after {0} seconds")]
    Timeout(u64),

    /// The engine process terminated unexpectedly mid-operation
    #[error("Render engine crashed: {0}")]
    EngineCrash(String),

    /// The engine reported a failure that is neither timeout nor crash
    /// (e.g. malformed content, unreachable URL)
    #[error("Render failed: {0}")]
    Engine(String),
}

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors reported by an engine adapter implementation
///
/// The pool classifies these into [`RenderError`] kinds: `Crashed`
/// poisons the lease and discards the engine, everything else leaves
/// the engine reusable.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process failed to start
    #[error("Engine launch failed: {0}")]
    Launch(String),

    /// The engine process died while an operation was in flight
    #[error("Engine process terminated: {0}")]
    Crashed(String),

    /// The engine reported an operation failure
    #[error("Engine operation failed: {0}")]
    Failed(String),
}

impl From<EngineError> for RenderError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Launch(msg) => RenderError::Launch(msg),
            EngineError::Crashed(msg) => RenderError::EngineCrash(msg),
            EngineError::Failed(msg) => RenderError::Engine(msg),
        }
    }
}
