//! Renderer error type and session-buffer allocation.

use std::collections::TryReserveError;

use gi_core::PlyError;
use thiserror::Error;

/// Errors that can occur while setting up or running a render session.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: usize, height: usize },

    #[error("Failed to allocate {what} ({count} elements): {source}")]
    Allocation {
        what: &'static str,
        count: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Mesh import failed: {0}")]
    Mesh(#[from] PlyError),

    #[error("Frame delivery failed: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Number of pixels for a resolution, rejecting empty or overflowing sizes.
pub(crate) fn pixel_count(width: usize, height: usize) -> RenderResult<usize> {
    match width.checked_mul(height) {
        Some(count) if count > 0 => Ok(count),
        _ => Err(RenderError::InvalidResolution { width, height }),
    }
}

/// Allocate a session buffer of `count` copies of `value` up front.
///
/// Allocation failure is reported instead of aborting the process.
pub(crate) fn allocate<T: Clone>(what: &'static str, count: usize, value: T) -> RenderResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(count)
        .map_err(|source| RenderError::Allocation { what, count, source })?;
    buffer.resize(count, value);
    Ok(buffer)
}
