//! Crate error type.

use thiserror::Error;

/// Errors surfaced by canvas-widgets.
///
/// Property-guard failures (read-only edits, out-of-bounds deletes, max-length
/// overflow) are deliberate silent no-ops and never reach this type.
#[derive(Debug, Error)]
pub enum Error {
    /// A color literal that is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[error("invalid color literal: {0:?}")]
    InvalidColor(String),

    /// A property dump that failed to parse as JSON.
    #[error("malformed property dump: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal backend I/O failure.
    #[error("terminal i/o: {0}")]
    Io(#[from] std::io::Error),
}
