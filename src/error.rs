//! Error types for lens geometry construction

use thiserror::Error;

/// Fatal construction errors. Every kind aborts the current document at the
/// offending call; the computation is deterministic, so there is nothing to
/// retry.
#[derive(Debug, Error)]
pub enum LensError {
    /// A degenerate drawing request: zero-length line, arc with no stored
    /// travel direction, non-positive arc radius, divergent miter corner, or
    /// a mirror index outside the document.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The requested arc would span 360 degrees or more.
    #[error("unsupported arc: {0}")]
    UnsupportedArc(String),

    /// The electrode and ring point streams no longer align one-to-one.
    #[error("geometry inconsistency: {0}")]
    GeometryInconsistency(String),
}
