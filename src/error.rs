//! Sandbox error types.
//!
//! Errors stay inside the crate: the reconciler turns every failure into
//! "the object never appears" and logs it at `debug!` level.  Nothing here is
//! ever surfaced to the page layer.

use thiserror::Error;

/// Top-level error enum for the sandbox.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The SVG resource could not be read.
    #[error("failed to fetch '{url}': {reason}")]
    Fetch {
        /// Url passed to the fetcher.
        url: String,
        /// Underlying I/O or lookup failure.
        reason: String,
    },

    /// The url tried to escape the asset root.
    #[error("asset path '{0}' escapes the asset root")]
    InvalidAssetPath(String),

    /// The document is not well-formed XML.
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    /// The document contains no `<svg>` element.
    #[error("document has no <svg> element")]
    NoSvgRoot,

    /// The `<svg>` element has no usable `<path>` descendants.
    #[error("SVG contains no usable <path> elements")]
    NoPaths,

    /// A `d` attribute could not be parsed.
    #[error("invalid path data: {0}")]
    PathData(String),

    /// Geometry was extracted but no collider can be built from it.
    #[error("shape for '{id}' is degenerate ({rings} usable rings)")]
    DegenerateShape {
        /// Descriptor id the shape belongs to.
        id: String,
        /// Number of rings that survived extraction.
        rings: usize,
    },

    /// `sandbox.toml` could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias: a `Result` using `SandboxError` as the error type.
pub type SandboxResult<T> = Result<T, SandboxError>;
