use thiserror::Error;

/// Errors that can occur while turning an image into a plot drawing.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PlotError {
    #[error("failed to decode image: {0}")]
    DecodeUnavailable(String),

    #[error("no drawable lines survived tracing")]
    EmptyGeometry,

    #[error("degenerate geometry bounds: {width} x {height}")]
    DegenerateCanvas { width: f64, height: f64 },

    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
