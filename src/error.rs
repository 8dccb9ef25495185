/// Convenience result type used across the presentation engine.
pub type ShowResult<T> = Result<T, ShowError>;

/// Errors surfaced to whoever builds or initializes an engine.
///
/// Nothing in a running frame loop produces these; they are raised at
/// build/init time so a bad configuration never shows up mid-animation.
#[derive(thiserror::Error, Debug)]
pub enum ShowError {
    /// Rejected configuration (empty final lines, zero phase length, empty carousel, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The render surface lacks a capability the engine needs.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShowError {
    /// Build a [`ShowError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ShowError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }
}
