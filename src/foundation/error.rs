/// Convenience result type used across glyphreel.
pub type GlyphreelResult<T> = Result<T, GlyphreelError>;

/// Top-level error taxonomy. Every variant aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum GlyphreelError {
    /// Invalid configuration, occurrence data, or page geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// The source or a per-target PDF could not be read, edited, or written.
    #[error("document error: {0}")]
    Document(String),

    /// Rasterizing a per-target PDF into page images failed.
    #[error("raster error: {0}")]
    Raster(String),

    /// The external video encoder was missing or exited unsuccessfully.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphreelError {
    /// Build a [`GlyphreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlyphreelError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`GlyphreelError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`GlyphreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

impl From<lopdf::Error> for GlyphreelError {
    fn from(err: lopdf::Error) -> Self {
        Self::Document(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
