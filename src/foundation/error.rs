pub type NewsreelResult<T> = Result<T, NewsreelError>;

/// Error taxonomy for one render job.
///
/// `AssetUnavailable` is always recoverable (fallback font, silent audio) and
/// only surfaces when no degradation is possible. `ImageUnusable` and
/// `RenderFailed` abort the job for this candidate; the orchestrator is
/// expected to move on to the next one rather than crash the batch.
#[derive(thiserror::Error, Debug)]
pub enum NewsreelError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("asset unavailable: {0}")]
    AssetUnavailable(String),

    #[error("image unusable: {0}")]
    ImageUnusable(String),

    #[error("render failed: {0}")]
    RenderFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NewsreelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset_unavailable(msg: impl Into<String>) -> Self {
        Self::AssetUnavailable(msg.into())
    }

    pub fn image_unusable(msg: impl Into<String>) -> Self {
        Self::ImageUnusable(msg.into())
    }

    pub fn render_failed(msg: impl Into<String>) -> Self {
        Self::RenderFailed(msg.into())
    }
}
