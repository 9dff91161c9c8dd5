pub type VoxweaveResult<T> = Result<T, VoxweaveError>;

#[derive(thiserror::Error, Debug)]
pub enum VoxweaveError {
    #[error("validation error: {0}")]
    Validation(String),

    /// Reserved for a stricter tokenizer; the shipped segmenter rejects no input
    /// (malformed directives degrade to literal text).
    #[error("markup error: {0}")]
    Markup(String),

    #[error("render error: {0}")]
    Render(String),

    /// Non-fatal at the session level: composition degrades to voice-only output.
    #[error("missing asset: {0}")]
    AssetMissing(String),

    /// Inner-boundary guard for empty fragment text / empty output names. The
    /// session maps this to a "nothing to do" no-op rather than surfacing it.
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VoxweaveError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn markup(msg: impl Into<String>) -> Self {
        Self::Markup(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn asset_missing(msg: impl Into<String>) -> Self {
        Self::AssetMissing(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}
