use std::error::Error as StdError;
use std::fmt;

use tailor_contracts::assets::AssetError;

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} request failed ({status}): {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response: {0}")]
    Payload(String),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse bucket for a failure, reported alongside the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Configuration,
    Transport,
    Payload,
    PostProcessing,
    Asset,
}

impl FailureStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::Payload => "payload",
            Self::PostProcessing => "post_processing",
            Self::Asset => "asset",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EditError {
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Configuration(_) => FailureStage::Configuration,
            Self::Transport { .. } | Self::Http { .. } => FailureStage::Transport,
            Self::Payload(_) | Self::Decode(_) => FailureStage::Payload,
            Self::Encode(_) => FailureStage::PostProcessing,
            Self::Asset(AssetError::MissingAsset { .. }) => FailureStage::Configuration,
            Self::Asset(_) | Self::Io(_) => FailureStage::Asset,
        }
    }

    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload(message.into())
    }

    /// Message with the source chain folded in, for one-line user reports.
    pub fn reason(&self) -> String {
        let mut parts = vec![self.to_string()];
        let mut cause = StdError::source(self);
        while let Some(err) = cause {
            let text = err.to_string();
            if !parts.iter().any(|existing| existing.contains(&text)) {
                parts.push(text);
            }
            cause = StdError::source(err);
        }
        parts.join(" | caused by: ")
    }
}

pub(crate) fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}
