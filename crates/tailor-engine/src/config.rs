use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::EditError;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DESCRIBE_TIMEOUT: Duration = Duration::from_secs(60);
pub const SYNTHESIZE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_base: String,
    pub vision_model: String,
    pub image_model: String,
    pub describe_timeout: Duration,
    pub synthesize_timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            describe_timeout: DESCRIBE_TIMEOUT,
            synthesize_timeout: SYNTHESIZE_TIMEOUT,
        }
    }
}

impl GeminiSettings {
    /// Defaults overridden by `GEMINI_API_BASE`, `TAILOR_VISION_MODEL` and
    /// `TAILOR_IMAGE_MODEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();
        Self {
            api_base: read("GEMINI_API_BASE")
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            vision_model: read("TAILOR_VISION_MODEL").unwrap_or(defaults.vision_model),
            image_model: read("TAILOR_IMAGE_MODEL").unwrap_or(defaults.image_model),
            ..defaults
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

/// Gemini credential, read once per process.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Result<Self, EditError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(EditError::Configuration("API key is empty".to_string()));
        }
        Ok(Self(value))
    }

    /// `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self, EditError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EditError> {
        ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .into_iter()
            .filter_map(|key| lookup(key))
            .find_map(|value| Self::new(value).ok())
            .ok_or_else(|| {
                EditError::Configuration(
                    "GEMINI_API_KEY not set (export GEMINI_API_KEY='your_gemini_api_key')"
                        .to_string(),
                )
            })
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
