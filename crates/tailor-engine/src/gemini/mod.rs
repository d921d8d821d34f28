mod wire;

use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use serde_json::Value;

use crate::config::{ApiKey, GeminiSettings};
use crate::error::{truncate_text, EditError};

pub use wire::{
    decode_response, describe_payload, synthesize_payload, GenerateContentResponse,
    ImagePayload, ResponsePart,
};

const ERROR_BODY_MAX_CHARS: usize = 512;

/// Blocking `generateContent` transport shared by the describer and the synthesizer.
///
/// One request per call. Failures are never retried here.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    settings: GeminiSettings,
    api_key: ApiKey,
    http: HttpClient,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings, api_key: ApiKey) -> Self {
        Self {
            settings,
            api_key,
            http: HttpClient::new(),
        }
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    pub fn generate_content(
        &self,
        model: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<GenerateContentResponse, EditError> {
        let endpoint = self.settings.endpoint_for_model(model);
        let label = format!("Gemini {}", model.trim().trim_start_matches("models/"));
        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.expose())])
            .timeout(timeout)
            .json(payload)
            .send()
            .map_err(|source| EditError::Transport {
                endpoint: label.clone(),
                source,
            })?;
        let body = response_body_or_error(&label, response)?;
        decode_response(&body)
    }
}

fn response_body_or_error(label: &str, response: HttpResponse) -> Result<String, EditError> {
    let status = response.status();
    let body = response.text().map_err(|source| EditError::Transport {
        endpoint: label.to_string(),
        source,
    })?;
    if !status.is_success() {
        return Err(EditError::Http {
            endpoint: label.to_string(),
            status: status.as_u16(),
            body: truncate_text(&body, ERROR_BODY_MAX_CHARS),
        });
    }
    Ok(body)
}
