use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::EditError;

fn inline_image_part(mime_type: &str, bytes: &[u8]) -> Value {
    json!({
        "inlineData": {
            "mimeType": mime_type,
            "data": BASE64.encode(bytes),
        }
    })
}

/// Understand request: instruction text, then the uploaded photo declared as JPEG.
pub fn describe_payload(prompt: &str, image_bytes: &[u8]) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "text": prompt },
                inline_image_part("image/jpeg", image_bytes),
            ]
        }]
    })
}

/// Generate request: edit prompt, the PNG conditioning texture, image-only output.
pub fn synthesize_payload(prompt: &str, source_png: &[u8]) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "text": prompt },
                inline_image_part("image/png", source_png),
            ]
        }],
        "generationConfig": {
            "responseModalities": ["IMAGE"],
        }
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// One content part as Gemini may send it. Image data shows up under either
/// `inlineData` (`inline_data` from some proxies) or an `image.base64Data` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponsePart {
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineBlob,
    },
    EmbeddedImage {
        image: EmbeddedImage,
    },
    Text {
        text: String,
    },
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineBlob {
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    #[serde(default, alias = "base64_data")]
    pub base64_data: Option<String>,
}

/// Image bytes still in transport encoding, tagged by the shape they arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    InlineData {
        mime_type: Option<String>,
        data: String,
    },
    EmbeddedBase64 {
        data: String,
    },
}

impl ImagePayload {
    pub fn encoded(&self) -> &str {
        match self {
            Self::InlineData { data, .. } | Self::EmbeddedBase64 { data } => data,
        }
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>, EditError> {
        BASE64
            .decode(self.encoded().trim().as_bytes())
            .map_err(|err| EditError::payload(format!("image base64 decode failed: {err}")))
    }
}

pub fn decode_response(body: &str) -> Result<GenerateContentResponse, EditError> {
    serde_json::from_str(body)
        .map_err(|err| EditError::payload(format!("invalid JSON payload: {err}")))
}

impl GenerateContentResponse {
    fn first_parts(&self) -> Option<&[ResponsePart]> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
    }

    fn missing_candidates(&self) -> EditError {
        match self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            Some(reason) => EditError::payload(format!("prompt blocked: {reason}")),
            None => EditError::payload("no candidates returned"),
        }
    }

    /// Text of the first candidate's first part, if it is a non-blank text part.
    pub fn first_text(&self) -> Option<&str> {
        match self.first_parts()?.first()? {
            ResponsePart::Text { text } if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn description(&self) -> Result<String, EditError> {
        if self.candidates.is_empty() {
            return Err(self.missing_candidates());
        }
        self.first_text()
            .map(str::to_string)
            .ok_or_else(|| EditError::payload("empty description in response"))
    }

    /// First image-bearing part of the first candidate, in either accepted shape.
    pub fn image_payload(&self) -> Result<ImagePayload, EditError> {
        if self.candidates.is_empty() {
            return Err(self.missing_candidates());
        }
        let part = self
            .first_parts()
            .unwrap_or_default()
            .iter()
            .find(|part| {
                matches!(
                    part,
                    ResponsePart::InlineData { .. } | ResponsePart::EmbeddedImage { .. }
                )
            })
            .ok_or_else(|| {
                let reason = self
                    .candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.as_deref())
                    .unwrap_or("none");
                EditError::payload(format!(
                    "missing image content in response (finish reason: {reason})"
                ))
            })?;

        let payload = match part {
            ResponsePart::InlineData { inline_data } => ImagePayload::InlineData {
                mime_type: inline_data.mime_type.clone(),
                data: inline_data.data.clone().unwrap_or_default(),
            },
            ResponsePart::EmbeddedImage { image } => ImagePayload::EmbeddedBase64 {
                data: image.base64_data.clone().unwrap_or_default(),
            },
            ResponsePart::Text { .. } | ResponsePart::Other(_) => {
                return Err(EditError::payload("missing image content in response"))
            }
        };
        if payload.encoded().trim().is_empty() {
            return Err(EditError::payload("image part carries no data"));
        }
        Ok(payload)
    }
}
