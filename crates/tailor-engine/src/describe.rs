use std::fs;
use std::path::Path;

use crate::error::EditError;
use crate::gemini::{describe_payload, GeminiClient};

pub const DESCRIBE_PROMPT: &str = "Please describe the clothing in the image in detail, including:\n\
1. Clothing type (T-shirt, hoodie, jacket, etc.)\n\
2. Main colors and color scheme\n\
3. Patterns or logos (if any)\n\
4. Special design elements (pockets, zippers, hood, etc.)\n\
5. Overall style (casual, sporty, formal, etc.)\n\n\
The description should be concise and clear, suitable for generating 2D cartoon-style \
Live2D character texture maps.";

/// Turns an arbitrary clothing photo into a garment description.
pub trait ClothingDescriber {
    fn describe(&self, image_path: &Path) -> Result<String, EditError>;
}

pub struct GeminiDescriber {
    client: GeminiClient,
}

impl GeminiDescriber {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

impl ClothingDescriber for GeminiDescriber {
    fn describe(&self, image_path: &Path) -> Result<String, EditError> {
        let bytes = fs::read(image_path).map_err(|err| {
            EditError::Io(std::io::Error::new(
                err.kind(),
                format!("failed reading {}: {err}", image_path.display()),
            ))
        })?;
        let settings = self.client.settings();
        let payload = describe_payload(DESCRIBE_PROMPT, &bytes);
        let response =
            self.client
                .generate_content(&settings.vision_model, &payload, settings.describe_timeout)?;
        response.description()
    }
}
