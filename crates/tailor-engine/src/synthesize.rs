use std::io::Cursor;

use image::imageops::FilterType;
use image::ImageFormat;
use tailor_contracts::assets::TEXTURE_SIZE;

use crate::error::EditError;
use crate::gemini::{synthesize_payload, GeminiClient};

/// Model output after validation: always PNG, always `size x size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedTexture {
    pub png: Vec<u8>,
    pub raw_width: u32,
    pub raw_height: u32,
    pub size: u32,
}

impl SynthesizedTexture {
    pub fn resized(&self) -> bool {
        self.raw_width != self.size || self.raw_height != self.size
    }
}

/// Produces a torso-edited texture conditioned on the baseline texture.
///
/// Implementors supply `render`, the raw model call. `synthesize` layers on the
/// dimension guarantee, so every implementation hands back a canonical texture.
pub trait TextureSynthesizer {
    fn render(&self, source_png: &[u8], description: &str) -> Result<Vec<u8>, EditError>;

    fn synthesize(
        &self,
        source_png: &[u8],
        description: &str,
    ) -> Result<SynthesizedTexture, EditError> {
        let raw = self.render(source_png, description)?;
        normalize_texture(&raw, TEXTURE_SIZE)
    }
}

pub fn torso_edit_prompt(description: &str) -> String {
    format!(
        "Generate a new version of this Live2D character texture sheet. \
CRITICAL: Keep the EXACT SAME layout, positions, and style. \
ONLY modify the TORSO clothing area (the shirt/hoodie in the middle). \
Keep ALL other parts COMPLETELY UNCHANGED:\n\
- Hair (top row): KEEP EXACTLY THE SAME\n\
- Face and expressions: KEEP EXACTLY THE SAME\n\
- Arms and hands: KEEP EXACTLY THE SAME\n\
- Legs and shoes: KEEP EXACTLY THE SAME\n\
- Background: white, KEEP THE SAME\n\
- Layout and positions: KEEP EXACTLY THE SAME\n\
\n\
ONLY CHANGE: The torso/clothing in the center to: {description}\n\
\n\
Style requirements:\n\
- 2D cartoon anime style (same as original)\n\
- Clean black outlines (same as original)\n\
- Similar shading style\n\
- Output: {TEXTURE_SIZE}x{TEXTURE_SIZE} pixels"
    )
}

/// Decodes model output and forces it to a `size x size` PNG.
///
/// Off-size images are resampled with Lanczos3. Square PNGs of the right size pass
/// through byte for byte.
pub fn normalize_texture(bytes: &[u8], size: u32) -> Result<SynthesizedTexture, EditError> {
    let format = image::guess_format(bytes)
        .map_err(|err| EditError::Decode(format!("unrecognized image data: {err}")))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|err| EditError::Decode(err.to_string()))?;
    let (raw_width, raw_height) = (decoded.width(), decoded.height());

    if raw_width == size && raw_height == size && format == ImageFormat::Png {
        return Ok(SynthesizedTexture {
            png: bytes.to_vec(),
            raw_width,
            raw_height,
            size,
        });
    }

    let image = if raw_width != size || raw_height != size {
        decoded.resize_exact(size, size, FilterType::Lanczos3)
    } else {
        decoded
    };
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|err| EditError::Encode(err.to_string()))?;
    Ok(SynthesizedTexture {
        png,
        raw_width,
        raw_height,
        size,
    })
}

pub struct GeminiSynthesizer {
    client: GeminiClient,
}

impl GeminiSynthesizer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

impl TextureSynthesizer for GeminiSynthesizer {
    fn render(&self, source_png: &[u8], description: &str) -> Result<Vec<u8>, EditError> {
        let settings = self.client.settings();
        let payload = synthesize_payload(&torso_edit_prompt(description), source_png);
        let response = self.client.generate_content(
            &settings.image_model,
            &payload,
            settings.synthesize_timeout,
        )?;
        response.image_payload()?.decode_bytes()
    }
}
