//! Torso-only texture editing on top of Gemini's understand and generate endpoints.

pub mod config;
pub mod describe;
pub mod error;
pub mod gemini;
pub mod pipeline;
pub mod synthesize;

pub use config::{ApiKey, GeminiSettings};
pub use describe::{ClothingDescriber, GeminiDescriber};
pub use error::{EditError, FailureStage};
pub use gemini::GeminiClient;
pub use pipeline::{Confirm, EditOutcome, EditPipeline, EditRequest, PipelineState};
pub use synthesize::{
    normalize_texture, GeminiSynthesizer, SynthesizedTexture, TextureSynthesizer,
};
