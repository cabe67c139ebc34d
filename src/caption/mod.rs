/// Caption generation module
///
/// This module wraps the pretrained BLIP image-captioning model:
/// - Model loading and the generation loop (engine.rs)
/// - Image decoding and tensor preprocessing (preprocess.rs)
///
/// The engine is constructed once at startup and owned by the application;
/// every failure mode is a typed `CaptionError` so the UI can render it
/// instead of crashing.
use std::path::{Path, PathBuf};

pub mod engine;
pub mod preprocess;

pub use engine::CaptionEngine;

/// Anything that can turn an image file into a caption string.
///
/// The application talks to the generator through this one-method seam,
/// which keeps the caption-request flow testable with a stub generator.
pub trait Captioner {
    fn caption(&mut self, path: &Path) -> Result<String, CaptionError>;
}

/// Failure modes of caption generation
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// Downloading the weights or tokenizer from the model hub failed
    #[error("failed to fetch model assets: {0}")]
    Fetch(#[from] hf_hub::api::sync::ApiError),

    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] tokenizers::Error),

    /// The selected file could not be opened or decoded as an image
    #[error("could not read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Tensor or device failure inside the model
    #[error(transparent)]
    Inference(#[from] candle_core::Error),
}
