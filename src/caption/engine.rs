/// BLIP caption engine
///
/// Owns the pretrained model for the lifetime of the process. Construction
/// fetches the tokenizer and weights for a fixed model id from the Hugging
/// Face Hub (served from the local hub cache after the first run), picks a
/// compute device and builds the model. Captioning is strictly synchronous:
/// one image in, one string out.
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::blip::{self, VisionConfig};
use candle_transformers::models::blip_text;
use hf_hub::api::sync::Api;
use std::path::Path;
use tokenizers::Tokenizer;

use super::{preprocess, CaptionError, Captioner};

/// Fixed model identifier on the Hugging Face Hub
const MODEL_ID: &str = "Salesforce/blip-image-captioning-base";

/// Decoder start token ([DEC])
const BOS_TOKEN_ID: u32 = 30522;

/// End-of-caption token ([SEP])
const SEP_TOKEN_ID: u32 = 102;

/// Hard cap on generated tokens per caption
const MAX_TOKENS: usize = 1000;

/// The caption generator, built once at startup and owned by the caller
pub struct CaptionEngine {
    tokenizer: Tokenizer,
    model: blip::BlipForConditionalGeneration,
    logits_processor: LogitsProcessor,
    device: Device,
}

/// BLIP base configuration (matches the pretrained checkpoint)
fn blip_base_config() -> blip::Config {
    let text_config = blip_text::Config {
        vocab_size: 30524,
        hidden_size: 768,
        encoder_hidden_size: 768,
        intermediate_size: 3072,
        projection_dim: 768,
        num_hidden_layers: 12,
        num_attention_heads: 12,
        max_position_embeddings: 512,
        hidden_act: candle_nn::Activation::Gelu,
        layer_norm_eps: 1e-12,
        is_decoder: true,
    };
    let vision_config = VisionConfig {
        hidden_size: 768,
        intermediate_size: 3072,
        projection_dim: 512,
        num_hidden_layers: 12,
        num_attention_heads: 12,
        image_size: 384,
        patch_size: 16,
        hidden_act: candle_nn::Activation::Gelu,
        layer_norm_eps: 1e-5,
    };

    blip::Config {
        text_config,
        vision_config,
        projection_dim: 512,
        image_text_hidden_size: 256,
    }
}

/// Pick an accelerated device when one was compiled in, otherwise the CPU
fn select_device() -> Device {
    #[cfg(feature = "cuda")]
    match Device::cuda_if_available(0) {
        Ok(device) => return device,
        Err(e) => log::warn!("CUDA unavailable, falling back to CPU: {e:?}"),
    }

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => return device,
        Err(e) => log::warn!("Metal unavailable, falling back to CPU: {e:?}"),
    }

    Device::Cpu
}

impl CaptionEngine {
    /// Load the tokenizer and weights and build the model.
    ///
    /// This is the expensive one-time initialization: on the very first run
    /// it downloads the checkpoint from the hub.
    pub fn new() -> Result<Self, CaptionError> {
        let device = select_device();
        log::info!("loading {} on {}", MODEL_ID, device_label(&device));

        let api = Api::new()?;
        let repo = api.model(MODEL_ID.to_string());
        let tokenizer_file = repo.get("tokenizer.json")?;
        let weights_file = repo.get("model.safetensors")?;

        let tokenizer = Tokenizer::from_file(tokenizer_file)?;

        let config = blip_base_config();
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_file], candle_core::DType::F32, &device)?
        };
        let model = blip::BlipForConditionalGeneration::new(&config, vb)?;

        // Argmax sampling: the same image always captions the same way
        let logits_processor = LogitsProcessor::new(1337, None, None);

        log::info!("model ready");

        Ok(Self {
            tokenizer,
            model,
            logits_processor,
            device,
        })
    }

    /// Human-readable name of the compute device, for the status line
    pub fn device_label(&self) -> &'static str {
        device_label(&self.device)
    }

    fn generate(&mut self, path: &Path) -> Result<String, CaptionError> {
        log::debug!("generating caption for {}", path.display());

        let image = preprocess::load_image(path)?.to_device(&self.device)?;
        let image_embeds = image.unsqueeze(0)?.apply(self.model.vision_model())?;

        let mut token_ids = vec![BOS_TOKEN_ID];

        // Each caption starts a fresh decode over the same model instance
        self.model.text_decoder().reset_kv_cache();

        for index in 0..MAX_TOKENS {
            let context_size = if index > 0 { 1 } else { token_ids.len() };
            let start_pos = token_ids.len().saturating_sub(context_size);
            let input_ids = Tensor::new(&token_ids[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = self.model.text_decoder().forward(&input_ids, &image_embeds)?;
            let logits = logits.squeeze(0)?;
            let logits = logits.get(logits.dim(0)? - 1)?;

            let token = self.logits_processor.sample(&logits)?;
            if token == SEP_TOKEN_ID {
                break;
            }
            token_ids.push(token);
        }

        let caption = self.tokenizer.decode(&token_ids, true)?;
        Ok(caption.trim().to_string())
    }
}

impl Captioner for CaptionEngine {
    fn caption(&mut self, path: &Path) -> Result<String, CaptionError> {
        self.generate(path)
    }
}

fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "CPU",
        Device::Cuda(_) => "CUDA",
        Device::Metal(_) => "Metal",
    }
}
