use anyhow::{Context, Result, anyhow, bail};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::vit;
use hf_hub::{Repo, RepoType, api::sync::Api};
use std::path::PathBuf;

use super::Classifier;
use crate::config::ModelSource;
use crate::constants::IMAGE_SIZE;

const CONFIG_FILE: &str = "config.json";
const WEIGHTS_FILE: &str = "model.safetensors";

// Single logit head; the score is its sigmoid.
const NUM_LABELS: usize = 1;

/// Binary ViT classifier loaded from safetensors weights
pub struct VitClassifier {
    model: vit::Model,
    device: Device,
}

impl VitClassifier {
    /// Blocking: may download weights and maps them into memory.
    pub fn load(source: &ModelSource) -> Result<Self> {
        #[cfg(feature = "metal")]
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);
        #[cfg(not(feature = "metal"))]
        let device = Device::Cpu;

        log::info!("Loading classifier from {:?} on {:?}", source, device);

        let (config_path, weights_path) = resolve_files(source)?;

        let config: vit::Config = serde_json::from_str(
            &std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?,
        )
        .with_context(|| format!("parsing {}", config_path.display()))?;

        // The weights file must stay unchanged while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? };
        let model = vit::Model::new(&config, NUM_LABELS, vb)?;

        Ok(Self { model, device })
    }
}

fn resolve_files(source: &ModelSource) -> Result<(PathBuf, PathBuf)> {
    match source {
        ModelSource::LocalDir(dir) => {
            let config_path = dir.join(CONFIG_FILE);
            let weights_path = dir.join(WEIGHTS_FILE);
            for path in [&config_path, &weights_path] {
                if !path.is_file() {
                    bail!("model file not found: {}", path.display());
                }
            }
            Ok((config_path, weights_path))
        }
        ModelSource::HubRepo(repo_id) => {
            let api = Api::new()?;
            let repo = api.repo(Repo::new(repo_id.clone(), RepoType::Model));
            Ok((repo.get(CONFIG_FILE)?, repo.get(WEIGHTS_FILE)?))
        }
    }
}

impl Classifier for VitClassifier {
    fn score(&self, input: &Tensor) -> Result<f32> {
        let expected = [1, IMAGE_SIZE, IMAGE_SIZE, 3];
        if input.dims() != expected.as_slice() {
            bail!("expected input shape {:?}, got {:?}", expected, input.dims());
        }

        // ViT takes NCHW
        let pixels = input
            .permute((0, 3, 1, 2))?
            .contiguous()?
            .to_device(&self.device)?;

        let logits = self.model.forward(&pixels)?;
        let probs = candle_nn::ops::sigmoid(&logits)?;

        probs
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| anyhow!("classifier produced no output"))
    }
}
