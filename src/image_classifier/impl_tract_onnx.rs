use crate::error::ModelError;
use crate::image_classifier::architecture::Architecture;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::preprocess::InputTensor;
use crate::library::logger::interface::Logger;
use std::path::PathBuf;
use std::sync::Arc;
use tract_onnx::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub checkpoint_path: PathBuf,
    pub architecture: Architecture,
    pub input_size: u32,
    pub nb_classes: Option<usize>,
}

/// Runs an ONNX export of the trained network on the CPU.
pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    config: ModelConfig,
}

impl ImageClassifierTractOnnx {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ModelError> {
        let logger = logger.with_namespace("model");

        config.architecture.check_input_size(config.input_size)?;

        let side = config.input_size as usize;
        let load_error = |e: TractError| ModelError::Load {
            path: config.checkpoint_path.clone(),
            message: e.to_string(),
        };

        let model = tract_onnx::onnx()
            .model_for_path(&config.checkpoint_path)
            .map_err(load_error)?
            .with_input_fact(0, f32::fact([1, 3, side, side]).into())
            .map_err(load_error)?
            .into_optimized()
            .map_err(load_error)?
            .into_runnable()
            .map_err(load_error)?;

        logger.info(&format!(
            "Loaded {} checkpoint {} for {}x{} input",
            config.architecture,
            config.checkpoint_path.display(),
            side,
            side
        ))?;

        Ok(Self { model, config })
    }
}

/// Copies the NCHW input into a tract tensor of the same shape.
fn to_tract_tensor(input: &InputTensor) -> Result<Tensor, ModelError> {
    let array = tract_ndarray::Array4::from_shape_vec(input.shape(), input.as_slice().to_vec())
        .map_err(|e| ModelError::Inference(e.to_string()))?;
    Ok(array.into())
}

/// Flattens the first network output into one score per class.
fn scores_from_output(output: &Tensor, nb_classes: Option<usize>) -> Result<Vec<f32>, ModelError> {
    let scores: Vec<f32> = output
        .to_array_view::<f32>()
        .map_err(|e| ModelError::Inference(e.to_string()))?
        .iter()
        .copied()
        .collect();

    if scores.is_empty() {
        return Err(ModelError::EmptyOutput);
    }

    match nb_classes {
        Some(expected) if scores.len() != expected => Err(ModelError::OutputWidthMismatch {
            expected,
            actual: scores.len(),
        }),
        _ => Ok(scores),
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn forward(&self, input: &InputTensor) -> Result<Vec<f32>, ModelError> {
        let tensor = to_tract_tensor(input)?;

        let outputs = self
            .model
            .run(tvec!(tensor.into_tvalue()))
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let output = outputs.first().ok_or(ModelError::EmptyOutput)?;
        scores_from_output(output, self.config.nb_classes)
    }
}
