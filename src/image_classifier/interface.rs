use crate::error::ModelError;
use crate::image_classifier::preprocess::InputTensor;

/// A loaded network: normalized input in, one score per class out.
pub trait ImageClassifier {
    fn forward(&self, input: &InputTensor) -> Result<Vec<f32>, ModelError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub class_index: usize,
    pub class_name: String,
    /// Score of the winning class. The network ends in log-softmax, so this
    /// is a log-probability, not a percentage.
    pub log_probability: f32,
}

impl ClassificationResult {
    pub fn confidence_percent(&self) -> f32 {
        (self.log_probability.exp() * 100.0).clamp(0.0, 100.0)
    }

    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence_percent())
    }
}
