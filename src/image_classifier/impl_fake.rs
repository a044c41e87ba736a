use crate::error::ModelError;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::preprocess::InputTensor;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;

enum Scores {
    Fixed(Vec<f32>),
    Random { nb_classes: usize },
}

/// Stands in for a checkpoint. Emits log-softmax scores like the real network.
pub struct ImageClassifierFake {
    scores: Scores,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(nb_classes: usize, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            scores: Scores::Random { nb_classes },
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }

    /// Always answers with `scores`, as given.
    pub fn with_scores(scores: Vec<f32>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            scores: Scores::Fixed(scores),
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }
}

pub fn log_softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let sum: f32 = logits.iter().map(|x| (x - max).exp()).sum();
    let log_sum = sum.ln() + max;
    logits.iter().map(|x| x - log_sum).collect()
}

impl ImageClassifier for ImageClassifierFake {
    fn forward(&self, input: &InputTensor) -> Result<Vec<f32>, ModelError> {
        let _ = self
            .logger
            .info(&format!("Forward pass on {:?}", input.shape()));

        match &self.scores {
            Scores::Fixed(scores) => Ok(scores.clone()),
            Scores::Random { nb_classes } => {
                let mut rng = rand::rng();
                let logit_dist =
                    Uniform::new(-4.0f32, 4.0).map_err(|e| ModelError::Inference(e.to_string()))?;
                let logits: Vec<f32> = (0..*nb_classes)
                    .map(|_| logit_dist.sample(&mut rng))
                    .collect();
                Ok(log_softmax(&logits))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::image_classifier::preprocess::{frame_to_tensor, Normalization};
    use crate::library::logger::impl_fake::LoggerFake;
    use image::RgbImage;

    fn input() -> InputTensor {
        frame_to_tensor(&Frame::from_rgb_image(RgbImage::new(8, 8)), 4, Normalization::Unit)
    }

    #[test]
    fn test_log_softmax_sums_to_one() {
        let scores = log_softmax(&[1.0, 2.0, 3.0]);
        let total: f32 = scores.iter().map(|s| s.exp()).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(scores.iter().all(|s| *s <= 0.0));
    }

    #[test]
    fn test_random_scores_have_class_width() {
        let classifier = ImageClassifierFake::new(7, Arc::new(LoggerFake::new()));
        let scores = classifier.forward(&input()).unwrap();
        assert_eq!(scores.len(), 7);
    }

    #[test]
    fn test_fixed_scores_are_returned() {
        let classifier = ImageClassifierFake::with_scores(vec![-2.0, -0.1], Arc::new(LoggerFake::new()));
        assert_eq!(classifier.forward(&input()).unwrap(), vec![-2.0, -0.1]);
    }
}
