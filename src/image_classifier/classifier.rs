use crate::catalog::ClassRegistry;
use crate::error::{ClassifyError, ModelError};
use crate::frame::Frame;
use crate::image_classifier::interface::{ClassificationResult, ImageClassifier};
use crate::image_classifier::preprocess::{frame_to_tensor, Normalization};
use crate::library::logger::interface::Logger;
use std::sync::Arc;

/// Index and score of the highest entry. First wins on ties, NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((index, score)),
        })
}

/// Frame in, dish name out: preprocessing, forward pass, arg-max and the
/// class name lookup.
pub struct Classifier {
    model: Box<dyn ImageClassifier>,
    registry: ClassRegistry,
    input_size: u32,
    normalization: Normalization,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Classifier {
    pub fn new(
        model: Box<dyn ImageClassifier>,
        registry: ClassRegistry,
        input_size: u32,
        normalization: Normalization,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            model,
            registry,
            input_size,
            normalization,
            logger: logger.with_namespace("classifier"),
        }
    }

    pub fn classify(&self, frame: &Frame) -> Result<ClassificationResult, ClassifyError> {
        let input = frame_to_tensor(frame, self.input_size, self.normalization);
        let scores = self.model.forward(&input)?;
        let (class_index, log_probability) = argmax(&scores).ok_or(ModelError::EmptyOutput)?;
        let class_name = self.registry.name_of(class_index)?.to_string();

        self.logger.info(&format!(
            "Class name: {} index: {} log-probability: {:.4}",
            class_name, class_index, log_probability
        ))?;

        Ok(ClassificationResult {
            class_index,
            class_name,
            log_probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::image_classifier::impl_fake::ImageClassifierFake;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::RgbImage;

    const CLASSES: &str = "rice 0\nnoodles 1\nmapo_tofu 2\nkungpao_chicken 3\n";

    fn classifier(scores: Vec<f32>) -> Classifier {
        let logger = Arc::new(LoggerFake::new());
        Classifier::new(
            Box::new(ImageClassifierFake::with_scores(scores, logger.clone())),
            ClassRegistry::parse(CLASSES).unwrap(),
            100,
            Normalization::Unit,
            logger,
        )
    }

    fn frame() -> Frame {
        Frame::from_rgb_image(RgbImage::new(848, 480))
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[-3.0, -0.2, -1.0]), Some((1, -0.2)));
        assert_eq!(argmax(&[-1.0, -1.0]), Some((0, -1.0)));
        assert_eq!(argmax(&[f32::NAN, -5.0]), Some((1, -5.0)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_argmax_index_maps_to_registered_name() {
        let result = classifier(vec![-4.0, -3.0, -2.5, -0.1]).classify(&frame()).unwrap();
        assert_eq!(result.class_index, 3);
        assert_eq!(result.class_name, "kungpao_chicken");
        assert_eq!(result.log_probability, -0.1);
    }

    #[test]
    fn test_names_come_from_the_registry() {
        let registry = ClassRegistry::parse(CLASSES).unwrap();
        for winner in 0..4 {
            let mut scores = vec![-9.0; 4];
            scores[winner] = -0.5;
            let result = classifier(scores).classify(&frame()).unwrap();
            assert!(registry.names().any(|name| name == result.class_name));
        }
    }

    #[test]
    fn test_unregistered_index_is_lookup_error() {
        let err = classifier(vec![-9.0, -9.0, -9.0, -9.0, -0.01])
            .classify(&frame())
            .unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::Lookup(LookupError::UnknownClassIndex(4))
        ));
    }

    #[test]
    fn test_empty_scores_is_model_error() {
        let err = classifier(vec![]).classify(&frame()).unwrap_err();
        assert!(matches!(err, ClassifyError::Model(ModelError::EmptyOutput)));
    }
}
