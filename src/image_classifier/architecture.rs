//! The network topology the checkpoints were trained with.
//!
//! ```text
//! conv(3->6, k5, pad 2) -> relu -> maxpool 2
//! conv(6->16, k5)       -> relu -> maxpool 2
//! fc(16*23*23 -> 120) -> relu -> fc(120 -> 84) -> relu -> fc(84 -> N) -> log_softmax
//! ```
//!
//! The first fully connected layer has a fixed width, so the input side
//! length is part of the trained weights. Changing `input_size` needs a
//! retrained checkpoint.

use crate::error::ModelError;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    LeNet5,
}

impl Architecture {
    pub fn name(&self) -> &'static str {
        match self {
            Architecture::LeNet5 => "lenet5",
        }
    }

    /// Input side length of the published checkpoints.
    pub fn native_input_size(&self) -> u32 {
        match self {
            Architecture::LeNet5 => 100,
        }
    }

    /// Width of the flattened feature map entering the first dense layer,
    /// or `None` when the convolutions leave nothing.
    pub fn flattened_features(&self, input_size: u32) -> Option<usize> {
        match self {
            Architecture::LeNet5 => {
                // conv1 keeps the size (k5, pad 2); conv2 trims 4 (k5, no pad).
                let after_pool1 = input_size / 2;
                let after_conv2 = after_pool1.checked_sub(4).filter(|side| *side > 0)?;
                let after_pool2 = after_conv2 / 2;
                if after_pool2 == 0 {
                    return None;
                }
                Some(16 * after_pool2 as usize * after_pool2 as usize)
            }
        }
    }

    pub fn check_input_size(&self, input_size: u32) -> Result<(), ModelError> {
        let expected = self.native_input_size();
        match self.flattened_features(input_size) {
            Some(features) if Some(features) == self.flattened_features(expected) => Ok(()),
            _ => Err(ModelError::InputSizeMismatch {
                architecture: self.name(),
                configured: input_size,
                expected,
            }),
        }
    }
}

impl FromStr for Architecture {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenet5" | "lenet" | "cnn" => Ok(Architecture::LeNet5),
            _ => Err(ModelError::UnknownArchitecture(s.to_string())),
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenet5_feature_width() {
        assert_eq!(Architecture::LeNet5.flattened_features(100), Some(16 * 23 * 23));
        assert_eq!(Architecture::LeNet5.flattened_features(224), Some(16 * 54 * 54));
        assert_eq!(Architecture::LeNet5.flattened_features(8), None);
    }

    #[test]
    fn test_native_size_is_accepted() {
        // Pooling floors, so 100..=103 all land on a 23x23 feature map.
        for size in 100..=103 {
            assert!(Architecture::LeNet5.check_input_size(size).is_ok());
        }
    }

    #[test]
    fn test_other_sizes_are_rejected() {
        for size in [0, 8, 98, 99, 104, 224] {
            let err = Architecture::LeNet5.check_input_size(size).unwrap_err();
            assert!(matches!(
                err,
                ModelError::InputSizeMismatch {
                    expected: 100,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("LeNet5".parse::<Architecture>().unwrap(), Architecture::LeNet5);
        assert!("vgg16".parse::<Architecture>().is_err());
    }
}
