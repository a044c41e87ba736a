use crate::frame::Frame;
use image::{imageops, RgbImage};
use std::str::FromStr;

/// How 8-bit samples are mapped to network inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// `x / 255`, what the shipped checkpoints were trained on.
    #[default]
    Unit,
    /// `(x / 255 - 0.5) / 0.5` per channel.
    Symmetric,
}

impl Normalization {
    fn apply(&self, sample: u8) -> f32 {
        let unit = sample as f32 / 255.0;
        match self {
            Normalization::Unit => unit,
            Normalization::Symmetric => (unit - 0.5) / 0.5,
        }
    }
}

impl FromStr for Normalization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unit" | "none" => Ok(Normalization::Unit),
            "symmetric" => Ok(Normalization::Symmetric),
            other => Err(format!("expected `unit` or `symmetric`, got `{other}`")),
        }
    }
}

/// NCHW float input with a batch of one.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    size: u32,
    data: Vec<f32>,
}

impl InputTensor {
    pub fn shape(&self) -> [usize; 4] {
        let side = self.size as usize;
        [1, 3, side, side]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Stretches to `size x size`. No letterboxing, the aspect ratio is not kept.
pub fn resize_square(image: &RgbImage, size: u32) -> RgbImage {
    imageops::resize(image, size, size, imageops::FilterType::Triangle)
}

fn plane_len(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

fn image_to_tensor(image: &RgbImage, normalization: Normalization) -> InputTensor {
    let (width, height) = image.dimensions();
    let plane = plane_len(width, height);
    let mut data = vec![0.0f32; 3 * plane];

    for (x, y, pixel) in image.enumerate_pixels() {
        let offset = y as usize * width as usize + x as usize;
        for c in 0..3 {
            data[c * plane + offset] = normalization.apply(pixel[c]);
        }
    }

    InputTensor {
        size: width,
        data,
    }
}

pub fn frame_to_tensor(frame: &Frame, size: u32, normalization: Normalization) -> InputTensor {
    let rgb = frame.to_rgb_image();
    let resized = resize_square(&rgb, size);
    image_to_tensor(&resized, normalization)
}
