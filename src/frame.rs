use crate::error::CaptureError;
use image::RgbImage;

/// Byte order of the three channels in a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Camera native.
    Bgr,
    Rgb,
}

/// One captured image, height x width x 3 channels of 8-bit samples.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl Frame {
    pub fn from_raw(
        width: u32,
        height: u32,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, CaptureError> {
        if data.len() != width as usize * height as usize * 3 {
            return Err(CaptureError::BufferSize {
                width,
                height,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    pub fn from_rgb_image(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            order: ChannelOrder::Rgb,
            data: image.into_raw(),
        }
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// `(height, width, channels)`, the way the preview status bar reports it.
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.height, self.width, 3)
    }

    /// Copy of the frame in RGB order, swapping channels for BGR sources.
    pub fn to_rgb_image(&self) -> RgbImage {
        let data = match self.order {
            ChannelOrder::Rgb => self.data.clone(),
            ChannelOrder::Bgr => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
        };

        // Length was checked on construction.
        RgbImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgr_frame_is_swapped_to_rgb() {
        let frame = Frame::from_raw(2, 1, ChannelOrder::Bgr, vec![1, 2, 3, 10, 20, 30]).unwrap();
        let rgb = frame.to_rgb_image();
        assert_eq!(rgb.get_pixel(0, 0).0, [3, 2, 1]);
        assert_eq!(rgb.get_pixel(1, 0).0, [30, 20, 10]);
    }

    #[test]
    fn test_rgb_frame_is_unchanged() {
        let frame = Frame::from_raw(1, 1, ChannelOrder::Rgb, vec![7, 8, 9]).unwrap();
        assert_eq!(frame.to_rgb_image().get_pixel(0, 0).0, [7, 8, 9]);
    }

    #[test]
    fn test_buffer_size_is_checked() {
        let err = Frame::from_raw(4, 4, ChannelOrder::Bgr, vec![0; 10]).unwrap_err();
        assert!(matches!(err, CaptureError::BufferSize { actual: 10, .. }));
    }

    #[test]
    fn test_shape_is_height_first() {
        let frame = Frame::from_rgb_image(RgbImage::new(848, 480));
        assert_eq!(frame.shape(), (480, 848, 3));
    }
}
