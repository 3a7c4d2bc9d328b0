// THEORY:
// The `Frame` module is the entry point for raw image data. Cameras hand us a flat,
// interleaved byte buffer whose channel order depends on the capture backend
// (OpenCV delivers BGR, most everything else delivers RGB). A `Frame` normalizes
// that buffer into a single owned RGB image so every later stage can ignore where
// the pixels came from.
//
// Key architectural principles:
// 1.  **Ownership**: A `Frame` owns its pixels outright. It belongs to exactly one
//     loop iteration and is dropped when the next one begins.
// 2.  **Immutability**: Nothing in the engine mutates a `Frame`. Derived images
//     (HSV planes, masks, the annotated copy) are always new buffers.
// 3.  **Validation at the boundary**: The byte-slice constructors are the only
//     place a size mismatch can occur, so they are the only fallible entry points.

use crate::error::{Result, VisionError};
use image::{Rgb, RgbImage};

const CHANNELS: usize = 3;

/// Interleaved channel order of a raw camera buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Bgr,
    Rgb,
}

/// A single color video frame, stored as RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    /// Builds a frame from a tightly packed, interleaved three-channel buffer.
    pub fn from_bytes(width: u32, height: u32, bytes: &[u8], order: ChannelOrder) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if bytes.len() != expected {
            return Err(VisionError::FrameSize {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        let image = RgbImage::from_fn(width, height, |x, y| {
            let i = (y as usize * width as usize + x as usize) * CHANNELS;
            let px = &bytes[i..i + CHANNELS];
            match order {
                ChannelOrder::Rgb => Rgb([px[0], px[1], px[2]]),
                ChannelOrder::Bgr => Rgb([px[2], px[1], px[0]]),
            }
        });
        Ok(Self::from_rgb(image))
    }

    pub fn from_bgr_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(width, height, bytes, ChannelOrder::Bgr)
    }

    /// A uniformly colored frame. Mostly useful for synthetic scenes.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::from_rgb(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// True when the frame has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}
