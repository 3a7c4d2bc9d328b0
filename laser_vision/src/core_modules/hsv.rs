// THEORY:
// The `hsv` module performs the first stage of the detection pipeline: moving a
// frame out of RGB and into Hue/Saturation/Value, then splitting it into three
// single-channel planes.
//
// A laser dot is two things at once: it is the brightest spot in the scene, and it
// is red. RGB mixes those two facts together in every channel. HSV separates them:
// brightness lives entirely in V, color identity lives entirely in H. The rest of
// the pipeline reads V for edges and brightness, and H for the red band.
//
// The encoding follows the 8-bit convention used by OpenCV so that thresholds tuned
// on one tool carry over to the other:
// - V = max(R, G, B)
// - S = round(255 * (V - min) / V), 0 for black
// - H = hue in degrees / 2, so the full circle fits in a byte as [0, 180)
// - achromatic pixels (V == min) get H = 0
//
// Key principles:
// 1) Pure per-pixel math: no neighbors, no history.
// 2) Integer arithmetic with round-half-up, so the output is bit-stable.

use crate::core_modules::frame::Frame;
use image::{GrayImage, Luma};

/// Size of the 8-bit hue circle, in half-degrees. Also the top of every hue range
/// a caller may configure.
pub const HUE_MAX: i32 = 180;

/// The three single-channel planes of an HSV frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvPlanes {
    pub hue: GrayImage,
    pub saturation: GrayImage,
    pub value: GrayImage,
}

/// Converts one RGB pixel to 8-bit `[h, s, v]`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0 { 0 } else { (diff * 255 + v / 2) / v };

    let h = if diff == 0 {
        0
    } else {
        // Sector offsets are expressed in units of `diff`; 30 half-degrees per unit.
        let sector = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let rounded = (2 * 30 * sector + diff).div_euclid(2 * diff);
        if rounded < 0 { rounded + HUE_MAX } else { rounded }
    };

    [h as u8, s as u8, v as u8]
}

/// Converts a frame to HSV and splits it into its three planes.
pub fn split_hsv(frame: &Frame) -> HsvPlanes {
    let (width, height) = (frame.width(), frame.height());
    let mut hue = GrayImage::new(width, height);
    let mut saturation = GrayImage::new(width, height);
    let mut value = GrayImage::new(width, height);

    for (x, y, px) in frame.image().enumerate_pixels() {
        let [h, s, v] = rgb_to_hsv(px[0], px[1], px[2]);
        hue.put_pixel(x, y, Luma([h]));
        saturation.put_pixel(x, y, Luma([s]));
        value.put_pixel(x, y, Luma([v]));
    }

    HsvPlanes {
        hue,
        saturation,
        value,
    }
}
