// THEORY:
// The `masks` module is the color half of the detector. Where the contour branch
// asks "what is round?", this branch asks "what is bright and red?". Every function
// here maps single-channel planes to binary masks (0 or 255) and is stateless.
//
// Key architectural principles & algorithm steps:
// 1.  **Brightness Gate**: A laser saturates the sensor, so the Value plane is cut at
//     a user-tunable level. Anything dimmer than the threshold is discarded.
// 2.  **Red Hue Band**: Red straddles the 0/180 seam of the hue circle, so the red
//     mask is the union of two bands: `[lower, upper]` near zero and
//     `[upper + offset, 180]` near the seam. The second band is derived from the
//     first with a fixed offset rather than mirrored around zero; an upper bound
//     above `180 - offset` makes the seam band empty.
// 3.  **Boolean Algebra**: Bands are combined with a true OR and the two gates with
//     a true AND. Adding 8-bit masks would saturate or wrap where bands touch.
// 4.  **Cleanup**: One erosion then one dilation with a 3x3 square (an opening)
//     removes isolated sensor speckle while roughly preserving the size of real
//     blobs.

pub mod masks {
    use crate::core_modules::hsv::HUE_MAX;
    use image::{GrayImage, Luma};
    use imageproc::distance_transform::Norm;
    use imageproc::morphology;

    pub const MASK_ON: u8 = 255;
    pub const MASK_OFF: u8 = 0;

    /// `255` where the plane is at or above `threshold`, `0` elsewhere.
    pub fn threshold_binary(plane: &GrayImage, threshold: u8) -> GrayImage {
        map_plane(plane, |v| v >= threshold)
    }

    /// `255` where `lower <= value <= upper`. An inverted range selects nothing.
    pub fn in_range(plane: &GrayImage, lower: i32, upper: i32) -> GrayImage {
        map_plane(plane, |v| {
            let v = v as i32;
            lower <= v && v <= upper
        })
    }

    /// The two-band red mask over a hue plane.
    pub fn red_hue_mask(hue: &GrayImage, lower: i32, upper: i32, wrap_offset: i32) -> GrayImage {
        let low_band = in_range(hue, lower, upper);
        let seam_band = in_range(hue, upper + wrap_offset, HUE_MAX);
        union(&low_band, &seam_band)
    }

    pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
        combine(a, b, |x, y| x || y)
    }

    pub fn intersection(a: &GrayImage, b: &GrayImage) -> GrayImage {
        combine(a, b, |x, y| x && y)
    }

    /// Repeated 3x3 erosion. Zero iterations returns a copy.
    pub fn erode(mask: &GrayImage, iterations: u32) -> GrayImage {
        (0..iterations).fold(mask.clone(), |m, _| morphology::erode(&m, Norm::LInf, 1))
    }

    /// Repeated 3x3 dilation. Zero iterations returns a copy.
    pub fn dilate(mask: &GrayImage, iterations: u32) -> GrayImage {
        (0..iterations).fold(mask.clone(), |m, _| morphology::dilate(&m, Norm::LInf, 1))
    }

    pub fn count_set(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p[0] != MASK_OFF).count()
    }

    fn map_plane(plane: &GrayImage, keep: impl Fn(u8) -> bool) -> GrayImage {
        let mut out = GrayImage::new(plane.width(), plane.height());
        for (dst, src) in out.pixels_mut().zip(plane.pixels()) {
            *dst = Luma([if keep(src[0]) { MASK_ON } else { MASK_OFF }]);
        }
        out
    }

    fn combine(a: &GrayImage, b: &GrayImage, op: impl Fn(bool, bool) -> bool) -> GrayImage {
        debug_assert_eq!(a.dimensions(), b.dimensions());
        let mut out = GrayImage::new(a.width(), a.height());
        for ((dst, pa), pb) in out.pixels_mut().zip(a.pixels()).zip(b.pixels()) {
            let on = op(pa[0] != MASK_OFF, pb[0] != MASK_OFF);
            *dst = Luma([if on { MASK_ON } else { MASK_OFF }]);
        }
        out
    }
}
