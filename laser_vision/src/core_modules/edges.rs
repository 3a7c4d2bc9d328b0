// THEORY:
// Edge extraction turns the Value plane into a thin binary outline of every place
// where brightness changes sharply. A laser dot is a small, very bright disk, so
// its rim shows up as a closed ring in this map. The contour stage then walks those
// rings.
//
// Canny is used because it produces one-pixel-wide, connected edges with hysteresis:
// a pixel above `high` starts an edge, and the edge may continue through pixels
// above `low`. The thresholds are gradient magnitudes, not brightness levels.

use image::GrayImage;

/// Runs Canny on a single-channel plane. Edge pixels are 255, everything else 0.
/// A plane with no pixels has no edges.
pub fn canny_edges(plane: &GrayImage, low: f32, high: f32) -> GrayImage {
    if plane.width() == 0 || plane.height() == 0 {
        return GrayImage::new(plane.width(), plane.height());
    }
    imageproc::edges::canny(plane, low, high)
}
