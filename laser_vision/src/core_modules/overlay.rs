// THEORY:
// The overlay stage is the only place the engine draws. It takes a copy of the
// input frame and rings every detected dot so an operator can see at a glance what
// the detector picked up. The original frame is never touched.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

/// Green, the color every detection is ringed with by default.
pub const CIRCLE_COLOR: [u8; 3] = [0, 255, 0];

/// Draws an unfilled circle of the given stroke thickness, clipped to the canvas.
pub fn draw_ring(canvas: &mut RgbImage, center: (i32, i32), radius: i32, thickness: u32, color: [u8; 3]) {
    if thickness <= 1 {
        draw_hollow_circle_mut(canvas, center, radius, Rgb(color));
        return;
    }

    let half = thickness as f64 / 2.0;
    let reach = radius + thickness as i32;
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);

    for y in (center.1 - reach).max(0)..(center.1 + reach + 1).min(h) {
        for x in (center.0 - reach).max(0)..(center.0 + reach + 1).min(w) {
            let dx = (x - center.0) as f64;
            let dy = (y - center.1) as f64;
            let d = (dx * dx + dy * dy).sqrt();
            if (d - radius as f64).abs() <= half {
                canvas.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_hollow_and_colored() {
        let mut canvas = RgbImage::new(100, 100);
        draw_ring(&mut canvas, (50, 50), 20, 2, CIRCLE_COLOR);
        assert_eq!(canvas.get_pixel(70, 50).0, CIRCLE_COLOR);
        assert_eq!(canvas.get_pixel(50, 30).0, CIRCLE_COLOR);
        assert_eq!(canvas.get_pixel(50, 50).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(95, 95).0, [0, 0, 0]);
    }

    #[test]
    fn ring_is_clipped_at_the_border() {
        let mut canvas = RgbImage::new(20, 20);
        draw_ring(&mut canvas, (0, 0), 10, 2, CIRCLE_COLOR);
        assert_eq!(canvas.get_pixel(10, 0).0, CIRCLE_COLOR);
    }

    #[test]
    fn thin_ring_uses_single_pixel_stroke() {
        let mut canvas = RgbImage::new(40, 40);
        draw_ring(&mut canvas, (20, 20), 10, 1, CIRCLE_COLOR);
        assert_eq!(canvas.get_pixel(30, 20).0, CIRCLE_COLOR);
        assert_eq!(canvas.get_pixel(31, 20).0, [0, 0, 0]);
    }
}
