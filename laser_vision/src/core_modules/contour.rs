// THEORY:
// The `contour` module turns a binary edge map into a list of closed boundary
// polygons. It is the bridge between pixels and geometry: everything after this
// stage (circularity, enclosing circles) works on point lists, never on images.
//
// Key architectural principles & algorithm steps:
// 1.  **Border Following**: Boundaries are traced with Suzuki-Abe border following
//     (via `imageproc::contours`). Each traced border knows whether it is an outer
//     border or a hole, and which border encloses it.
// 2.  **External Only**: Only outer borders that no other border encloses are kept.
//     The ring that Canny draws around a laser dot therefore yields exactly one
//     contour (its outside), not two.
// 3.  **Chain Compression**: Border following returns every boundary pixel. Runs of
//     pixels that continue in the same horizontal, vertical or diagonal direction are
//     collapsed to their end points. Area and perimeter are unchanged by this, since
//     the dropped points are collinear with their neighbors.
// 4.  **Measures**: Area uses the shoelace formula on the polygon; perimeter is the
//     closed polyline length, including the segment back to the first point.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};

/// An integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A closed boundary polygon found in a binary image.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Unsigned polygon area (shoelace formula).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice_area += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        }
        twice_area.abs() / 2.0
    }

    /// Length of the closed polyline through all points.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                let dx = (b.x - a.x) as f64;
                let dy = (b.y - a.y) as f64;
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }
}

/// Finds the outermost borders of every white region in `edges`.
pub fn find_external_contours(edges: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            let traced: Vec<Point> = c.points.iter().map(|p| Point::new(p.x, p.y)).collect();
            Contour::new(compress_chain(&traced))
        })
        .collect()
}

/// Drops every point that lies in the middle of a straight run.
///
/// The chain is treated as closed: the first point's incoming step comes from the
/// last point.
pub fn compress_chain(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |from: Point, to: Point| (to.x - from.x, to.y - from.y);

    points
        .iter()
        .enumerate()
        .filter(|&(i, &p)| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, p) != step(p, next)
        })
        .map(|(_, &p)| p)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn square(side: i32) -> Contour {
        Contour::new(vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ])
    }

    #[test]
    fn square_area_and_perimeter() {
        let c = square(10);
        assert_eq!(c.area(), 100.0);
        assert_eq!(c.perimeter(), 40.0);
    }

    #[test]
    fn degenerate_contours_measure_zero() {
        let single = Contour::new(vec![Point::new(3, 3)]);
        assert_eq!(single.area(), 0.0);
        assert_eq!(single.perimeter(), 0.0);

        let empty = Contour::new(Vec::new());
        assert_eq!(empty.perimeter(), 0.0);
    }

    #[test]
    fn compression_keeps_only_corners() {
        let mut traced = Vec::new();
        for x in 0..4 {
            traced.push(Point::new(x, 0));
        }
        for y in 0..4 {
            traced.push(Point::new(4, y));
        }
        for x in (1..=4).rev() {
            traced.push(Point::new(x, 4));
        }
        for y in (1..=4).rev() {
            traced.push(Point::new(0, y));
        }
        let compressed = compress_chain(&traced);
        assert_eq!(
            compressed,
            vec![Point::new(0, 0), Point::new(4, 0), Point::new(4, 4), Point::new(0, 4)]
        );
        let before = Contour::new(traced);
        let after = Contour::new(compressed);
        assert_eq!(before.area(), after.area());
        assert!((before.perimeter() - after.perimeter()).abs() < 1e-9);
    }

    #[test]
    fn blank_image_has_no_contours() {
        let edges = GrayImage::new(32, 32);
        assert!(find_external_contours(&edges).is_empty());
    }

    #[test]
    fn hollow_square_yields_only_its_outside() {
        let mut img = GrayImage::new(40, 40);
        draw_filled_rect_mut(&mut img, Rect::at(10, 10).of_size(20, 20), Luma([255]));
        draw_filled_rect_mut(&mut img, Rect::at(12, 12).of_size(16, 16), Luma([0]));
        let contours = find_external_contours(&img);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 4);
    }

    #[test]
    fn nested_regions_report_outermost_only() {
        let mut img = GrayImage::new(60, 60);
        draw_filled_rect_mut(&mut img, Rect::at(5, 5).of_size(50, 50), Luma([255]));
        draw_filled_rect_mut(&mut img, Rect::at(10, 10).of_size(40, 40), Luma([0]));
        draw_filled_rect_mut(&mut img, Rect::at(20, 20).of_size(10, 10), Luma([255]));
        let contours = find_external_contours(&img);
        assert_eq!(contours.len(), 1);
    }
}
