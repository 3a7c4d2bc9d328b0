// THEORY:
// The minimal enclosing circle is the final geometric fit: given the points of a
// round contour, find the smallest circle that contains all of them. For a laser
// dot this is the circle drawn on screen.
//
// The algorithm is Welzl's incremental construction in its iterative form. Points
// are added one at a time; whenever a point falls outside the current circle, the
// circle is rebuilt with that point on its boundary, which in turn may force a
// second and a third boundary point. The points are visited in their given order
// (no shuffling), so the result is fully deterministic for identical input. The
// expected-linear-time guarantee of the randomized version is given up; contour
// point lists are short after chain compression, so this does not matter here.

use crate::core_modules::contour::Point;

const EPSILON: f64 = 1e-7;

/// A circle in continuous image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
}

impl Circle {
    fn from_point(p: (f64, f64)) -> Self {
        Self {
            center: p,
            radius: 0.0,
        }
    }

    fn from_diameter(a: (f64, f64), b: (f64, f64)) -> Self {
        let center = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        Self {
            center,
            radius: distance(center, a),
        }
    }

    /// Circumcircle of a triangle. Collinear points fall back to the widest pair.
    fn from_triangle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let (bx, by) = (b.0 - a.0, b.1 - a.1);
        let (cx, cy) = (c.0 - a.0, c.1 - a.1);
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < EPSILON {
            let candidates = [
                Circle::from_diameter(a, b),
                Circle::from_diameter(a, c),
                Circle::from_diameter(b, c),
            ];
            return candidates
                .into_iter()
                .fold(Circle::from_point(a), |best, cand| {
                    if cand.radius > best.radius { cand } else { best }
                });
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        let center = (a.0 + ux, a.1 + uy);
        Self {
            center,
            radius: distance(center, a),
        }
    }

    pub fn contains(&self, p: (f64, f64)) -> bool {
        distance(self.center, p) <= self.radius + EPSILON
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Smallest circle containing every point. `None` for an empty point list.
pub fn min_enclosing_circle(points: &[Point]) -> Option<Circle> {
    let pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let first = *pts.first()?;

    let mut circle = Circle::from_point(first);
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::from_point(pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_diameter(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::from_triangle(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    Some(circle)
}
