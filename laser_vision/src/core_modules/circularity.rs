// THEORY:
// Circularity is the shape test that separates a laser dot from everything else
// with a bright rim: window frames, screen edges, reflections on cables.
//
// The score is the isoperimetric ratio `4π·A / P²`. Among all closed curves of a
// given perimeter the disk encloses the most area, so the ratio is 1.0 for a disk
// and falls toward 0 as a shape gets longer or more ragged. A thin 10:1 rectangle
// scores about 0.26; a square about 0.785, just under the default cut of 0.8.
//
// A contour with no perimeter (a lone pixel) has no shape at all and scores 0,
// which always fails the filter.

use crate::core_modules::contour::Contour;
use std::f64::consts::PI;

/// Default minimum score a contour must exceed to count as round.
pub const CIRCULARITY_THRESHOLD: f64 = 0.8;

/// `4π·area / perimeter²`, or 0 when the perimeter is 0.
pub fn circularity_score(area: f64, perimeter: f64) -> f64 {
    if perimeter == 0.0 {
        0.0
    } else {
        4.0 * PI * (area / (perimeter * perimeter))
    }
}

pub fn circularity(contour: &Contour) -> f64 {
    circularity_score(contour.area(), contour.perimeter())
}

/// Keeps the contours whose circularity is strictly greater than `threshold`.
pub fn filter_circular(contours: Vec<Contour>, threshold: f64) -> Vec<Contour> {
    contours
        .into_iter()
        .filter(|c| circularity(c) > threshold)
        .collect()
}
