// THEORY:
// The `pipeline` module is the top-level API of the detection engine. It wraps the
// per-stage primitives of `core_modules` into a single call: one frame and the
// current user parameters in, one `Detection` out.
//
// The pipeline is a pure function of its inputs. It keeps no memory between frames,
// so running it twice on the same frame with the same parameters gives the same
// result, and a caller may share one `DetectionPipeline` across any number of
// frames.
//
// Two independent branches run on every frame:
// - Shape branch (Value plane): Canny edges -> external contours -> circularity
//   filter -> minimal enclosing circles. This branch produces the circles.
// - Color branch (Hue and Value planes): brightness gate AND red hue band ->
//   erosion -> dilation. This branch produces `laser_mask`.
//
// Under the default `MaskPolicy::Ignore` the color branch is computed and reported
// but never used to veto a circle. `MaskPolicy::RequireOverlap` joins the branches.

use crate::core_modules::circularity::{CIRCULARITY_THRESHOLD, filter_circular};
use crate::core_modules::contour::{Contour, find_external_contours};
use crate::core_modules::edges::canny_edges;
use crate::core_modules::enclosing_circle::min_enclosing_circle;
use crate::core_modules::frame::Frame;
use crate::core_modules::hsv::{HsvPlanes, split_hsv};
use crate::core_modules::masks::masks;
use crate::core_modules::overlay::{CIRCLE_COLOR, draw_ring};
use image::{GrayImage, RgbImage};
use tracing::debug;

pub use crate::core_modules::hsv::HUE_MAX;

pub const BRIGHTNESS_MAX: i32 = 255;

pub const DEFAULT_BRIGHTNESS_THRESHOLD: i32 = 210;
pub const DEFAULT_RED_LOWER_THRESHOLD: i32 = 10;
pub const DEFAULT_RED_UPPER_THRESHOLD: i32 = 20;

pub const CANNY_LOW: f32 = 50.0;
pub const CANNY_HIGH: f32 = 150.0;
pub const HUE_WRAP_OFFSET: i32 = 160;

/// The three live, user-tunable detection parameters.
///
/// Every setter clamps into the control's range, so a `ParameterSet` is always in
/// range no matter what the control surface sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSet {
    brightness_threshold: i32,
    red_lower_threshold: i32,
    red_upper_threshold: i32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            brightness_threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            red_lower_threshold: DEFAULT_RED_LOWER_THRESHOLD,
            red_upper_threshold: DEFAULT_RED_UPPER_THRESHOLD,
        }
    }
}

impl ParameterSet {
    pub fn new(brightness_threshold: i32, red_lower_threshold: i32, red_upper_threshold: i32) -> Self {
        let mut params = Self::default();
        params.set_brightness_threshold(brightness_threshold);
        params.set_red_lower_threshold(red_lower_threshold);
        params.set_red_upper_threshold(red_upper_threshold);
        params
    }

    pub fn brightness_threshold(&self) -> i32 {
        self.brightness_threshold
    }

    pub fn red_lower_threshold(&self) -> i32 {
        self.red_lower_threshold
    }

    pub fn red_upper_threshold(&self) -> i32 {
        self.red_upper_threshold
    }

    pub fn set_brightness_threshold(&mut self, value: i32) {
        self.brightness_threshold = value.clamp(0, BRIGHTNESS_MAX);
    }

    pub fn set_red_lower_threshold(&mut self, value: i32) {
        self.red_lower_threshold = value.clamp(0, HUE_MAX);
    }

    pub fn set_red_upper_threshold(&mut self, value: i32) {
        self.red_upper_threshold = value.clamp(0, HUE_MAX);
    }
}

/// How the color mask relates to the circles returned by the shape branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskPolicy {
    /// Circles come from the shape branch alone; the mask is diagnostic only.
    #[default]
    Ignore,
    /// A circle is kept only if the cleaned mask has a set pixel inside it.
    RequireOverlap,
}

/// Fixed design constants of the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Canny hysteresis thresholds (gradient magnitude) on the Value plane.
    pub canny_low: f32,
    pub canny_high: f32,
    /// A contour must score strictly above this to count as round.
    pub circularity_threshold: f64,
    /// The seam band of the red mask starts at `red_upper_threshold + hue_wrap_offset`.
    /// Reproduced literally: large upper thresholds push the band past 180 and empty it.
    pub hue_wrap_offset: i32,
    pub erode_iterations: u32,
    pub dilate_iterations: u32,
    pub circle_color: [u8; 3],
    pub circle_thickness: u32,
    pub mask_policy: MaskPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            canny_low: CANNY_LOW,
            canny_high: CANNY_HIGH,
            circularity_threshold: CIRCULARITY_THRESHOLD,
            hue_wrap_offset: HUE_WRAP_OFFSET,
            erode_iterations: 1,
            dilate_iterations: 1,
            circle_color: CIRCLE_COLOR,
            circle_thickness: 2,
            mask_policy: MaskPolicy::Ignore,
        }
    }
}

/// A round contour's minimal enclosing circle, truncated to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedCircle {
    pub center: (i32, i32),
    pub radius: i32,
}

/// Everything the pipeline produces for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub circles: Vec<DetectedCircle>,
    /// Canny edge map of the Value plane.
    pub edges: GrayImage,
    /// Copy of the input frame with every circle drawn on it.
    pub annotated: RgbImage,
    /// Bright-and-red mask after erosion and dilation.
    pub laser_mask: GrayImage,
}

impl Detection {
    /// The result for a frame with no pixels: no circles and blank maps of its size.
    fn empty(frame: &Frame) -> Self {
        let (width, height) = (frame.width(), frame.height());
        Self {
            circles: Vec::new(),
            edges: GrayImage::new(width, height),
            annotated: frame.image().clone(),
            laser_mask: GrayImage::new(width, height),
        }
    }
}

/// The main, top-level struct for the detection engine.
#[derive(Debug, Clone, Default)]
pub struct DetectionPipeline {
    config: DetectorConfig,
}

impl DetectionPipeline {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn detect(&self, frame: &Frame, params: &ParameterSet) -> Detection {
        if frame.is_empty() {
            debug!(width = frame.width(), height = frame.height(), "empty frame skipped");
            return Detection::empty(frame);
        }

        // Stage 1: Color-space conversion
        let planes = split_hsv(frame);

        // Stage 2: Edges and round contours (shape branch)
        let edges = canny_edges(&planes.value, self.config.canny_low, self.config.canny_high);
        let round = self.round_contours(&edges);

        // Stage 3: Bright-and-red mask (color branch)
        let laser_mask = self.laser_mask(&planes, params);

        // Stage 4: Result assembly
        let mut circles: Vec<DetectedCircle> = round
            .iter()
            .filter_map(|c| min_enclosing_circle(&c.points))
            .map(|c| DetectedCircle {
                center: (c.center.0 as i32, c.center.1 as i32),
                radius: c.radius as i32,
            })
            .collect();

        if self.config.mask_policy == MaskPolicy::RequireOverlap {
            circles.retain(|c| mask_overlaps(&laser_mask, c));
        }

        let mut annotated = frame.image().clone();
        for c in &circles {
            draw_ring(
                &mut annotated,
                c.center,
                c.radius,
                self.config.circle_thickness,
                self.config.circle_color,
            );
        }

        debug!(
            contours = round.len(),
            circles = circles.len(),
            mask_pixels = masks::count_set(&laser_mask),
            "frame analysed"
        );

        Detection {
            circles,
            edges,
            annotated,
            laser_mask,
        }
    }

    /// External contours of `edges` that pass the circularity filter.
    pub fn round_contours(&self, edges: &GrayImage) -> Vec<Contour> {
        filter_circular(find_external_contours(edges), self.config.circularity_threshold)
    }

    /// Brightness gate AND red hue band, then opened by erosion and dilation.
    pub fn laser_mask(&self, planes: &HsvPlanes, params: &ParameterSet) -> GrayImage {
        let bright = masks::threshold_binary(&planes.value, params.brightness_threshold() as u8);
        let red = masks::red_hue_mask(
            &planes.hue,
            params.red_lower_threshold(),
            params.red_upper_threshold(),
            self.config.hue_wrap_offset,
        );
        let combined = masks::intersection(&bright, &red);
        let eroded = masks::erode(&combined, self.config.erode_iterations);
        masks::dilate(&eroded, self.config.dilate_iterations)
    }
}

fn mask_overlaps(mask: &GrayImage, circle: &DetectedCircle) -> bool {
    let (cx, cy) = circle.center;
    let r = circle.radius.max(0);
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    for y in (cy - r).max(0)..(cy + r + 1).min(h) {
        for x in (cx - r).max(0)..(cx + r + 1).min(w) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r && mask.get_pixel(x as u32, y as u32)[0] != masks::MASK_OFF {
                return true;
            }
        }
    }
    false
}
