use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use laser_vision::core_modules::masks::masks::count_set;
use laser_vision::{DetectionPipeline, DetectorConfig, Frame, MaskPolicy, ParameterSet};

fn scene_with_disk(center: (i32, i32), radius: i32, color: [u8; 3]) -> Frame {
    let mut img = RgbImage::new(200, 200);
    draw_filled_circle_mut(&mut img, center, radius, Rgb(color));
    Frame::from_rgb(img)
}

fn assert_close(actual: i32, expected: i32, tolerance: i32, what: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{what}: expected {expected}±{tolerance}, got {actual}"
    );
}

#[test]
fn white_disk_is_found_once() {
    let frame = scene_with_disk((100, 100), 30, [255, 255, 255]);
    let params = ParameterSet::new(50, 0, 20);
    let detection = DetectionPipeline::default().detect(&frame, &params);

    assert_eq!(detection.circles.len(), 1, "circles: {:?}", detection.circles);
    let circle = detection.circles[0];
    assert_close(circle.center.0, 100, 2, "center x");
    assert_close(circle.center.1, 100, 2, "center y");
    assert_close(circle.radius, 30, 2, "radius");
}

#[test]
fn black_frame_yields_nothing() {
    let frame = Frame::filled(120, 80, [0, 0, 0]);
    let pipeline = DetectionPipeline::default();
    let edges = pipeline.detect(&frame, &ParameterSet::default()).edges;
    assert!(edges.pixels().all(|p| p[0] == 0));
    assert!(pipeline.round_contours(&edges).is_empty());
    assert!(pipeline.detect(&frame, &ParameterSet::default()).circles.is_empty());
}

#[test]
fn elongated_bar_is_rejected() {
    let mut img = RgbImage::new(200, 200);
    draw_filled_rect_mut(&mut img, Rect::at(20, 95).of_size(160, 10), Rgb([255, 255, 255]));
    let detection = DetectionPipeline::default().detect(&Frame::from_rgb(img), &ParameterSet::default());
    assert!(detection.circles.is_empty(), "circles: {:?}", detection.circles);
}

#[test]
fn two_disks_give_two_circles() {
    let mut img = RgbImage::new(240, 120);
    draw_filled_circle_mut(&mut img, (60, 60), 20, Rgb([255, 255, 255]));
    draw_filled_circle_mut(&mut img, (180, 60), 25, Rgb([255, 255, 255]));
    let detection = DetectionPipeline::default().detect(&Frame::from_rgb(img), &ParameterSet::default());

    let mut circles = detection.circles.clone();
    circles.sort_by_key(|c| c.center.0);
    assert_eq!(circles.len(), 2);
    assert_close(circles[0].center.0, 60, 2, "left x");
    assert_close(circles[0].radius, 20, 2, "left radius");
    assert_close(circles[1].center.0, 180, 2, "right x");
    assert_close(circles[1].radius, 25, 2, "right radius");
}

#[test]
fn annotated_frame_is_a_copy_with_green_ring() {
    let frame = scene_with_disk((100, 100), 30, [255, 255, 255]);
    let detection = DetectionPipeline::default().detect(&frame, &ParameterSet::default());
    let circle = detection.circles[0];

    assert_eq!(detection.annotated.dimensions(), (200, 200));
    let ring_x = (circle.center.0 + circle.radius) as u32;
    assert_eq!(detection.annotated.get_pixel(ring_x, circle.center.1 as u32).0, [0, 255, 0]);
    assert_eq!(detection.annotated.get_pixel(100, 100).0, [255, 255, 255]);
    // The input frame itself is never drawn on.
    assert_eq!(frame, scene_with_disk((100, 100), 30, [255, 255, 255]));
}

#[test]
fn red_disk_lights_the_mask_when_hue_band_covers_it() {
    // Pure red has hue 0.
    let frame = scene_with_disk((100, 100), 30, [255, 0, 0]);
    let pipeline = DetectionPipeline::default();

    let covered = pipeline.detect(&frame, &ParameterSet::new(50, 0, 20));
    assert!(count_set(&covered.laser_mask) > 2000);
    assert_eq!(covered.laser_mask.get_pixel(100, 100)[0], 255);
    assert_eq!(covered.laser_mask.get_pixel(10, 10)[0], 0);

    let missed = pipeline.detect(&frame, &ParameterSet::default());
    assert_eq!(count_set(&missed.laser_mask), 0);
}

#[test]
fn dim_disk_is_excluded_from_the_mask() {
    let frame = scene_with_disk((100, 100), 30, [120, 0, 0]);
    let detection = DetectionPipeline::default().detect(&frame, &ParameterSet::new(200, 0, 20));
    assert_eq!(count_set(&detection.laser_mask), 0);
}

#[test]
fn mask_does_not_veto_circles_by_default() {
    let frame = scene_with_disk((100, 100), 30, [255, 0, 0]);
    let detection = DetectionPipeline::default().detect(&frame, &ParameterSet::default());
    assert_eq!(count_set(&detection.laser_mask), 0);
    assert_eq!(detection.circles.len(), 1);
}

#[test]
fn overlap_policy_requires_a_red_bright_dot() {
    let frame = scene_with_disk((100, 100), 30, [255, 0, 0]);
    let pipeline = DetectionPipeline::new(DetectorConfig {
        mask_policy: MaskPolicy::RequireOverlap,
        ..DetectorConfig::default()
    });

    assert!(pipeline.detect(&frame, &ParameterSet::default()).circles.is_empty());
    assert_eq!(pipeline.detect(&frame, &ParameterSet::new(50, 0, 20)).circles.len(), 1);
}

#[test]
fn raising_the_circularity_bar_drops_the_disk() {
    let frame = scene_with_disk((100, 100), 30, [255, 255, 255]);
    let strict = DetectionPipeline::new(DetectorConfig {
        circularity_threshold: 1.01,
        ..DetectorConfig::default()
    });
    assert!(strict.detect(&frame, &ParameterSet::default()).circles.is_empty());
}

#[test]
fn detection_is_repeatable() {
    let frame = scene_with_disk((90, 110), 25, [255, 40, 10]);
    let params = ParameterSet::new(100, 0, 20);
    let pipeline = DetectionPipeline::default();
    assert_eq!(pipeline.detect(&frame, &params), pipeline.detect(&frame, &params));
}

#[test]
fn frames_without_pixels_give_an_empty_detection() {
    let pipeline = DetectionPipeline::default();
    for (w, h) in [(0, 0), (0, 12), (12, 0)] {
        let frame = Frame::filled(w, h, [0, 0, 0]);
        let detection = pipeline.detect(&frame, &ParameterSet::default());
        assert!(detection.circles.is_empty());
        assert_eq!(detection.edges.dimensions(), (w, h));
        assert_eq!(detection.laser_mask.dimensions(), (w, h));
        assert_eq!(detection.annotated.dimensions(), (w, h));
    }

    let from_bytes = Frame::from_bgr_bytes(0, 0, &[]).expect("empty buffer fits a 0x0 frame");
    assert!(pipeline.detect(&from_bytes, &ParameterSet::default()).circles.is_empty());
}

#[test]
fn tiny_frames_are_handled() {
    let pipeline = DetectionPipeline::default();
    for (w, h) in [(1, 1), (2, 2), (3, 1), (1, 5)] {
        let detection = pipeline.detect(&Frame::filled(w, h, [255, 255, 255]), &ParameterSet::default());
        assert!(detection.circles.is_empty());
        assert_eq!(detection.edges.dimensions(), (w, h));
    }
}
