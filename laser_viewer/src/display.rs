// THEORY:
// `HighGuiDisplay` is the display sink and the control surface of the live viewer.
// It owns three HighGUI windows (the edge map, the annotated frame, and the
// adjustment sliders) and tears all of them down in `Drop`.
//
// The sliders are the only source of `ParameterSet` values. HighGUI stores their
// positions itself; this type reads them back once per frame through
// `get_trackbar_pos` and passes them through the clamping setters.

use image::{GrayImage, RgbImage};
use laser_vision::pipeline::{BRIGHTNESS_MAX, HUE_MAX};
use laser_vision::runtime::{DisplaySink, LoopSignal};
use laser_vision::{Detection, ParameterSet, Result as VisionResult, VisionError};
use opencv::{
    core::{self, Mat, Scalar},
    highgui, imgproc,
    prelude::*,
};
use tracing::{info, warn};

pub const EDGES_WINDOW: &str = "Canny Edges";
pub const DETECTION_WINDOW: &str = "Red Laser Detection";
pub const ADJUSTMENTS_WINDOW: &str = "Adjustments";

pub const BRIGHTNESS_TRACKBAR: &str = "Brightness Threshold";
pub const RED_LOWER_TRACKBAR: &str = "Red Lower Threshold";
pub const RED_UPPER_TRACKBAR: &str = "Red Upper Threshold";

const WINDOWS: [&str; 3] = [DETECTION_WINDOW, EDGES_WINDOW, ADJUSTMENTS_WINDOW];

pub struct HighGuiDisplay {
    _private: (),
}

impl HighGuiDisplay {
    pub fn open(initial: ParameterSet) -> opencv::Result<Self> {
        for window in WINDOWS {
            highgui::named_window(window, highgui::WINDOW_AUTOSIZE)?;
        }

        let trackbars = [
            (BRIGHTNESS_TRACKBAR, BRIGHTNESS_MAX, initial.brightness_threshold()),
            (RED_LOWER_TRACKBAR, HUE_MAX, initial.red_lower_threshold()),
            (RED_UPPER_TRACKBAR, HUE_MAX, initial.red_upper_threshold()),
        ];
        for (name, max, value) in trackbars {
            highgui::create_trackbar(name, ADJUSTMENTS_WINDOW, None, max, None)?;
            highgui::set_trackbar_pos(name, ADJUSTMENTS_WINDOW, value)?;
        }

        info!(windows = ?WINDOWS, "display opened");
        Ok(Self { _private: () })
    }

    fn read_parameters(&self) -> opencv::Result<ParameterSet> {
        Ok(ParameterSet::new(
            highgui::get_trackbar_pos(BRIGHTNESS_TRACKBAR, ADJUSTMENTS_WINDOW)?,
            highgui::get_trackbar_pos(RED_LOWER_TRACKBAR, ADJUSTMENTS_WINDOW)?,
            highgui::get_trackbar_pos(RED_UPPER_TRACKBAR, ADJUSTMENTS_WINDOW)?,
        ))
    }

    fn show(&self, detection: &Detection) -> opencv::Result<()> {
        highgui::imshow(EDGES_WINDOW, &gray_to_mat(&detection.edges)?)?;
        highgui::imshow(DETECTION_WINDOW, &rgb_to_bgr_mat(&detection.annotated)?)?;
        Ok(())
    }

    fn wait(&self, wait_ms: u32) -> opencv::Result<LoopSignal> {
        let key = highgui::wait_key(wait_ms as i32)?;
        let key = if key < 0 { None } else { Some((key & 0xFF) as u8) };

        let mut surfaces_visible = Vec::with_capacity(WINDOWS.len());
        for window in WINDOWS {
            let visible = highgui::get_window_property(window, highgui::WND_PROP_VISIBLE)?;
            surfaces_visible.push(visible >= 1.0);
        }

        Ok(LoopSignal { key, surfaces_visible })
    }
}

impl DisplaySink for HighGuiDisplay {
    fn parameters(&mut self) -> VisionResult<ParameterSet> {
        self.read_parameters().map_err(VisionError::display_error)
    }

    fn present(&mut self, detection: &Detection) -> VisionResult<()> {
        self.show(detection).map_err(VisionError::display_error)
    }

    fn poll(&mut self, wait_ms: u32) -> VisionResult<LoopSignal> {
        self.wait(wait_ms).map_err(VisionError::display_error)
    }
}

impl Drop for HighGuiDisplay {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            warn!(error = %e, "failed to close windows");
        } else {
            info!("windows closed");
        }
    }
}

fn gray_to_mat(image: &GrayImage) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        image.height() as i32,
        image.width() as i32,
        core::CV_8UC1,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(image.as_raw());
    Ok(mat)
}

fn rgb_to_bgr_mat(image: &RgbImage) -> opencv::Result<Mat> {
    let mut rgb = Mat::new_rows_cols_with_default(
        image.height() as i32,
        image.width() as i32,
        core::CV_8UC3,
        Scalar::all(0.0),
    )?;
    rgb.data_bytes_mut()?.copy_from_slice(image.as_raw());
    let mut bgr = Mat::default();
    imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
    Ok(bgr)
}
