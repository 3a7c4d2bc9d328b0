// THEORY:
// `OpenCvCamera` is the frame source of the live viewer. It owns the capture
// device for the whole run: opened once before the loop, released once in `Drop`,
// whichever way the loop ends.
//
// A camera that never opened, a read that returns nothing, and an empty frame are
// all reported as end-of-stream. The runtime turns that into its single
// "failed to read frame" diagnostic and shuts down.

use laser_vision::runtime::FrameSource;
use laser_vision::{Frame, Result as VisionResult, VisionError};
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::{info, warn};

pub const CAMERA_INDEX: i32 = 0;

pub struct OpenCvCamera {
    capture: VideoCapture,
    frame: Mat,
}

impl OpenCvCamera {
    pub fn open(index: i32) -> opencv::Result<Self> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if capture.is_opened()? {
            let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
            let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
            info!(index, width, height, "camera opened");
        } else {
            warn!(index, "camera did not open");
        }
        Ok(Self {
            capture,
            frame: Mat::default(),
        })
    }

    fn read_frame(&mut self) -> opencv::Result<Option<Frame>> {
        if !self.capture.is_opened()? || !self.capture.read(&mut self.frame)? || self.frame.empty() {
            return Ok(None);
        }

        // Grayscale or BGRA devices are brought to plain BGR first.
        let mut bgr = Mat::default();
        match self.frame.channels() {
            1 => imgproc::cvt_color(&self.frame, &mut bgr, imgproc::COLOR_GRAY2BGR, 0)?,
            4 => imgproc::cvt_color(&self.frame, &mut bgr, imgproc::COLOR_BGRA2BGR, 0)?,
            _ => bgr = self.frame.try_clone()?,
        }
        if bgr.typ() != core::CV_8UC3 {
            return Err(opencv::Error::new(
                core::StsUnsupportedFormat,
                format!("unsupported camera pixel type {}", bgr.typ()),
            ));
        }

        let width = bgr.cols() as u32;
        let height = bgr.rows() as u32;
        let frame = Frame::from_bgr_bytes(width, height, bgr.data_bytes()?)
            .map_err(|e| opencv::Error::new(core::StsBadSize, e.to_string()))?;
        Ok(Some(frame))
    }
}

impl FrameSource for OpenCvCamera {
    fn next_frame(&mut self) -> VisionResult<Option<Frame>> {
        self.read_frame().map_err(VisionError::source_error)
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!(error = %e, "failed to release camera");
        } else {
            info!("camera released");
        }
    }
}
