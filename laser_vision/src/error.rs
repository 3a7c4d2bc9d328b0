// THEORY:
// The vision engine itself never fails: a frame with nothing in it simply yields
// no circles. Errors only exist at the edges of the crate, where raw buffers come
// in from a camera and where annotated images go out to a display. `VisionError`
// names those boundary failures so the runtime loop can tell "the camera is gone"
// apart from "the window could not be drawn".

use thiserror::Error;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("frame buffer holds {actual} bytes, expected {expected} for {width}x{height}x3")]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("frame source failed: {0}")]
    Source(#[source] BoxedError),
    #[error("display sink failed: {0}")]
    Display(#[source] BoxedError),
}

impl VisionError {
    pub fn source_error<E>(err: E) -> Self
    where
        E: Into<BoxedError>,
    {
        VisionError::Source(err.into())
    }

    pub fn display_error<E>(err: E) -> Self
    where
        E: Into<BoxedError>,
    {
        VisionError::Display(err.into())
    }
}

pub type Result<T> = std::result::Result<T, VisionError>;
