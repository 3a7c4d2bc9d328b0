// THEORY:
// This file is the main entry point for the `laser_vision` library crate. It
// exports the `DetectionPipeline` and its data structures (`ParameterSet`,
// `DetectorConfig`, `Detection`) as the high-level interface of the engine, and
// the `runtime` loop that drives it from a camera to a display.
//
// The per-stage primitives live in `core_modules`. They are public so tests and
// diagnostic tools can run a single stage, but a normal consumer only needs
// `pipeline` and `runtime`.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod runtime;

pub use core_modules::frame::{ChannelOrder, Frame};
pub use error::{Result, VisionError};
pub use pipeline::{DetectedCircle, Detection, DetectionPipeline, DetectorConfig, MaskPolicy, ParameterSet};
