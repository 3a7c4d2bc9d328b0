// THEORY:
// The `runtime` module is the frame loop that ties the engine to the outside world.
// The camera and the display are not part of the engine; they are collaborators
// behind two traits, `FrameSource` and `DisplaySink`. That keeps the loop free of
// any GUI or capture library and lets tests drive it with scripted fakes.
//
// Key architectural principles:
// 1.  **Single Thread**: One iteration is acquire, detect, present, poll. Nothing
//     runs concurrently and nothing is carried from one iteration to the next.
// 2.  **Fresh Parameters**: The sink is asked for the current `ParameterSet` once per
//     iteration. There is no shared global state; whatever the user last set on the
//     control surface is what the next frame sees.
// 3.  **One Exit Predicate**: `should_terminate` is the single place that decides
//     whether the user wants out. It is a pure function of what `poll` observed.
// 4.  **Scoped Resources**: `run` borrows the source and sink. Whoever created them
//     owns them and releases them when they go out of scope, on every exit path.
// 5.  **Source Failure Ends the Run**: "no frame" and "camera error" are the same
//     thing to the loop. It logs the failure once and returns normally.

use crate::core_modules::frame::Frame;
use crate::error::Result;
use crate::pipeline::{Detection, DetectionPipeline, ParameterSet};
use tracing::{debug, error, info};

pub const QUIT_KEY: u8 = b'q';
pub const KEY_WAIT_MS: u32 = 1;
pub const SOURCE_FAILURE_MESSAGE: &str = "Failed to read frame from camera, exiting program.";

/// Supplies one color frame per call.
pub trait FrameSource {
    /// `Ok(None)` signals end-of-stream.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Renders results, hosts the control surface, and reports user input.
pub trait DisplaySink {
    /// The current values of the three controls.
    fn parameters(&mut self) -> Result<ParameterSet>;

    fn present(&mut self, detection: &Detection) -> Result<()>;

    /// Waits up to `wait_ms` for input and reports what was seen.
    fn poll(&mut self, wait_ms: u32) -> Result<LoopSignal>;
}

/// What the display observed during one poll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoopSignal {
    /// The key pressed during the wait, if any.
    pub key: Option<u8>,
    /// Visibility of every display surface, in a fixed order.
    pub surfaces_visible: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    pub quit_key: u8,
    pub key_wait_ms: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            quit_key: QUIT_KEY,
            key_wait_ms: KEY_WAIT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    QuitKey,
    SurfaceClosed,
    SourceExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub exit: ExitReason,
}

/// Why the user wants to stop, if they do.
pub fn termination_reason(signal: &LoopSignal, quit_key: u8) -> Option<ExitReason> {
    if signal.key == Some(quit_key) {
        Some(ExitReason::QuitKey)
    } else if signal.surfaces_visible.iter().any(|visible| !visible) {
        Some(ExitReason::SurfaceClosed)
    } else {
        None
    }
}

/// True when the quit key was pressed or any display surface is closed.
pub fn should_terminate(signal: &LoopSignal, quit_key: u8) -> bool {
    termination_reason(signal, quit_key).is_some()
}

/// Runs the acquire, detect, present, poll loop until the user quits or the source
/// runs dry.
pub fn run<S, D>(
    source: &mut S,
    sink: &mut D,
    pipeline: &DetectionPipeline,
    config: &LoopConfig,
) -> Result<RunSummary>
where
    S: FrameSource + ?Sized,
    D: DisplaySink + ?Sized,
{
    let mut frames_processed = 0u64;

    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                error!("{SOURCE_FAILURE_MESSAGE}");
                return Ok(summary(frames_processed, ExitReason::SourceExhausted));
            }
            Err(err) => {
                error!(error = %err, "{SOURCE_FAILURE_MESSAGE}");
                return Ok(summary(frames_processed, ExitReason::SourceExhausted));
            }
        };

        let params = sink.parameters()?;
        let detection = pipeline.detect(&frame, &params);
        frames_processed += 1;
        debug!(
            frame = frames_processed,
            circles = detection.circles.len(),
            brightness = params.brightness_threshold(),
            red_lower = params.red_lower_threshold(),
            red_upper = params.red_upper_threshold(),
            "frame processed"
        );

        sink.present(&detection)?;

        let signal = sink.poll(config.key_wait_ms)?;
        if let Some(exit) = termination_reason(&signal, config.quit_key) {
            info!(?exit, frames = frames_processed, "stopping detection loop");
            return Ok(summary(frames_processed, exit));
        }
    }
}

fn summary(frames_processed: u64, exit: ExitReason) -> RunSummary {
    RunSummary {
        frames_processed,
        exit,
    }
}
