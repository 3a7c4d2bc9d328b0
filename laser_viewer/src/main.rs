// Live red laser dot viewer.
//
// Opens camera 0, shows the Canny edge map and the annotated frame, and exposes the
// three detection parameters as sliders. Press `q` or close any window to quit.
// Takes no arguments and reads no environment variables.

mod camera;
mod display;

use anyhow::Context;
use camera::{CAMERA_INDEX, OpenCvCamera};
use display::HighGuiDisplay;
use laser_vision::runtime::{self, LoopConfig};
use laser_vision::{DetectionPipeline, ParameterSet};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("laser_viewer=info,laser_vision=info")
        .init();

    info!("Red Laser Detection - live viewer");

    // Both are released on drop, after the loop, however it ends.
    let mut camera = OpenCvCamera::open(CAMERA_INDEX).context("failed to initialise the camera")?;
    let mut display = HighGuiDisplay::open(ParameterSet::default()).context("failed to create windows")?;

    let pipeline = DetectionPipeline::default();
    let summary = runtime::run(&mut camera, &mut display, &pipeline, &LoopConfig::default())
        .context("detection loop failed")?;

    info!(
        frames = summary.frames_processed,
        exit = ?summary.exit,
        "processing complete"
    );
    Ok(())
}
