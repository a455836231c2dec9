use std::path::PathBuf;

use self::app::PlayApp;
use crate::{tui::Runtime, util};

mod app;

/// Accepted `--speed` range in steps per second. Tick intervals derived from it always fit
/// a [`Duration`](std::time::Duration).
const MIN_SPEED: f64 = 0.01;
const MAX_SPEED: f64 = 1000.0;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Trained model file
    model: PathBuf,
    /// Steps per second while the navigator walks
    #[arg(long, default_value_t = 8.0)]
    speed: f64,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    check_speed(arg.speed)?;
    let model = util::read_model_file(&arg.model)?;
    let mut app = PlayApp::new(model, arg.speed);
    Runtime::new().run(&mut app)?;
    Ok(())
}

fn check_speed(speed: f64) -> anyhow::Result<()> {
    anyhow::ensure!(
        (MIN_SPEED..=MAX_SPEED).contains(&speed),
        "--speed must be between {MIN_SPEED} and {MAX_SPEED} steps per second, got {speed}"
    );
    Ok(())
}
