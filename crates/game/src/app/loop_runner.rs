use std::process::ExitCode;

use engine::{AppError, DefaultPlatform, DiagnosticsOverlay, GameLoop};
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match start(app) {
        Ok(game) => {
            game.run();
            info!("exited");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

fn start(app: AppWiring) -> Result<GameLoop, AppError> {
    let (settings, scene) = app.load()?;
    let game = GameLoop::with_settings(DefaultPlatform::default(), settings, Box::new(scene))?;
    Ok(game.with_overlay(Box::new(DiagnosticsOverlay::default())))
}
