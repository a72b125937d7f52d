use engine::{resolve_app_paths, AppError, AppPaths, RenderSurfaceConfig, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::demo_scene::DemoScene;

pub(crate) struct AppWiring {
    pub(crate) paths: Result<AppPaths, AppError>,
}

impl AppWiring {
    /// Loads settings from the resolved paths and builds the demo scene to
    /// match the configured surface mode.
    pub(crate) fn load(self) -> Result<(Settings, DemoScene), AppError> {
        let paths = self.paths?;
        info!(
            root = %paths.root.display(),
            user_settings = %paths.user_settings.display(),
            default_settings = ?paths.default_settings,
            "startup"
        );

        let settings = Settings::load(
            Some(paths.user_settings.as_path()),
            paths.default_settings.as_deref(),
        )?;
        let scene = DemoScene::new(RenderSurfaceConfig::from_settings(&settings));
        Ok((settings, scene))
    }
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Tickframe Startup ===");

    AppWiring {
        paths: resolve_app_paths().map_err(AppError::from),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
