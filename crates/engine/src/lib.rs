use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod settings;

pub use app::{
    AppError, Canvas, Controls, DefaultPlatform, DiagnosticsOverlay, Edge, EventInjector,
    FrameStats, GameLoop, HeadlessPlatform, InputSnapshot, InputSource, InputTracker, LoopConfig,
    LoopMetricsSnapshot, Overlay, Platform, PlatformError, PlatformEvent, RenderSurfaceConfig,
    Renderer, RendererColor, RendererError, Scene, SceneCommand, SurfaceLayout, SurfaceMode,
    WinitPlatform, DEFAULT_WINDOW_TITLE, OVERLAY_TOGGLE_KEY,
};
pub use settings::{keys, Settings, SettingsError};
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

pub const ROOT_ENV_VAR: &str = "TICKFRAME_ROOT";
pub const USER_SETTINGS_ENV_VAR: &str = "TICKFRAME_SETTINGS";
pub const DEFAULT_SETTINGS_ENV_VAR: &str = "TICKFRAME_DEFAULT_SETTINGS";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub user_settings: PathBuf,
    /// `None` when no defaults file is configured or shipped.
    pub default_settings: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "TICKFRAME_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/tickframe\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let user_settings = env_path(USER_SETTINGS_ENV_VAR)?
        .unwrap_or_else(|| root.join("settings").join("user.json"));
    let default_settings = match env_path(DEFAULT_SETTINGS_ENV_VAR)? {
        Some(path) => Some(path),
        None => {
            let shipped = root.join("assets").join("default_settings.json");
            shipped.is_file().then_some(shipped)
        }
    };

    Ok(AppPaths {
        root,
        user_settings,
        default_settings,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env_path(ROOT_ENV_VAR)? {
        Some(raw) => {
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        None => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            find_root_above(&exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
    }
}

fn env_path(var: &'static str) -> Result<Option<PathBuf>, StartupError> {
    match env::var(var) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => Ok(Some(PathBuf::from(value))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(StartupError::EnvVar { var, source }),
    }
}

fn find_root_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();
    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
