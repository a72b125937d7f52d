use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use super::atomic_io::write_text_atomic;

pub mod keys {
    pub const RENDERER_MODE: &str = "renderer_mode";
    pub const RENDERER_SCALE: &str = "renderer_scale";
    pub const RENDERER_WIDTH: &str = "renderer_width";
    pub const RENDERER_HEIGHT: &str = "renderer_height";
    pub const WINDOW_TITLE: &str = "window_title";
    pub const MAX_FRAME_DELTA_MS: &str = "max_frame_delta_ms";
    pub const METRICS_LOG_INTERVAL_MS: &str = "metrics_log_interval_ms";
    pub const OVERLAY_VISIBLE: &str = "overlay_visible";
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("settings file {path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },
    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Key/value settings layered as user store over defaults store.
///
/// Keys missing from both stores resolve to a zero-equivalent value, so callers
/// never have to handle an absent key.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    user_path: Option<PathBuf>,
    user: Map<String, Value>,
    defaults: Map<String, Value>,
    dirty: bool,
}

impl Settings {
    pub fn session_only() -> Self {
        Self::default()
    }

    pub fn load(
        user_path: Option<&Path>,
        defaults_path: Option<&Path>,
    ) -> Result<Self, SettingsError> {
        let defaults = match defaults_path {
            Some(path) => read_object(path)?,
            None => Map::new(),
        };

        let user = match user_path {
            Some(path) if path.exists() => read_object(path)?,
            Some(path) => {
                write_text_atomic(path, "{}\n").map_err(|source| SettingsError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!(path = %path.display(), "settings_created");
                Map::new()
            }
            None => {
                debug!("settings are session-only");
                Map::new()
            }
        };

        Ok(Self {
            user_path: user_path.map(Path::to_path_buf),
            user,
            defaults,
            dirty: false,
        })
    }

    pub fn is_persistent(&self) -> bool {
        self.user_path.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.user.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn get_i64(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value as i64))
                .unwrap_or(0),
            Some(Value::Bool(flag)) => i64::from(*flag),
            _ => 0,
        }
    }

    pub fn get_u32(&self, key: &str) -> u32 {
        u32::try_from(self.get_i64(key).max(0)).unwrap_or(u32::MAX)
    }

    pub fn get_f64(&self, key: &str) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
            _ => false,
        }
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        if self.get(key) == Some(&value) {
            return;
        }
        self.user.insert(key.to_string(), value);
        self.dirty = true;
    }

    /// Writes the user store if it is backed by a file and has unsaved changes.
    pub fn save(&mut self) -> Result<(), SettingsError> {
        let Some(path) = self.user_path.as_deref() else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        let mut text = serde_json::to_string_pretty(&self.user).map_err(SettingsError::Serialize)?;
        text.push('\n');
        write_text_atomic(path, &text).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.dirty = false;
        info!(path = %path.display(), keys = self.user.len(), "settings_saved");
        Ok(())
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SettingsError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
