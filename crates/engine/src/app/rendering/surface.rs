use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::settings::{keys, Settings};

use super::RendererError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMode {
    /// Borderless window covering the display; requested size is ignored.
    #[default]
    SoftFullscreen,
    /// Exclusive display mode; 0 requests the display's native resolution.
    HardFullscreen,
    /// Plain window; width and height must be set.
    Windowed,
}

impl SurfaceMode {
    fn from_setting(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(number)) => match number.as_i64() {
                Some(1) => SurfaceMode::HardFullscreen,
                Some(2) => SurfaceMode::Windowed,
                _ => SurfaceMode::SoftFullscreen,
            },
            Some(value @ Value::String(_)) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => SurfaceMode::SoftFullscreen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSurfaceConfig {
    pub scale: f32,
    pub mode: SurfaceMode,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderSurfaceConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            mode: SurfaceMode::SoftFullscreen,
            width: 0,
            height: 0,
        }
    }
}

impl RenderSurfaceConfig {
    pub fn windowed(width: u32, height: u32) -> Self {
        Self {
            mode: SurfaceMode::Windowed,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Whether resolving this config needs the display's native resolution.
    pub fn needs_display(&self) -> bool {
        match self.mode {
            SurfaceMode::SoftFullscreen => true,
            SurfaceMode::HardFullscreen => self.width == 0 || self.height == 0,
            SurfaceMode::Windowed => false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let scale = settings.get_f64(keys::RENDERER_SCALE) as f32;
        Self {
            scale: if scale.is_finite() && scale > 0.0 {
                scale
            } else {
                1.0
            },
            mode: SurfaceMode::from_setting(settings.get(keys::RENDERER_MODE)),
            width: settings.get_u32(keys::RENDERER_WIDTH),
            height: settings.get_u32(keys::RENDERER_HEIGHT),
        }
    }

    pub fn store(&self, settings: &mut Settings) {
        if let Ok(mode) = serde_json::to_value(self.mode) {
            settings.set(keys::RENDERER_MODE, mode);
        }
        settings.set(keys::RENDERER_SCALE, f64::from(self.scale));
        settings.set(keys::RENDERER_WIDTH, self.width);
        settings.set(keys::RENDERER_HEIGHT, self.height);
    }
}

/// Fully resolved sizes for one surface creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub mode: SurfaceMode,
    pub physical_width: u32,
    pub physical_height: u32,
    pub logical_width: u32,
    pub logical_height: u32,
    pub scale: f32,
}

pub(crate) fn resolve_layout(
    config: &RenderSurfaceConfig,
    display: Option<(u32, u32)>,
) -> Result<SurfaceLayout, RendererError> {
    if !config.scale.is_finite() || config.scale <= 0.0 {
        return Err(RendererError::InvalidScale(config.scale));
    }

    let (physical_width, physical_height) = match config.mode {
        SurfaceMode::Windowed => {
            if config.width == 0 || config.height == 0 {
                return Err(RendererError::WindowSizeUnset {
                    width: config.width,
                    height: config.height,
                });
            }
            (config.width, config.height)
        }
        SurfaceMode::SoftFullscreen => display.ok_or(RendererError::DisplayUnknown)?,
        SurfaceMode::HardFullscreen => {
            if config.width == 0 || config.height == 0 {
                display.ok_or(RendererError::DisplayUnknown)?
            } else {
                (config.width, config.height)
            }
        }
    };
    if physical_width == 0 || physical_height == 0 {
        return Err(RendererError::DisplayUnknown);
    }

    Ok(SurfaceLayout {
        mode: config.mode,
        physical_width,
        physical_height,
        logical_width: logical_extent(physical_width, config.scale),
        logical_height: logical_extent(physical_height, config.scale),
        scale: config.scale,
    })
}

fn logical_extent(physical: u32, scale: f32) -> u32 {
    let logical = (f64::from(physical) / f64::from(scale)).round();
    (logical as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY: Option<(u32, u32)> = Some((1920, 1080));

    #[test]
    fn windowed_uses_requested_size() {
        let layout = resolve_layout(&RenderSurfaceConfig::windowed(800, 600), DISPLAY)
            .expect("layout");

        assert_eq!((layout.physical_width, layout.physical_height), (800, 600));
        assert_eq!((layout.logical_width, layout.logical_height), (800, 600));
    }

    #[test]
    fn windowed_without_size_is_rejected() {
        let result = resolve_layout(&RenderSurfaceConfig::windowed(0, 600), DISPLAY);

        assert!(matches!(
            result,
            Err(RendererError::WindowSizeUnset {
                width: 0,
                height: 600
            })
        ));
    }

    #[test]
    fn soft_fullscreen_ignores_requested_size() {
        let config = RenderSurfaceConfig {
            mode: SurfaceMode::SoftFullscreen,
            width: 640,
            height: 480,
            ..RenderSurfaceConfig::default()
        };

        let layout = resolve_layout(&config, DISPLAY).expect("layout");

        assert_eq!((layout.physical_width, layout.physical_height), (1920, 1080));
    }

    #[test]
    fn hard_fullscreen_zero_takes_display_size_and_explicit_size_wins() {
        let auto = RenderSurfaceConfig {
            mode: SurfaceMode::HardFullscreen,
            ..RenderSurfaceConfig::default()
        };
        let forced = RenderSurfaceConfig {
            width: 1280,
            height: 720,
            ..auto
        };

        let auto_layout = resolve_layout(&auto, DISPLAY).expect("auto");
        let forced_layout = resolve_layout(&forced, DISPLAY).expect("forced");

        assert_eq!(
            (auto_layout.physical_width, auto_layout.physical_height),
            (1920, 1080)
        );
        assert_eq!(
            (forced_layout.physical_width, forced_layout.physical_height),
            (1280, 720)
        );
    }

    #[test]
    fn fullscreen_without_display_fails() {
        let result = resolve_layout(&RenderSurfaceConfig::default(), None);

        assert!(matches!(result, Err(RendererError::DisplayUnknown)));
    }

    #[test]
    fn scale_divides_physical_into_logical() {
        let config = RenderSurfaceConfig::windowed(1920, 1080).with_scale(1.5);

        let layout = resolve_layout(&config, None).expect("layout");

        assert_eq!((layout.logical_width, layout.logical_height), (1280, 720));
        assert_eq!((layout.physical_width, layout.physical_height), (1920, 1080));
    }

    #[test]
    fn non_positive_or_nan_scale_is_rejected() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = RenderSurfaceConfig::windowed(800, 600).with_scale(scale);
            assert!(resolve_layout(&config, None).is_err(), "scale {scale}");
        }
    }

    #[test]
    fn huge_scale_keeps_logical_size_positive() {
        let config = RenderSurfaceConfig::windowed(10, 10).with_scale(100.0);

        let layout = resolve_layout(&config, None).expect("layout");

        assert_eq!((layout.logical_width, layout.logical_height), (1, 1));
    }

    #[test]
    fn only_auto_sized_fullscreen_needs_display() {
        let hard = RenderSurfaceConfig {
            mode: SurfaceMode::HardFullscreen,
            ..RenderSurfaceConfig::default()
        };

        assert!(RenderSurfaceConfig::default().needs_display());
        assert!(hard.needs_display());
        assert!(!RenderSurfaceConfig {
            width: 800,
            height: 600,
            ..hard
        }
        .needs_display());
        assert!(!RenderSurfaceConfig::windowed(0, 0).needs_display());
    }

    #[test]
    fn empty_settings_give_soft_fullscreen_identity_scale() {
        let config = RenderSurfaceConfig::from_settings(&Settings::session_only());

        assert_eq!(config, RenderSurfaceConfig::default());
    }

    #[test]
    fn mode_setting_accepts_numbers_and_names() {
        let mut settings = Settings::session_only();
        settings.set(keys::RENDERER_MODE, 2);
        assert_eq!(
            RenderSurfaceConfig::from_settings(&settings).mode,
            SurfaceMode::Windowed
        );

        settings.set(keys::RENDERER_MODE, "hard_fullscreen");
        assert_eq!(
            RenderSurfaceConfig::from_settings(&settings).mode,
            SurfaceMode::HardFullscreen
        );

        settings.set(keys::RENDERER_MODE, "sideways");
        assert_eq!(
            RenderSurfaceConfig::from_settings(&settings).mode,
            SurfaceMode::SoftFullscreen
        );
    }

    #[test]
    fn store_then_from_settings_preserves_config() {
        let mut settings = Settings::session_only();
        let config = RenderSurfaceConfig::windowed(1024, 768).with_scale(2.0);

        config.store(&mut settings);

        assert_eq!(RenderSurfaceConfig::from_settings(&settings), config);
    }
}
