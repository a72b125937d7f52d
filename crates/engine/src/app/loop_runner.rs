use std::path::Path;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};
use winit::keyboard::KeyCode;

use crate::settings::{keys, Settings, SettingsError};
use crate::StartupError;

use super::metrics::MetricsAccumulator;
use super::scene::SceneRuntime;
use super::{
    Controls, DefaultPlatform, FrameStats, InputTracker, LoopMetricsSnapshot, Overlay, Platform,
    PlatformEvent, RenderSurfaceConfig, Renderer, RendererError, Scene, SceneCommand,
};

pub const DEFAULT_WINDOW_TITLE: &str = "Tickframe";
pub const OVERLAY_TOGGLE_KEY: KeyCode = KeyCode::F3;

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub window_title: String,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub overlay_visible: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            max_frame_delta: Duration::from_millis(250),
            metrics_log_interval: Duration::from_secs(1),
            overlay_visible: false,
        }
    }
}

impl LoopConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let fallback = Self::default();
        let window_title = settings.get_string(keys::WINDOW_TITLE);
        Self {
            window_title: if window_title.is_empty() {
                fallback.window_title
            } else {
                window_title
            },
            max_frame_delta: normalize_non_zero_duration(
                millis_setting(settings, keys::MAX_FRAME_DELTA_MS),
                fallback.max_frame_delta,
            ),
            metrics_log_interval: normalize_non_zero_duration(
                millis_setting(settings, keys::METRICS_LOG_INTERVAL_MS),
                fallback.metrics_log_interval,
            ),
            overlay_visible: settings.get_bool(keys::OVERLAY_VISIBLE),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to initialize render surface: {0}")]
    Surface(#[from] RendererError),
}

/// Sequences one tick as `step` then `render`.
///
/// Drive it with `while game.step() { game.render(); }`. Once `step` returns
/// false the scene is unloaded, settings are saved and the surface is
/// released; the instance stays stopped.
pub struct GameLoop<P: Platform = DefaultPlatform> {
    renderer: Renderer<P>,
    tracker: InputTracker,
    controls: Controls,
    scene: SceneRuntime,
    settings: Settings,
    overlay: Option<Box<dyn Overlay>>,
    overlay_visible: bool,
    config: LoopConfig,
    metrics: MetricsAccumulator,
    latest_metrics: LoopMetricsSnapshot,
    pending_surface: Option<RenderSurfaceConfig>,
    running: bool,
}

impl GameLoop<DefaultPlatform> {
    pub fn new(
        user_settings: Option<&Path>,
        default_settings: Option<&Path>,
        scene: Box<dyn Scene>,
    ) -> Result<Self, AppError> {
        Self::with_platform(
            DefaultPlatform::default(),
            user_settings,
            default_settings,
            scene,
        )
    }
}

impl<P: Platform> GameLoop<P> {
    pub fn with_platform(
        platform: P,
        user_settings: Option<&Path>,
        default_settings: Option<&Path>,
        scene: Box<dyn Scene>,
    ) -> Result<Self, AppError> {
        let settings = Settings::load(user_settings, default_settings)?;
        Self::with_settings(platform, settings, scene)
    }

    pub fn with_settings(
        platform: P,
        settings: Settings,
        scene: Box<dyn Scene>,
    ) -> Result<Self, AppError> {
        let config = LoopConfig::from_settings(&settings);
        let surface = RenderSurfaceConfig::from_settings(&settings);

        let mut renderer = Renderer::new(platform);
        renderer.set_title(&config.window_title);
        renderer.try_init(surface)?;

        info!(
            window_title = %config.window_title,
            max_frame_delta_ms = config.max_frame_delta.as_millis() as u64,
            metrics_log_interval_ms = config.metrics_log_interval.as_millis() as u64,
            persistent_settings = settings.is_persistent(),
            "loop_config"
        );

        let mut scene = SceneRuntime::new(scene);
        scene.surface_changed(renderer.params());

        Ok(Self {
            renderer,
            tracker: InputTracker::new(),
            controls: Controls::new(),
            scene,
            settings,
            overlay: None,
            overlay_visible: config.overlay_visible,
            metrics: MetricsAccumulator::new(config.metrics_log_interval, Instant::now()),
            latest_metrics: LoopMetricsSnapshot::default(),
            pending_surface: None,
            config,
            running: true,
        })
    }

    pub fn with_overlay(mut self, overlay: Box<dyn Overlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Runs until a stop condition is observed.
    pub fn run(mut self) {
        while self.step() {
            self.render();
        }
    }

    /// Updates controls, handles platform and pending scene triggers, then
    /// advances the scene. Returns false as soon as any stop condition is seen.
    pub fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let mut close_requested = false;
        let tracker = &mut self.tracker;
        self.renderer.poll_events(|event| {
            if event == PlatformEvent::CloseRequested {
                close_requested = true;
            }
            tracker.handle_event(&event);
        });
        self.controls.update(self.tracker.snapshot());

        if close_requested {
            self.stop("window_close");
            return false;
        }
        if self.renderer.take_present_failure() {
            self.stop("present_failed");
            return false;
        }
        if let Some(next) = self.pending_surface.take() {
            if !self.apply_surface_config(next) {
                self.stop("surface_lost");
                return false;
            }
        }
        if !self.renderer.is_initialized() {
            self.stop("surface_lost");
            return false;
        }
        if self.controls.is_pressed(OVERLAY_TOGGLE_KEY) {
            self.overlay_visible = !self.overlay_visible;
            self.settings.set(keys::OVERLAY_VISIBLE, self.overlay_visible);
            info!(overlay_visible = self.overlay_visible, "overlay_toggled");
        }

        let delta_ms = clamp_delta_ms(self.renderer.delta_ms(), self.config.max_frame_delta);
        let command = self.scene.advance(delta_ms, &self.controls);
        self.metrics.record_step();

        match command {
            SceneCommand::None => true,
            SceneCommand::Quit => {
                self.stop("scene_quit");
                false
            }
            SceneCommand::Reconfigure(next) => {
                self.pending_surface = Some(next);
                true
            }
        }
    }

    /// Clears, draws the scene and overlay, then presents.
    pub fn render(&mut self) {
        if !self.running {
            warn!("render_after_stop");
            return;
        }

        self.renderer.clear_screen(self.scene.clear_color());
        let stats = self.frame_stats();
        if let Some(mut canvas) = self.renderer.canvas() {
            self.scene.draw(&mut canvas);
            if self.overlay_visible {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.draw(&mut canvas, &stats);
                }
            }
        }

        let frames_before = self.renderer.frames();
        self.renderer.render();
        if self.renderer.frames() == frames_before {
            return;
        }

        self.metrics.record_frame(self.renderer.delta_ms());
        if let Some(snapshot) = self.metrics.maybe_snapshot(Instant::now()) {
            self.latest_metrics = snapshot;
            info!(
                fps = snapshot.fps,
                steps_per_second = snapshot.steps_per_second,
                frame_time_ms = snapshot.frame_time_ms,
                worst_frame_ms = snapshot.worst_frame_ms,
                frames = self.renderer.frames(),
                "loop_metrics"
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn renderer(&self) -> &Renderer<P> {
        &self.renderer
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn metrics(&self) -> LoopMetricsSnapshot {
        self.latest_metrics
    }

    fn frame_stats(&self) -> FrameStats {
        FrameStats {
            metrics: self.latest_metrics,
            delta_ms: self.renderer.delta_ms(),
            frames: self.renderer.frames(),
            logical_size: (self.renderer.width(), self.renderer.height()),
            physical_size: self.renderer.physical_size(),
            scale: self.renderer.scale(),
        }
    }

    /// Re-inits with `next`, falling back to the previous config, and tells
    /// the scene which one is live. Returns false only when neither config
    /// yields a surface.
    fn apply_surface_config(&mut self, next: RenderSurfaceConfig) -> bool {
        let previous = self.renderer.params();
        if self.renderer.init(next) {
            next.store(&mut self.settings);
            info!(
                mode = ?next.mode,
                width = self.renderer.width(),
                height = self.renderer.height(),
                "surface_reconfigured"
            );
        } else {
            warn!(mode = ?next.mode, "surface_reconfigure_failed; restoring previous config");
            if !self.renderer.init(previous) {
                return false;
            }
        }
        self.scene.surface_changed(self.renderer.params());
        true
    }

    fn stop(&mut self, reason: &'static str) {
        if !self.running {
            return;
        }
        self.running = false;
        info!(reason, frames = self.renderer.frames(), "shutdown_requested");

        self.scene.unload();
        if let Err(error) = self.settings.save() {
            warn!(error = %error, "settings_save_failed");
        }
        self.renderer.shutdown();
        info!("shutdown");
    }
}

impl<P: Platform> Drop for GameLoop<P> {
    fn drop(&mut self) {
        self.stop("dropped");
    }
}

fn clamp_delta_ms(delta_ms: f64, max_frame_delta: Duration) -> f64 {
    let max_ms = max_frame_delta.as_secs_f64() * 1000.0;
    if delta_ms > max_ms {
        debug!(delta_ms, max_ms, "frame_delta_clamped");
        max_ms
    } else {
        delta_ms.max(0.0)
    }
}

fn millis_setting(settings: &Settings, key: &str) -> Duration {
    Duration::from_millis(settings.get_i64(key).max(0) as u64)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
