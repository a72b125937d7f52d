use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::app::{DefaultPlatform, Platform, PlatformError, PlatformEvent};

use super::canvas::Canvas;
use super::frame_clock::FrameClock;
use super::surface::{resolve_layout, RenderSurfaceConfig, SurfaceLayout};

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("scale factor must be a positive finite number, got {0}")]
    InvalidScale(f32),
    #[error("windowed mode needs a positive width and height, got {width}x{height}")]
    WindowSizeUnset { width: u32, height: u32 },
    #[error("display resolution could not be detected")]
    DisplayUnknown,
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Default for RendererColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl RendererColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 0xFF)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SurfaceState {
    logical_width: u32,
    logical_height: u32,
    physical_width: u32,
    physical_height: u32,
    scale: f32,
}

impl From<&SurfaceLayout> for SurfaceState {
    fn from(layout: &SurfaceLayout) -> Self {
        Self {
            logical_width: layout.logical_width,
            logical_height: layout.logical_height,
            physical_width: layout.physical_width,
            physical_height: layout.physical_height,
            scale: layout.scale,
        }
    }
}

/// Owns the drawing surface, its logical/physical resolution and frame timing.
///
/// Every getter is safe before [`Renderer::init`] succeeds: sizes read 0, the
/// scale reads 1 and timing reads 0.
pub struct Renderer<P: Platform = DefaultPlatform> {
    platform: P,
    params: RenderSurfaceConfig,
    surface: Option<SurfaceState>,
    clock: FrameClock,
    present_failed: bool,
}

impl<P: Platform + Default> Default for Renderer<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: Platform> Renderer<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            params: RenderSurfaceConfig::default(),
            surface: None,
            clock: FrameClock::default(),
            present_failed: false,
        }
    }

    /// Creates the surface described by `config`, replacing any existing one.
    /// Returns false on failure, leaving the renderer uninitialized.
    pub fn init(&mut self, config: RenderSurfaceConfig) -> bool {
        match self.try_init(config) {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, mode = ?config.mode, "surface_init_failed");
                false
            }
        }
    }

    pub fn try_init(&mut self, config: RenderSurfaceConfig) -> Result<(), RendererError> {
        self.params = config;
        self.shutdown();

        let display = if config.needs_display() {
            Some(self.platform.display_size()?)
        } else {
            None
        };
        let layout = resolve_layout(&config, display)?;
        self.platform.create_surface(&layout)?;

        self.surface = Some(SurfaceState::from(&layout));
        info!(
            mode = ?layout.mode,
            logical_width = layout.logical_width,
            logical_height = layout.logical_height,
            physical_width = layout.physical_width,
            physical_height = layout.physical_height,
            scale = layout.scale,
            "surface_initialized"
        );
        Ok(())
    }

    /// Re-runs [`Renderer::init`] with the stored params.
    pub fn reinit(&mut self) -> bool {
        self.init(self.params)
    }

    /// Stores params for the next `init`; the live surface is untouched.
    pub fn set_params(&mut self, config: RenderSurfaceConfig) {
        self.params = config;
    }

    pub fn params(&self) -> RenderSurfaceConfig {
        self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    pub fn width(&self) -> u32 {
        self.surface.map_or(0, |surface| surface.logical_width)
    }

    pub fn height(&self) -> u32 {
        self.surface.map_or(0, |surface| surface.logical_height)
    }

    pub fn physical_size(&self) -> (u32, u32) {
        self.surface.map_or((0, 0), |surface| {
            (surface.physical_width, surface.physical_height)
        })
    }

    pub fn scale(&self) -> f32 {
        self.surface.map_or(1.0, |surface| surface.scale)
    }

    /// Milliseconds between the two most recent completed renders; 0 until two
    /// renders have happened since init.
    pub fn delta_ms(&self) -> f64 {
        if self.surface.is_none() {
            return 0.0;
        }
        self.clock.delta_ms()
    }

    pub fn frames(&self) -> u64 {
        if self.surface.is_none() {
            return 0;
        }
        self.clock.frames()
    }

    pub fn set_title(&mut self, title: &str) {
        self.platform.set_title(title);
    }

    pub fn clear_screen(&mut self, color: RendererColor) {
        if let Some(mut canvas) = self.canvas() {
            canvas.fill(color);
        }
    }

    pub fn canvas(&mut self) -> Option<Canvas<'_>> {
        let surface = self.surface?;
        let frame = self.platform.frame_mut()?;
        Some(Canvas::new(
            frame,
            surface.logical_width,
            surface.logical_height,
            surface.scale,
        ))
    }

    /// Presents the frame, then advances the timestamp pair and frame count.
    /// A failed present is not counted and is reported through
    /// [`Renderer::take_present_failure`].
    pub fn render(&mut self) {
        if self.surface.is_none() {
            return;
        }
        match self.platform.present() {
            Ok(()) => self.clock.record_present(Instant::now()),
            Err(error) => {
                warn!(error = %error, frames = self.clock.frames(), "present_failed");
                self.present_failed = true;
            }
        }
    }

    pub fn take_present_failure(&mut self) -> bool {
        std::mem::take(&mut self.present_failed)
    }

    /// Drains native events. Resizes update the physical size only; logical
    /// size and scale hold until the next `init`.
    pub fn poll_events(&mut self, mut sink: impl FnMut(PlatformEvent)) {
        let surface = &mut self.surface;
        self.platform.poll_events(&mut |event| {
            if let PlatformEvent::Resized { width, height } = event {
                if let Some(surface) = surface.as_mut() {
                    surface.physical_width = width;
                    surface.physical_height = height;
                }
            }
            sink(event);
        });
    }

    /// Releases the surface and resets size and timing state.
    pub fn shutdown(&mut self) {
        if self.surface.take().is_some() {
            self.platform.release_surface();
            info!("surface_released");
        }
        self.clock = FrameClock::default();
        self.present_failed = false;
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}
