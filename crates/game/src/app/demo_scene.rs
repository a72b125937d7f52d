use engine::{
    Canvas, Controls, InputSource, KeyCode, RenderSurfaceConfig, RendererColor, Scene,
    SceneCommand, SurfaceMode,
};
use tracing::info;

const LEFT: [InputSource; 2] = [
    InputSource::Key(KeyCode::ArrowLeft),
    InputSource::Key(KeyCode::KeyA),
];
const RIGHT: [InputSource; 2] = [
    InputSource::Key(KeyCode::ArrowRight),
    InputSource::Key(KeyCode::KeyD),
];
const UP: [InputSource; 2] = [
    InputSource::Key(KeyCode::ArrowUp),
    InputSource::Key(KeyCode::KeyW),
];
const DOWN: [InputSource; 2] = [
    InputSource::Key(KeyCode::ArrowDown),
    InputSource::Key(KeyCode::KeyS),
];

const SQUARE_SIZE: f32 = 24.0;
const SPEED_PX_PER_SECOND: f32 = 240.0;
const FLASH_DURATION_MS: f64 = 180.0;
const WINDOWED_SIZE: (u32, u32) = (1280, 720);

const BACKGROUND: RendererColor = RendererColor::rgb(18, 22, 30);
const SQUARE_COLOR: RendererColor = RendererColor::rgb(90, 200, 140);
const FLASH_COLOR: RendererColor = RendererColor::rgb(250, 240, 120);
const FRAME_COLOR: RendererColor = RendererColor::rgb(60, 70, 90);
const HINT_COLOR: RendererColor = RendererColor::rgb(140, 150, 170);

/// A square steered with the arrow keys or WASD.
pub(crate) struct DemoScene {
    position: (f32, f32),
    bounds: Option<(f32, f32)>,
    flash_remaining_ms: f64,
    /// Live surface as last reported by the loop.
    surface: RenderSurfaceConfig,
}

impl DemoScene {
    pub(crate) fn new(surface: RenderSurfaceConfig) -> Self {
        Self {
            position: (0.0, 0.0),
            bounds: None,
            flash_remaining_ms: 0.0,
            surface,
        }
    }

    fn toggled_surface(&self) -> RenderSurfaceConfig {
        match self.surface.mode {
            SurfaceMode::Windowed => RenderSurfaceConfig {
                mode: SurfaceMode::SoftFullscreen,
                ..self.surface
            },
            SurfaceMode::SoftFullscreen | SurfaceMode::HardFullscreen => {
                let (width, height) = if self.surface.width > 0 && self.surface.height > 0 {
                    (self.surface.width, self.surface.height)
                } else {
                    WINDOWED_SIZE
                };
                RenderSurfaceConfig::windowed(width, height).with_scale(self.surface.scale)
            }
        }
    }

    fn clamp_to_bounds(&mut self) {
        if let Some((width, height)) = self.bounds {
            self.position.0 = self.position.0.clamp(0.0, (width - SQUARE_SIZE).max(0.0));
            self.position.1 = self.position.1.clamp(0.0, (height - SQUARE_SIZE).max(0.0));
        }
    }
}

impl Scene for DemoScene {
    fn load(&mut self) {
        self.position = (0.0, 0.0);
        self.bounds = None;
    }

    fn advance(&mut self, delta_ms: f64, controls: &Controls) -> SceneCommand {
        if controls.is_pressed(KeyCode::Escape) {
            info!(reason = "escape_key", "quit_requested");
            return SceneCommand::Quit;
        }

        let step = SPEED_PX_PER_SECOND * (delta_ms / 1000.0) as f32;
        self.position.0 += controls.axis(&LEFT, &RIGHT) as f32 * step;
        self.position.1 += controls.axis(&UP, &DOWN) as f32 * step;
        self.clamp_to_bounds();

        self.flash_remaining_ms = (self.flash_remaining_ms - delta_ms).max(0.0);
        if controls.is_pressed(KeyCode::Space) {
            self.flash_remaining_ms = FLASH_DURATION_MS;
        }

        if controls.is_pressed(KeyCode::F11) {
            let next = self.toggled_surface();
            info!(from = ?self.surface.mode, to = ?next.mode, "surface_toggle_requested");
            return SceneCommand::Reconfigure(next);
        }
        SceneCommand::None
    }

    fn draw(&mut self, canvas: &mut Canvas<'_>) {
        let bounds = (canvas.width() as f32, canvas.height() as f32);
        if self.bounds.is_none() {
            self.position = (
                (bounds.0 - SQUARE_SIZE) / 2.0,
                (bounds.1 - SQUARE_SIZE) / 2.0,
            );
        }
        self.bounds = Some(bounds);
        self.clamp_to_bounds();

        canvas.outline_rect(0, 0, canvas.width() as i32, canvas.height() as i32, FRAME_COLOR);
        let color = if self.flash_remaining_ms > 0.0 {
            FLASH_COLOR
        } else {
            SQUARE_COLOR
        };
        canvas.fill_rect(
            self.position.0.round() as i32,
            self.position.1.round() as i32,
            SQUARE_SIZE as i32,
            SQUARE_SIZE as i32,
            color,
        );
        canvas.draw_text(
            4,
            canvas.height() as i32 - 12,
            "ARROWS/WASD MOVE  SPACE FLASH  F3 STATS  F11 WINDOW  ESC QUIT",
            HINT_COLOR,
            1,
        );
    }

    fn surface_changed(&mut self, config: RenderSurfaceConfig) {
        self.surface = config;
    }

    fn clear_color(&self) -> RendererColor {
        BACKGROUND
    }

    fn name(&self) -> &str {
        "demo"
    }
}
