use tracing::{debug, info};

use super::{Canvas, Controls, RenderSurfaceConfig, RendererColor};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    None,
    /// Stop the loop at the end of this step.
    Quit,
    /// Recreate the surface with this config at the start of the next step.
    Reconfigure(RenderSurfaceConfig),
}

/// Game content advanced and drawn once per tick by [`crate::app::GameLoop`].
pub trait Scene {
    fn load(&mut self) {}

    /// Advances simulation by `delta_ms` using this tick's input edges.
    fn advance(&mut self, delta_ms: f64, controls: &Controls) -> SceneCommand;

    /// Draws in logical coordinates after the screen was cleared.
    fn draw(&mut self, canvas: &mut Canvas<'_>);

    fn unload(&mut self) {}

    /// Receives the config the surface is actually running with: once at
    /// startup and after every reconfigure, including one that was rolled back.
    fn surface_changed(&mut self, _config: RenderSurfaceConfig) {}

    fn clear_color(&self) -> RendererColor {
        RendererColor::BLACK
    }

    fn name(&self) -> &str {
        "scene"
    }
}

/// Tracks whether the boxed scene is loaded so load and unload run once each.
pub(crate) struct SceneRuntime {
    scene: Box<dyn Scene>,
    is_loaded: bool,
}

impl SceneRuntime {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            is_loaded: false,
        }
    }

    pub(crate) fn ensure_loaded(&mut self) {
        if !self.is_loaded {
            self.scene.load();
            self.is_loaded = true;
            info!(scene = self.scene.name(), "scene_loaded");
        }
    }

    pub(crate) fn advance(&mut self, delta_ms: f64, controls: &Controls) -> SceneCommand {
        self.ensure_loaded();
        self.scene.advance(delta_ms, controls)
    }

    pub(crate) fn draw(&mut self, canvas: &mut Canvas<'_>) {
        if self.is_loaded {
            self.scene.draw(canvas);
        }
    }

    pub(crate) fn surface_changed(&mut self, config: RenderSurfaceConfig) {
        debug!(scene = self.scene.name(), mode = ?config.mode, "scene_surface_changed");
        self.scene.surface_changed(config);
    }

    pub(crate) fn clear_color(&self) -> RendererColor {
        self.scene.clear_color()
    }

    pub(crate) fn unload(&mut self) {
        if self.is_loaded {
            self.scene.unload();
            self.is_loaded = false;
            info!(scene = self.scene.name(), "scene_unloaded");
        }
    }

    #[cfg(test)]
    pub(crate) fn is_loaded(&self) -> bool {
        self.is_loaded
    }
}
