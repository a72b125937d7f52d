mod controls;
mod input;
mod loop_runner;
mod metrics;
mod overlay;
mod platform;
mod rendering;
mod scene;

pub use controls::{Controls, Edge};
pub use input::{InputSnapshot, InputSource, InputTracker};
pub use loop_runner::{AppError, GameLoop, LoopConfig, DEFAULT_WINDOW_TITLE, OVERLAY_TOGGLE_KEY};
pub use metrics::LoopMetricsSnapshot;
pub use overlay::{DiagnosticsOverlay, FrameStats, Overlay};
pub use platform::{
    DefaultPlatform, EventInjector, HeadlessPlatform, Platform, PlatformError, PlatformEvent,
    WinitPlatform,
};
pub use rendering::{
    Canvas, RenderSurfaceConfig, Renderer, RendererColor, RendererError, SurfaceLayout,
    SurfaceMode,
};
pub use scene::{Scene, SceneCommand};
