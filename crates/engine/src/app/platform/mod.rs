mod headless;
mod winit_backend;

use pixels::Error as PixelsError;
use thiserror::Error;
use winit::error::{EventLoopError, OsError};

use super::{InputSource, SurfaceLayout};

pub use headless::{EventInjector, HeadlessPlatform};
pub use winit_backend::WinitPlatform;

#[cfg(not(feature = "headless"))]
pub type DefaultPlatform = WinitPlatform;
#[cfg(feature = "headless")]
pub type DefaultPlatform = HeadlessPlatform;

mod sealed {
    pub trait Sealed {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    SourceDown(InputSource),
    SourceUp(InputSource),
    FocusLost,
    Resized { width: u32, height: u32 },
    CloseRequested,
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to create pixel surface: {0}")]
    CreatePixels(#[source] PixelsError),
    #[error("failed to present frame: {0}")]
    Present(#[source] PixelsError),
    #[error("no display is available")]
    NoDisplay,
    #[error("no surface has been created")]
    NoSurface,
    #[error("backend rejected request: {0}")]
    Rejected(&'static str),
}

/// Native windowing and presentation backend driven by the renderer.
///
/// Sealed: the crate ships exactly the backends it knows how to drive, and
/// [`DefaultPlatform`] names the one compiled in.
pub trait Platform: sealed::Sealed {
    /// Native resolution of the display a fullscreen surface would occupy.
    fn display_size(&mut self) -> Result<(u32, u32), PlatformError>;

    /// Title applied to the current surface and any surface created later.
    fn set_title(&mut self, title: &str);

    /// Creates a surface for `layout`, releasing any existing one first. On
    /// error no surface is left behind.
    fn create_surface(&mut self, layout: &SurfaceLayout) -> Result<(), PlatformError>;

    fn release_surface(&mut self);

    /// RGBA8 frame buffer at logical resolution.
    fn frame_mut(&mut self) -> Option<&mut [u8]>;

    fn present(&mut self) -> Result<(), PlatformError>;

    /// Drains pending native events without blocking.
    fn poll_events(&mut self, sink: &mut dyn FnMut(PlatformEvent));
}
