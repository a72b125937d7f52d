mod canvas;
mod font;
mod frame_clock;
mod renderer;
mod surface;

pub use canvas::Canvas;
pub use renderer::{Renderer, RendererColor, RendererError};
pub use surface::{RenderSurfaceConfig, SurfaceLayout, SurfaceMode};

pub(crate) use font::{glyph_advance, line_advance};
