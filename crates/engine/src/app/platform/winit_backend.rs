use std::sync::Arc;
use std::time::Duration;

use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::PhysicalKey;
use winit::monitor::MonitorHandle;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::app::{InputSource, SurfaceLayout, SurfaceMode};

use super::{sealed, Platform, PlatformError, PlatformEvent};

const DEFAULT_TITLE: &str = "Tickframe";

/// Desktop backend: a winit window presented through a `pixels` surface.
///
/// The pixel buffer is sized to the logical resolution and the surface texture
/// to the physical one, so `pixels` performs the upscale on present.
pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    title: String,
}

impl Default for WinitPlatform {
    fn default() -> Self {
        Self {
            event_loop: None,
            window: None,
            pixels: None,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }

    pub fn pixels(&self) -> Option<&Pixels<'static>> {
        self.pixels.as_ref()
    }

    fn event_loop(&mut self) -> Result<&EventLoop<()>, PlatformError> {
        if self.event_loop.is_none() {
            let event_loop = EventLoop::new().map_err(PlatformError::CreateEventLoop)?;
            self.event_loop = Some(event_loop);
        }
        self.event_loop.as_ref().ok_or(PlatformError::NoDisplay)
    }

    fn current_monitor(&mut self) -> Result<Option<MonitorHandle>, PlatformError> {
        let event_loop = self.event_loop()?;
        Ok(event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next()))
    }
}

impl sealed::Sealed for WinitPlatform {}

impl Platform for WinitPlatform {
    fn display_size(&mut self) -> Result<(u32, u32), PlatformError> {
        let monitor = self.current_monitor()?.ok_or(PlatformError::NoDisplay)?;
        let size = monitor.size();
        Ok((size.width, size.height))
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        if let Some(window) = self.window.as_ref() {
            window.set_title(title);
        }
    }

    fn create_surface(&mut self, layout: &SurfaceLayout) -> Result<(), PlatformError> {
        self.release_surface();

        let monitor = self.current_monitor()?;
        let fullscreen = fullscreen_for(layout, monitor);
        let title = self.title.clone();
        let event_loop = self.event_loop()?;
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(
                layout.physical_width,
                layout.physical_height,
            ))
            .with_fullscreen(fullscreen)
            .build(event_loop)
            .map_err(PlatformError::CreateWindow)?;
        let window = Arc::new(window);

        let surface = SurfaceTexture::new(
            layout.physical_width,
            layout.physical_height,
            Arc::clone(&window),
        );
        let pixels = Pixels::new(layout.logical_width, layout.logical_height, surface)
            .map_err(PlatformError::CreatePixels)?;

        self.window = Some(window);
        self.pixels = Some(pixels);
        Ok(())
    }

    fn release_surface(&mut self) {
        self.pixels = None;
        self.window = None;
    }

    fn frame_mut(&mut self) -> Option<&mut [u8]> {
        self.pixels.as_mut().map(|pixels| pixels.frame_mut())
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        let pixels = self.pixels.as_mut().ok_or(PlatformError::NoSurface)?;
        pixels.render().map_err(PlatformError::Present)
    }

    fn poll_events(&mut self, sink: &mut dyn FnMut(PlatformEvent)) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };
        let window_id = self.window.as_ref().map(|window| window.id());
        let pixels = &mut self.pixels;

        let status = event_loop.pump_events(Some(Duration::ZERO), |event, _target| {
            let Event::WindowEvent {
                window_id: event_window,
                event,
            } = event
            else {
                return;
            };
            if Some(event_window) != window_id {
                return;
            }

            match event {
                WindowEvent::CloseRequested => sink(PlatformEvent::CloseRequested),
                WindowEvent::Focused(false) => sink(PlatformEvent::FocusLost),
                WindowEvent::Resized(size) => {
                    if size.width == 0 || size.height == 0 {
                        return;
                    }
                    if let Some(pixels) = pixels.as_mut() {
                        if let Err(error) = pixels.resize_surface(size.width, size.height) {
                            warn!(error = %error, "surface_resize_failed");
                            return;
                        }
                    }
                    sink(PlatformEvent::Resized {
                        width: size.width,
                        height: size.height,
                    });
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        sink(source_event(InputSource::Key(code), event.state));
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    sink(source_event(InputSource::Mouse(button), state));
                }
                _ => {}
            }
        });

        if let PumpStatus::Exit(code) = status {
            debug!(code, "event_loop_exited");
            sink(PlatformEvent::CloseRequested);
        }
    }
}

fn source_event(source: InputSource, state: ElementState) -> PlatformEvent {
    match state {
        ElementState::Pressed => PlatformEvent::SourceDown(source),
        ElementState::Released => PlatformEvent::SourceUp(source),
    }
}

fn fullscreen_for(layout: &SurfaceLayout, monitor: Option<MonitorHandle>) -> Option<Fullscreen> {
    match layout.mode {
        SurfaceMode::Windowed => None,
        SurfaceMode::SoftFullscreen => Some(Fullscreen::Borderless(monitor)),
        SurfaceMode::HardFullscreen => {
            let video_mode = monitor.as_ref().and_then(|monitor| {
                monitor
                    .video_modes()
                    .filter(|mode| {
                        let size = mode.size();
                        size.width == layout.physical_width
                            && size.height == layout.physical_height
                    })
                    .max_by_key(|mode| (mode.bit_depth(), mode.refresh_rate_millihertz()))
            });
            match video_mode {
                Some(video_mode) => Some(Fullscreen::Exclusive(video_mode)),
                None => {
                    warn!(
                        width = layout.physical_width,
                        height = layout.physical_height,
                        "exclusive_mode_unavailable; using borderless fullscreen"
                    );
                    Some(Fullscreen::Borderless(monitor))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::event::MouseButton;
    use winit::keyboard::KeyCode;

    use super::*;

    fn layout(mode: SurfaceMode) -> SurfaceLayout {
        SurfaceLayout {
            mode,
            physical_width: 1280,
            physical_height: 720,
            logical_width: 1280,
            logical_height: 720,
            scale: 1.0,
        }
    }

    #[test]
    fn element_state_maps_to_source_edges() {
        let key = InputSource::Key(KeyCode::KeyZ);
        let button = InputSource::Mouse(MouseButton::Left);

        assert_eq!(
            source_event(key, ElementState::Pressed),
            PlatformEvent::SourceDown(key)
        );
        assert_eq!(
            source_event(button, ElementState::Released),
            PlatformEvent::SourceUp(button)
        );
    }

    #[test]
    fn windowed_layout_requests_no_fullscreen() {
        assert!(fullscreen_for(&layout(SurfaceMode::Windowed), None).is_none());
    }

    #[test]
    fn fullscreen_modes_without_monitor_fall_back_to_borderless() {
        for mode in [SurfaceMode::SoftFullscreen, SurfaceMode::HardFullscreen] {
            assert!(matches!(
                fullscreen_for(&layout(mode), None),
                Some(Fullscreen::Borderless(None))
            ));
        }
    }

    #[test]
    fn platform_without_surface_has_no_frame_and_cannot_present() {
        let mut platform = WinitPlatform::new();

        assert!(platform.frame_mut().is_none());
        assert!(matches!(platform.present(), Err(PlatformError::NoSurface)));
        assert!(platform.window().is_none());
    }
}
