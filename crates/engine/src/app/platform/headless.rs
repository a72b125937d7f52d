use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::app::{InputSource, SurfaceLayout};

use super::{sealed, Platform, PlatformError, PlatformEvent};

const DEFAULT_DISPLAY_SIZE: (u32, u32) = (1920, 1080);

/// Handle for feeding native events into a [`HeadlessPlatform`] from outside
/// the loop that owns it.
#[derive(Debug, Clone, Default)]
pub struct EventInjector {
    queue: Rc<RefCell<VecDeque<PlatformEvent>>>,
}

impl EventInjector {
    pub fn push(&self, event: PlatformEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    pub fn press(&self, source: InputSource) {
        self.push(PlatformEvent::SourceDown(source));
    }

    pub fn release(&self, source: InputSource) {
        self.push(PlatformEvent::SourceUp(source));
    }

    pub fn request_close(&self) {
        self.push(PlatformEvent::CloseRequested);
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn drain(&self) -> Vec<PlatformEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }
}

/// In-memory backend: a frame buffer, a fake display and scripted events.
#[derive(Debug)]
pub struct HeadlessPlatform {
    display_size: Option<(u32, u32)>,
    title: String,
    surface: Option<SurfaceLayout>,
    frame: Vec<u8>,
    events: EventInjector,
    reject_surfaces: bool,
    fail_presents: bool,
    presented: u64,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self {
            display_size: Some(DEFAULT_DISPLAY_SIZE),
            title: String::new(),
            surface: None,
            frame: Vec::new(),
            events: EventInjector::default(),
            reject_surfaces: false,
            fail_presents: false,
            presented: 0,
        }
    }
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_size(mut self, display_size: Option<(u32, u32)>) -> Self {
        self.display_size = display_size;
        self
    }

    pub fn injector(&self) -> EventInjector {
        self.events.clone()
    }

    pub fn set_reject_surfaces(&mut self, reject: bool) {
        self.reject_surfaces = reject;
    }

    pub fn set_fail_presents(&mut self, fail: bool) {
        self.fail_presents = fail;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn surface(&self) -> Option<&SurfaceLayout> {
        self.surface.as_ref()
    }

    pub fn frame(&self) -> Option<&[u8]> {
        self.surface.map(|_| self.frame.as_slice())
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented
    }
}

impl sealed::Sealed for HeadlessPlatform {}

impl Platform for HeadlessPlatform {
    fn display_size(&mut self) -> Result<(u32, u32), PlatformError> {
        self.display_size.ok_or(PlatformError::NoDisplay)
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn create_surface(&mut self, layout: &SurfaceLayout) -> Result<(), PlatformError> {
        self.release_surface();
        if self.reject_surfaces {
            return Err(PlatformError::Rejected("headless surface creation disabled"));
        }

        let byte_len = layout.logical_width as usize * layout.logical_height as usize * 4;
        self.frame = vec![0; byte_len];
        self.surface = Some(*layout);
        Ok(())
    }

    fn release_surface(&mut self) {
        self.surface = None;
        self.frame = Vec::new();
    }

    fn frame_mut(&mut self) -> Option<&mut [u8]> {
        self.surface?;
        Some(self.frame.as_mut_slice())
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        if self.surface.is_none() {
            return Err(PlatformError::NoSurface);
        }
        if self.fail_presents {
            return Err(PlatformError::Rejected("headless present disabled"));
        }
        self.presented = self.presented.saturating_add(1);
        Ok(())
    }

    fn poll_events(&mut self, sink: &mut dyn FnMut(PlatformEvent)) {
        for event in self.events.drain() {
            sink(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use super::*;
    use crate::app::SurfaceMode;

    fn layout(width: u32, height: u32) -> SurfaceLayout {
        SurfaceLayout {
            mode: SurfaceMode::Windowed,
            physical_width: width,
            physical_height: height,
            logical_width: width,
            logical_height: height,
            scale: 1.0,
        }
    }

    #[test]
    fn created_surface_has_logical_rgba_buffer() {
        let mut platform = HeadlessPlatform::new();

        platform.create_surface(&layout(4, 3)).expect("surface");

        assert_eq!(platform.frame_mut().map(|frame| frame.len()), Some(48));
    }

    #[test]
    fn rejected_surface_leaves_nothing_behind() {
        let mut platform = HeadlessPlatform::new();
        platform.create_surface(&layout(4, 3)).expect("surface");
        platform.set_reject_surfaces(true);

        assert!(platform.create_surface(&layout(8, 8)).is_err());
        assert!(platform.surface().is_none());
        assert!(platform.frame_mut().is_none());
    }

    #[test]
    fn present_without_surface_fails() {
        let mut platform = HeadlessPlatform::new();

        assert!(matches!(platform.present(), Err(PlatformError::NoSurface)));
        assert_eq!(platform.presented_frames(), 0);
    }

    #[test]
    fn injected_events_are_drained_in_order_once() {
        let mut platform = HeadlessPlatform::new();
        let injector = platform.injector();
        injector.press(InputSource::Key(KeyCode::Space));
        injector.request_close();

        let mut seen = Vec::new();
        platform.poll_events(&mut |event| seen.push(event));
        let mut second = Vec::new();
        platform.poll_events(&mut |event| second.push(event));

        assert_eq!(
            seen,
            vec![
                PlatformEvent::SourceDown(InputSource::Key(KeyCode::Space)),
                PlatformEvent::CloseRequested,
            ]
        );
        assert!(second.is_empty());
        assert_eq!(injector.pending(), 0);
    }

    #[test]
    fn missing_display_is_reported() {
        let mut platform = HeadlessPlatform::new().with_display_size(None);

        assert!(matches!(platform.display_size(), Err(PlatformError::NoDisplay)));
    }
}
