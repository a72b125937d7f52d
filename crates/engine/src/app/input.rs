use std::collections::hash_set;
use std::collections::HashSet;

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use super::PlatformEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

impl From<KeyCode> for InputSource {
    fn from(code: KeyCode) -> Self {
        InputSource::Key(code)
    }
}

impl From<MouseButton> for InputSource {
    fn from(button: MouseButton) -> Self {
        InputSource::Mouse(button)
    }
}

/// Sources active at one tick. Membership only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    active: HashSet<InputSource>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, source: impl Into<InputSource>) -> bool {
        self.active.contains(&source.into())
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, InputSource> {
        self.active.iter()
    }
}

impl FromIterator<InputSource> for InputSnapshot {
    fn from_iter<I: IntoIterator<Item = InputSource>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a InputSnapshot {
    type Item = &'a InputSource;
    type IntoIter = hash_set::Iter<'a, InputSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.active.iter()
    }
}

/// Live source state fed by platform events.
///
/// Sources pressed since the last snapshot are latched until that snapshot is
/// taken, so a tap shorter than one tick is still seen exactly once. A source
/// that was active in the previous snapshot and got released and pressed again
/// before the next one is left out of that snapshot and reported from the one
/// after, so the release and the new press each get their own tick.
#[derive(Debug, Default)]
pub struct InputTracker {
    held: HashSet<InputSource>,
    latched: HashSet<InputSource>,
    last: HashSet<InputSource>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &PlatformEvent) {
        match *event {
            PlatformEvent::SourceDown(source) => {
                // Auto-repeat downs for an already held source are not new presses.
                if self.held.insert(source) {
                    self.latched.insert(source);
                }
            }
            PlatformEvent::SourceUp(source) => {
                self.held.remove(&source);
            }
            PlatformEvent::FocusLost => {
                self.held.clear();
                self.latched.clear();
            }
            PlatformEvent::Resized { .. } | PlatformEvent::CloseRequested => {}
        }
    }

    pub fn is_down(&self, source: impl Into<InputSource>) -> bool {
        self.held.contains(&source.into())
    }

    /// Captures held plus latched sources and clears the latch. Re-presses of
    /// a source from the previous snapshot stay latched for the next one.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let pressed = std::mem::take(&mut self.latched);
        let mut active: HashSet<InputSource> = self.held.union(&pressed).copied().collect();
        for source in pressed.intersection(&self.last) {
            active.remove(source);
            self.latched.insert(*source);
        }
        self.last.clone_from(&active);
        InputSnapshot { active }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACE: InputSource = InputSource::Key(KeyCode::Space);
    const CLICK: InputSource = InputSource::Mouse(MouseButton::Left);

    #[test]
    fn held_source_appears_in_every_snapshot_until_released() {
        let mut tracker = InputTracker::new();
        tracker.handle_event(&PlatformEvent::SourceDown(SPACE));

        assert!(tracker.snapshot().contains(SPACE));
        assert!(tracker.snapshot().contains(SPACE));

        tracker.handle_event(&PlatformEvent::SourceUp(SPACE));
        assert!(!tracker.snapshot().contains(SPACE));
    }

    #[test]
    fn tap_between_snapshots_is_latched_once() {
        let mut tracker = InputTracker::new();
        tracker.handle_event(&PlatformEvent::SourceDown(CLICK));
        tracker.handle_event(&PlatformEvent::SourceUp(CLICK));

        assert!(!tracker.is_down(CLICK));
        assert!(tracker.snapshot().contains(CLICK));
        assert!(!tracker.snapshot().contains(CLICK));
    }

    #[test]
    fn release_and_repress_within_one_tick_is_split_across_snapshots() {
        let mut tracker = InputTracker::new();
        tracker.handle_event(&PlatformEvent::SourceDown(SPACE));
        assert!(tracker.snapshot().contains(SPACE));

        tracker.handle_event(&PlatformEvent::SourceUp(SPACE));
        tracker.handle_event(&PlatformEvent::SourceDown(SPACE));

        assert!(tracker.is_down(SPACE));
        assert!(!tracker.snapshot().contains(SPACE));
        assert!(tracker.snapshot().contains(SPACE));
        assert!(tracker.snapshot().contains(SPACE));
    }

    #[test]
    fn quick_second_tap_while_held_is_not_lost() {
        let mut tracker = InputTracker::new();
        tracker.handle_event(&PlatformEvent::SourceDown(CLICK));
        assert!(tracker.snapshot().contains(CLICK));

        tracker.handle_event(&PlatformEvent::SourceUp(CLICK));
        tracker.handle_event(&PlatformEvent::SourceDown(CLICK));
        tracker.handle_event(&PlatformEvent::SourceUp(CLICK));

        assert!(!tracker.snapshot().contains(CLICK));
        assert!(tracker.snapshot().contains(CLICK));
        assert!(!tracker.snapshot().contains(CLICK));
    }

    #[test]
    fn repeated_down_while_held_does_not_outlive_release() {
        let mut tracker = InputTracker::new();
        tracker.handle_event(&PlatformEvent::SourceDown(SPACE));
        assert!(tracker.snapshot().contains(SPACE));

        tracker.handle_event(&PlatformEvent::SourceDown(SPACE));
        tracker.handle_event(&PlatformEvent::SourceUp(SPACE));

        assert!(!tracker.snapshot().contains(SPACE));
        assert!(!tracker.snapshot().contains(SPACE));
    }

    #[test]
    fn focus_loss_drops_held_sources() {
        let mut tracker = InputTracker::new();
        tracker.handle_event(&PlatformEvent::SourceDown(SPACE));
        tracker.handle_event(&PlatformEvent::SourceDown(CLICK));

        tracker.handle_event(&PlatformEvent::FocusLost);

        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn repeated_down_events_are_idempotent() {
        let mut tracker = InputTracker::new();
        tracker.handle_event(&PlatformEvent::SourceDown(SPACE));
        tracker.handle_event(&PlatformEvent::SourceDown(SPACE));

        let snapshot = tracker.snapshot();

        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn snapshot_collects_from_iterator() {
        let snapshot: InputSnapshot = [SPACE, CLICK].into_iter().collect();

        assert!(snapshot.contains(KeyCode::Space));
        assert!(snapshot.contains(MouseButton::Left));
        assert!(!snapshot.contains(KeyCode::Escape));
    }
}
