use std::time::Instant;

/// Timestamp pair and frame counter advanced once per completed present.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FrameClock {
    frames: u64,
    last_tick: Option<Instant>,
    current_tick: Option<Instant>,
    delta_ms: f64,
}

impl FrameClock {
    pub(crate) fn record_present(&mut self, now: Instant) {
        self.last_tick = self.current_tick;
        self.current_tick = Some(now);
        self.delta_ms = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).as_secs_f64() * 1000.0,
            None => 0.0,
        };
        self.frames = self.frames.saturating_add(1);
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    pub(crate) fn delta_ms(&self) -> f64 {
        self.delta_ms
    }
}
