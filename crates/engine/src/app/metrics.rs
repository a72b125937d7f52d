use std::time::{Duration, Instant};

/// Loop rates and renderer frame timing over the last completed window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub steps_per_second: f32,
    /// Mean renderer delta over frames that had one.
    pub frame_time_ms: f32,
    pub worst_frame_ms: f32,
}

/// Counts presented frames and scene steps, and folds in the renderer's
/// frame delta, until the window elapses.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    window_start: Instant,
    window: Duration,
    frames: u64,
    steps: u64,
    timed_frames: u64,
    delta_sum_ms: f64,
    delta_worst_ms: f64,
}

impl MetricsAccumulator {
    pub(crate) fn new(window: Duration, now: Instant) -> Self {
        Self {
            window_start: now,
            window,
            frames: 0,
            steps: 0,
            timed_frames: 0,
            delta_sum_ms: 0.0,
            delta_worst_ms: 0.0,
        }
    }

    /// Records one presented frame. A zero delta (the first frames after an
    /// init) counts toward fps but not toward frame time.
    pub(crate) fn record_frame(&mut self, delta_ms: f64) {
        self.frames = self.frames.saturating_add(1);
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.timed_frames = self.timed_frames.saturating_add(1);
            self.delta_sum_ms += delta_ms;
            self.delta_worst_ms = self.delta_worst_ms.max(delta_ms);
        }
    }

    pub(crate) fn record_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f64().max(f64::EPSILON);
        let frame_time_ms = if self.timed_frames == 0 {
            0.0
        } else {
            self.delta_sum_ms / self.timed_frames as f64
        };
        let snapshot = LoopMetricsSnapshot {
            fps: (self.frames as f64 / elapsed_seconds) as f32,
            steps_per_second: (self.steps as f64 / elapsed_seconds) as f32,
            frame_time_ms: frame_time_ms as f32,
            worst_frame_ms: self.delta_worst_ms as f32,
        };

        *self = Self::new(self.window, now);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_rates_and_frame_times() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);

        accumulator.record_frame(12.0);
        accumulator.record_frame(20.0);
        for _ in 0..4 {
            accumulator.record_step();
        }

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert!((snapshot.fps - 2.0).abs() < 0.05);
        assert!((snapshot.steps_per_second - 4.0).abs() < 0.05);
        assert!((snapshot.frame_time_ms - 16.0).abs() < 0.001);
        assert!((snapshot.worst_frame_ms - 20.0).abs() < 0.001);
    }

    #[test]
    fn untimed_frames_count_for_fps_only() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);

        accumulator.record_frame(0.0);
        accumulator.record_frame(0.0);
        accumulator.record_frame(10.0);
        accumulator.record_frame(f64::NAN);

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot");

        assert!((snapshot.fps - 4.0).abs() < 0.05);
        assert!((snapshot.frame_time_ms - 10.0).abs() < 0.001);
    }

    #[test]
    fn snapshot_not_emitted_before_window_elapses() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);
        accumulator.record_frame(16.0);

        assert!(accumulator
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn counters_reset_after_each_snapshot() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);
        accumulator.record_frame(10.0);
        accumulator.record_step();
        accumulator.maybe_snapshot(base + Duration::from_secs(1));

        let next = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("second snapshot");

        assert_eq!(next, LoopMetricsSnapshot::default());
    }
}
