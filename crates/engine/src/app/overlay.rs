use super::rendering::{glyph_advance, line_advance};
use super::{Canvas, LoopMetricsSnapshot, RendererColor};

/// Per-frame numbers handed to an [`Overlay`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub metrics: LoopMetricsSnapshot,
    pub delta_ms: f64,
    pub frames: u64,
    pub logical_size: (u32, u32),
    pub physical_size: (u32, u32),
    pub scale: f32,
}

/// Drawn after the scene, before present.
pub trait Overlay {
    fn draw(&mut self, canvas: &mut Canvas<'_>, stats: &FrameStats);
}

const PANEL_COLOR: RendererColor = RendererColor::rgba(0, 0, 0, 170);
const TEXT_COLOR: RendererColor = RendererColor::rgb(220, 240, 220);
const MARGIN: i32 = 4;

pub struct DiagnosticsOverlay {
    pixel_size: i32,
}

impl Default for DiagnosticsOverlay {
    fn default() -> Self {
        Self { pixel_size: 2 }
    }
}

impl DiagnosticsOverlay {
    pub fn new(pixel_size: i32) -> Self {
        Self {
            pixel_size: pixel_size.max(1),
        }
    }

    fn lines(stats: &FrameStats) -> [String; 5] {
        [
            format!("FPS {:.0}", stats.metrics.fps),
            format!(
                "FRAME {:.2} MS  WORST {:.2}",
                stats.metrics.frame_time_ms, stats.metrics.worst_frame_ms
            ),
            format!("DELTA {:.2} MS", stats.delta_ms),
            format!("FRAMES {}", stats.frames),
            format!(
                "{}X{} / {}X{} ({:.2})",
                stats.logical_size.0,
                stats.logical_size.1,
                stats.physical_size.0,
                stats.physical_size.1,
                stats.scale
            ),
        ]
    }
}

impl Overlay for DiagnosticsOverlay {
    fn draw(&mut self, canvas: &mut Canvas<'_>, stats: &FrameStats) {
        let lines = Self::lines(stats);
        let line_height = line_advance(self.pixel_size);
        let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as i32;
        let panel_width = widest * glyph_advance(self.pixel_size) + MARGIN * 2;
        let panel_height = lines.len() as i32 * line_height + MARGIN * 2;

        canvas.fill_rect(0, 0, panel_width, panel_height, PANEL_COLOR);
        let mut y = MARGIN;
        for line in &lines {
            canvas.draw_text(MARGIN, y, line, TEXT_COLOR, self.pixel_size);
            y += line_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_report_sizes_and_timing() {
        let stats = FrameStats {
            delta_ms: 16.5,
            frames: 42,
            logical_size: (640, 360),
            physical_size: (1280, 720),
            scale: 2.0,
            ..FrameStats::default()
        };

        let lines = DiagnosticsOverlay::lines(&stats);

        assert_eq!(lines[2], "DELTA 16.50 MS");
        assert_eq!(lines[3], "FRAMES 42");
        assert_eq!(lines[4], "640X360 / 1280X720 (2.00)");
    }

    #[test]
    fn draw_darkens_panel_in_top_left_corner() {
        let mut frame = vec![255u8; 200 * 100 * 4];
        let mut canvas = Canvas::new(&mut frame, 200, 100, 1.0);
        let mut overlay = DiagnosticsOverlay::new(1);

        overlay.draw(&mut canvas, &FrameStats::default());

        assert!(frame[0] < 255);
        let far_corner = (200 * 100 - 1) * 4;
        assert_eq!(frame[far_corner], 255);
    }
}
