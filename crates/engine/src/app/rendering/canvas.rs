use super::font::{glyph_advance, glyph_bits, glyph_pixel, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::RendererColor;

/// Mutable view of the current frame in logical pixels. Every primitive clips
/// against the frame bounds.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    scale: f32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32, scale: f32) -> Self {
        Self {
            frame,
            width,
            height,
            scale,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn frame_mut(&mut self) -> &mut [u8] {
        &mut self.frame[..]
    }

    pub fn fill(&mut self, color: RendererColor) {
        let rgba = color.to_array();
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: RendererColor) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(pixel) = self.frame.get_mut(offset..offset + 4) {
            blend_into(pixel, color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: RendererColor) {
        let left = x.max(0);
        let top = y.max(0);
        let right = x.saturating_add(width).min(self.width as i32);
        let bottom = y.saturating_add(height).min(self.height as i32);
        for py in top..bottom {
            for px in left..right {
                self.put_pixel(px, py, color);
            }
        }
    }

    pub fn outline_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: RendererColor) {
        if width <= 0 || height <= 0 {
            return;
        }
        self.fill_rect(x, y, width, 1, color);
        if height > 1 {
            self.fill_rect(x, y.saturating_add(height - 1), width, 1, color);
        }
        let inner_y = y.saturating_add(1);
        self.fill_rect(x, inner_y, 1, height - 2, color);
        if width > 1 {
            self.fill_rect(x.saturating_add(width - 1), inner_y, 1, height - 2, color);
        }
    }

    /// Draws `text` with the built-in 3x5 font, each font pixel drawn as a
    /// `pixel_size` square. Returns the horizontal advance.
    pub fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: RendererColor,
        pixel_size: i32,
    ) -> i32 {
        let pixel_size = pixel_size.max(1);
        let mut pen_x = x;
        for ch in text.chars() {
            let bits = glyph_bits(ch);
            for row in 0..GLYPH_HEIGHT {
                for column in 0..GLYPH_WIDTH {
                    if glyph_pixel(bits, column, row) {
                        self.fill_rect(
                            pen_x.saturating_add(column.saturating_mul(pixel_size)),
                            y.saturating_add(row.saturating_mul(pixel_size)),
                            pixel_size,
                            pixel_size,
                            color,
                        );
                    }
                }
            }
            pen_x = pen_x.saturating_add(glyph_advance(pixel_size));
        }
        pen_x.saturating_sub(x)
    }
}

fn blend_into(pixel: &mut [u8], color: RendererColor) {
    match color.alpha {
        0 => {}
        255 => pixel.copy_from_slice(&color.to_array()),
        alpha => {
            let src_weight = u16::from(alpha);
            let dst_weight = 255 - src_weight;
            let source = [color.red, color.green, color.blue];
            for (channel, src) in pixel.iter_mut().zip(source) {
                let mixed =
                    (u16::from(src) * src_weight + u16::from(*channel) * dst_weight + 127) / 255;
                *channel = mixed as u8;
            }
            let dst_alpha = u16::from(pixel[3]);
            pixel[3] = (src_weight + dst_alpha * dst_weight / 255).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: RendererColor = RendererColor::rgb(255, 0, 0);

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn fill_rect_is_clipped_to_frame() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4, 1.0);

        canvas.fill_rect(-2, -2, 4, 4, RED);

        assert_eq!(pixel_at(&frame, 4, 0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 4, 1, 1), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 4, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn out_of_bounds_primitives_never_panic() {
        let mut frame = vec![0u8; 2 * 2 * 4];
        let mut canvas = Canvas::new(&mut frame, 2, 2, 1.0);

        canvas.put_pixel(-1, 0, RED);
        canvas.put_pixel(2, 0, RED);
        canvas.fill_rect(i32::MAX - 1, i32::MAX - 1, 10, 10, RED);
        canvas.outline_rect(-5, -5, 100, 100, RED);
        canvas.draw_text(-100, -100, "FPS 60", RED, 3);

        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn primitives_near_i32_max_are_clipped() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4, 1.0);

        canvas.outline_rect(i32::MAX - 2, 0, 10, 10, RED);
        canvas.outline_rect(0, i32::MAX - 2, 10, 10, RED);
        canvas.outline_rect(i32::MAX, i32::MAX, i32::MAX, i32::MAX, RED);
        let advance = canvas.draw_text(i32::MAX - 2, 0, "AB", RED, 1);
        canvas.draw_text(0, i32::MAX - 2, "AB", RED, i32::MAX);

        assert_eq!(advance, 2);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn zero_sized_canvas_is_safe() {
        let mut frame = Vec::new();
        let mut canvas = Canvas::new(&mut frame, 0, 0, 1.0);

        canvas.fill(RED);
        canvas.fill_rect(0, 0, 5, 5, RED);
        canvas.draw_text(0, 0, "X", RED, 1);
    }

    #[test]
    fn outline_leaves_interior_untouched() {
        let mut frame = vec![0u8; 5 * 5 * 4];
        let mut canvas = Canvas::new(&mut frame, 5, 5, 1.0);

        canvas.outline_rect(0, 0, 5, 5, RED);

        assert_eq!(pixel_at(&frame, 5, 0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 5, 4, 4), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 5, 0, 2), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 5, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn translucent_color_blends_with_existing_pixel() {
        let mut frame = vec![0u8; 4];
        let mut canvas = Canvas::new(&mut frame, 1, 1, 1.0);
        canvas.fill(RendererColor::rgb(0, 0, 200));

        canvas.put_pixel(0, 0, RendererColor::rgba(200, 0, 0, 128));

        let [red, green, blue, alpha] = pixel_at(&frame, 1, 0, 0);
        assert!((99..=101).contains(&red), "red {red}");
        assert_eq!(green, 0);
        assert!((98..=100).contains(&blue), "blue {blue}");
        assert_eq!(alpha, 255);
    }

    #[test]
    fn draw_text_returns_advance_and_marks_glyph_pixels() {
        let mut frame = vec![0u8; 8 * 5 * 4];
        let mut canvas = Canvas::new(&mut frame, 8, 5, 1.0);

        let advance = canvas.draw_text(0, 0, "11", RED, 1);

        assert_eq!(advance, 8);
        assert_eq!(pixel_at(&frame, 8, 1, 0), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 8, 0, 0), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&frame, 8, 5, 0), [255, 0, 0, 255]);
    }
}
