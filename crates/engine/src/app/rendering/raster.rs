//! Software fills into an RGBA8 frame buffer.

use super::glyphs::{glyph_rows, GLYPH_HEIGHT, GLYPH_WIDTH};

pub(crate) const TEXT_SCALE: i32 = 2;
pub(crate) const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;

pub(crate) struct Frame<'a> {
    pixels: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(pixels: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    pub(crate) fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [u8; 4]) {
        if width <= 0.0 || height <= 0.0 || !x.is_finite() || !y.is_finite() {
            return;
        }
        let left = (x.round() as i32).max(0);
        let top = (y.round() as i32).max(0);
        let right = ((x + width).round() as i32).min(self.width as i32);
        let bottom = ((y + height).round() as i32).min(self.height as i32);
        for py in top..bottom {
            for px in left..right {
                self.blend_pixel_clipped(px, py, color);
            }
        }
    }

    pub(crate) fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 4]) {
        if radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let r_squared = radius * radius;
        let top = ((cy - radius).floor() as i32).max(0);
        let bottom = ((cy + radius).ceil() as i32).min(self.height as i32);
        let left = ((cx - radius).floor() as i32).max(0);
        let right = ((cx + radius).ceil() as i32).min(self.width as i32);
        for py in top..bottom {
            let dy = py as f32 + 0.5 - cy;
            for px in left..right {
                let dx = px as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r_squared {
                    self.blend_pixel_clipped(px, py, color);
                }
            }
        }
    }

    pub(crate) fn draw_text(&mut self, x: f32, y: f32, text: &str, color: [u8; 4]) {
        let mut pen_x = x.round() as i32;
        let pen_y = y.round() as i32;
        for ch in text.chars() {
            self.draw_glyph(pen_x, pen_y, glyph_rows(ch), color);
            pen_x = pen_x.saturating_add(GLYPH_ADVANCE);
        }
    }

    fn draw_glyph(&mut self, x: i32, y: i32, rows: [u8; GLYPH_HEIGHT as usize], color: [u8; 4]) {
        for (row_index, bits) in rows.iter().enumerate() {
            let glyph_y = y.saturating_add(row_index as i32 * TEXT_SCALE);
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let glyph_x = x.saturating_add(col * TEXT_SCALE);
                for sy in 0..TEXT_SCALE {
                    for sx in 0..TEXT_SCALE {
                        self.blend_pixel_clipped(
                            glyph_x.saturating_add(sx),
                            glyph_y.saturating_add(sy),
                            color,
                        );
                    }
                }
            }
        }
    }

    fn blend_pixel_clipped(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let Some(offset) = (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
            .and_then(|pixel| pixel.checked_mul(4))
        else {
            return;
        };
        let Some(dst) = self.pixels.get_mut(offset..offset + 4) else {
            return;
        };
        let alpha = color[3] as u32;
        if alpha == 255 {
            dst.copy_from_slice(&color);
            return;
        }
        for channel in 0..3 {
            let src = color[channel] as u32;
            let old = dst[channel] as u32;
            dst[channel] = ((src * alpha + old * (255 - alpha)) / 255) as u8;
        }
        dst[3] = 255;
    }
}
