// Window + software drawing utilities.
// Provided here:
// 1) A resizable window that shows the rendered frame.
// 2) Pixel-level helpers: alpha-over blending for pixels and lines.
// 3) A tiny 5x7 bitmap font for the title, subtitle and HUD text.

use crate::error::Error;
use crate::types::{FrameBuffer, Rgb};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

const TARGET_FPS: usize = 60;

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a resizable window at the given backing size.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let opts = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // The simulation moves in per-frame units, so pin the frame rate.
        window.set_target_fps(TARGET_FPS);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current client size in device pixels; polled every frame so the
    /// viewport can follow window resizes.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Mouse position in device pixels, or None once the pointer has left the
    /// window. Visual: None is what parks the pointer and lets the orbs calm.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    /// Visual: while true, a press latch in the main loop decides whether this
    /// is the click edge that bursts the field.
    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Visual: when pressed, the current frame is written out as a PNG.
    pub fn s_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }
}

/* ---------- Software drawing: pixels and blended lines ---------- */

/// Alpha-over blend one RGB triplet at (x,y).
/// Visual: the pixel shifts toward `color`; alpha 0 leaves it untouched.
#[inline]
pub fn blend_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: Rgb, alpha: f32) {
    if x < 0 || y < 0 || alpha <= 0.0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let a = alpha.min(1.0);
    let idx = y * fb.width + x;
    let old = fb.pixels[idx];

    let or = ((old >> 16) & 0xFF) as f32;
    let og = ((old >> 8) & 0xFF) as f32;
    let ob = (old & 0xFF) as f32;

    let nr = (or + (color.0 as f32 - or) * a) as u32;
    let ng = (og + (color.1 as f32 - og) * a) as u32;
    let nb = (ob + (color.2 as f32 - ob) * a) as u32;

    fb.pixels[idx] = (nr << 16) | (ng << 8) | nb;
}

/// Draw a thin blended line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a faint straight connector on top of whatever is already drawn.
pub fn blend_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb, alpha: f32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        blend_pixel(fb, x0, y0, color, alpha);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/* ---------- 5x7 bitmap font ---------- */

/// Return a 5x7 glyph bitmap. Lowercase input is folded to uppercase by the
/// text routines. Each u8 is a row; the low 5 bits are the pixels (bit 4 =
/// leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Uppercase A..Z
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01110),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b11011,0b10001),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00100,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Draw a single glyph at (x,y), magnified `scale` times, with a 1-cell black
/// shadow for contrast against bright orbs.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: Rgb, alpha: f32, scale: i32) {
    let Some(rows) = glyph5x7(ch.to_ascii_uppercase()) else {
        return;
    };

    // Shadow pass: offset by one cell in black to improve readability
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..5 {
            if (rowbits & (1 << (4 - rx))) != 0 {
                fill_cell(fb, x + (rx + 1) as i32 * scale, y + (ry + 1) as i32 * scale, scale, (0, 0, 0), alpha * 0.6);
            }
        }
    }

    // Foreground pass: actual glyph in the chosen color
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..5 {
            if (rowbits & (1 << (4 - rx))) != 0 {
                fill_cell(fb, x + rx as i32 * scale, y + ry as i32 * scale, scale, color, alpha);
            }
        }
    }
}

/// One magnified font cell: a scale-by-scale block of blended pixels.
#[inline]
fn fill_cell(fb: &mut FrameBuffer, x: i32, y: i32, scale: i32, color: Rgb, alpha: f32) {
    for oy in 0..scale {
        for ox in 0..scale {
            blend_pixel(fb, x + ox, y + oy, color, alpha);
        }
    }
}

/// Draw a text string using 5x7 glyphs; each glyph advances 6 cells.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: Rgb, alpha: f32, scale: i32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, alpha, scale);
        x += 6 * scale; // 5 cells glyph width + 1 cell spacing
    }
}

/// Width in pixels a string will occupy at the given scale (without the
/// trailing spacing cell). Used to center the title and subtitle.
pub fn text_width_5x7(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { n * 6 * scale - scale }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_with_zero_alpha_is_a_no_op() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill(0x00112233);
        blend_pixel(&mut fb, 1, 1, (255, 255, 255), 0.0);
        assert_eq!(fb.pixels[5], 0x00112233);
    }

    #[test]
    fn blend_with_full_alpha_replaces_the_pixel() {
        let mut fb = FrameBuffer::new(4, 4);
        blend_pixel(&mut fb, 2, 2, (255, 128, 0), 1.0);
        assert_eq!(fb.pixels[2 * 4 + 2], 0x00FF8000);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = FrameBuffer::new(4, 4);
        blend_pixel(&mut fb, -1, 0, (255, 255, 255), 1.0);
        blend_pixel(&mut fb, 4, 4, (255, 255, 255), 1.0);
        blend_line(&mut fb, -10, -10, 10, 10, (255, 255, 255), 0.5);
        assert_eq!(fb.pixels.len(), 16);
    }

    #[test]
    fn text_lights_pixels_and_folds_case() {
        let mut upper = FrameBuffer::new(16, 12);
        let mut lower = FrameBuffer::new(16, 12);
        draw_text_5x7(&mut upper, 1, 1, "HI", (255, 255, 255), 1.0, 1);
        draw_text_5x7(&mut lower, 1, 1, "hi", (255, 255, 255), 1.0, 1);
        assert!(upper.pixels.iter().any(|&p| p != 0));
        assert_eq!(upper.pixels, lower.pixels);
    }

    #[test]
    fn text_width_counts_glyph_cells() {
        assert_eq!(text_width_5x7("", 1), 0);
        assert_eq!(text_width_5x7("A", 1), 5);
        assert_eq!(text_width_5x7("AB", 2), 22);
    }
}
