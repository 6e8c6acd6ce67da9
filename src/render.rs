// One frame of software rendering, composed back to front:
// dark backdrop -> faint grid -> additive orb glows -> connector lines ->
// centered title/subtitle. All field coordinates are logical pixels and get
// mapped through the viewport here.

use crate::draw::{blend_line, draw_text_5x7, text_width_5x7};
use crate::field::{self, Field};
use crate::types::{FrameBuffer, Rgb, Viewport};

/// Near-black slate backdrop. Visual: the dark auth-screen panel the orbs
/// float over.
const BACKDROP: u32 = 0x000F172A;

const GRID_SPACING: f32 = 48.0; // logical pixels between grid lines
const GRID_COLOR: Rgb = (100, 116, 139);
const GRID_ALPHA: f32 = 0.05;

const LINK_COLOR: Rgb = (148, 163, 184);

const TITLE_COLOR: Rgb = (226, 232, 240);
const SUBTITLE_COLOR: Rgb = (148, 163, 184);
const TITLE_SCALE: i32 = 3;
const SUBTITLE_SCALE: i32 = 2;
const SUBTITLE_MEASURE: usize = 34; // wrap width in characters

/// Glow outer radius relative to the orb radius.
const GLOW_SPREAD: f32 = 1.6;

pub fn render(fb: &mut FrameBuffer, vp: &Viewport, field: &Field, title: &str, subtitle: &str) {
    fb.fill(BACKDROP);
    draw_grid(fb, vp);

    // Soft glows, additive so overlaps brighten
    for p in field.particles() {
        draw_glow(
            fb,
            vp.to_backing(p.x),
            vp.to_backing(p.y),
            p.r * GLOW_SPREAD * vp.scale,
            p.color,
        );
    }

    // Subtle connector lines between nearby pairs. O(n^2), but the orb count
    // is capped well below the point where that matters.
    let particles = field.particles();
    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let (a, b) = (&particles[i], &particles[j]);
            let d = (a.x - b.x).hypot(a.y - b.y);
            if let Some(alpha) = field::link_alpha(d) {
                blend_line(
                    fb,
                    vp.to_backing(a.x) as i32,
                    vp.to_backing(a.y) as i32,
                    vp.to_backing(b.x) as i32,
                    vp.to_backing(b.y) as i32,
                    LINK_COLOR,
                    alpha,
                );
            }
        }
    }

    draw_caption(fb, vp, title, subtitle);
}

/// Very light square grid under the orbs.
fn draw_grid(fb: &mut FrameBuffer, vp: &Viewport) {
    let (w, h) = (fb.width as i32, fb.height as i32);
    let step = GRID_SPACING * vp.scale;

    let mut x = step;
    while (x as i32) < w {
        blend_line(fb, x as i32, 0, x as i32, h - 1, GRID_COLOR, GRID_ALPHA);
        x += step;
    }
    let mut y = step;
    while (y as i32) < h {
        blend_line(fb, 0, y as i32, w - 1, y as i32, GRID_COLOR, GRID_ALPHA);
        y += step;
    }
}

/// Gradient alpha at `t` = distance / outer radius: 0.55 at the center, 0.18
/// at 60% of the radius, 0 at the edge.
fn glow_alpha(t: f32) -> f32 {
    if t <= 0.6 {
        0.55 + (0.18 - 0.55) * (t / 0.6)
    } else {
        0.18 * (1.0 - (t - 0.6) / 0.4)
    }
}

/// Additive blend one RGB triplet at (x,y) with saturation to 255.
/// Visual: the pixel gets brighter; overlapping glows stack toward white.
#[inline]
fn add_rgb_saturating(fb: &mut FrameBuffer, x: i32, y: i32, r: u8, g: u8, b: u8) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }

    let idx = y * fb.width + x;
    let old = fb.pixels[idx];

    let or = ((old >> 16) & 0xFF) as u16;
    let og = ((old >> 8) & 0xFF) as u16;
    let ob = (old & 0xFF) as u16;

    let nr = (or + r as u16).min(255) as u32;
    let ng = (og + g as u16).min(255) as u32;
    let nb = (ob + b as u16).min(255) as u32;

    fb.pixels[idx] = (nr << 16) | (ng << 8) | nb;
}

/// Draw one orb as a soft radial-gradient disc centered at (cx,cy), in
/// backing pixels. Scans just the bounding box.
fn draw_glow(fb: &mut FrameBuffer, cx: f32, cy: f32, outer_r: f32, color: Rgb) {
    if outer_r <= 0.0 {
        return;
    }
    let r = outer_r.ceil() as i32;
    let (icx, icy) = (cx.round() as i32, cy.round() as i32);

    for y in (icy - r)..=(icy + r) {
        for x in (icx - r)..=(icx + r) {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d > outer_r {
                continue;
            }
            let a = glow_alpha(d / outer_r);
            add_rgb_saturating(
                fb,
                x,
                y,
                (color.0 as f32 * a) as u8,
                (color.1 as f32 * a) as u8,
                (color.2 as f32 * a) as u8,
            );
        }
    }
}

/// Centered title over a word-wrapped subtitle, sitting on top of the field.
fn draw_caption(fb: &mut FrameBuffer, vp: &Viewport, title: &str, subtitle: &str) {
    let title_scale = (TITLE_SCALE as f32 * vp.scale).round().max(1.0) as i32;
    let sub_scale = (SUBTITLE_SCALE as f32 * vp.scale).round().max(1.0) as i32;

    let lines = wrap(subtitle, SUBTITLE_MEASURE);

    let title_h = 7 * title_scale;
    let line_h = 7 * sub_scale + 3 * sub_scale; // glyph rows + leading
    let gap = 6 * sub_scale;
    let block_h = title_h + gap + lines.len() as i32 * line_h;

    let w = fb.width as i32;
    let mut y = (fb.height as i32 - block_h) / 2;

    draw_text_5x7(fb, (w - text_width_5x7(title, title_scale)) / 2, y, title, TITLE_COLOR, 1.0, title_scale);
    y += title_h + gap;

    for line in &lines {
        draw_text_5x7(fb, (w - text_width_5x7(line, sub_scale)) / 2, y, line, SUBTITLE_COLOR, 0.75, sub_scale);
        y += line_h;
    }
}

/// Greedy word wrap to at most `measure` characters per line. Words longer
/// than the measure get a line of their own.
fn wrap(text: &str, measure: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= measure {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
