// What you SEE:
// • A dark panel with soft glowing orbs drifting over a faint grid.
// • Orbs near the mouse shy away and swell a little; nearby orbs are joined
//   by faint lines.
// • Click: orbs around the cursor scatter outward, then drag calms them.
// • Centered title/subtitle text sits on top. S saves a PNG still. ESC quits.

mod draw;
mod error;
mod field;
mod render;
mod snapshot;
mod types;

use draw::Drawer;
use error::Error;
use field::{Field, Pointer};
use log::{debug, info, warn};
use std::env;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use types::{FrameBuffer, Viewport};

const WINDOW_TITLE: &str = "orbfield";
const START_WIDTH: usize = 960; // logical pixels
const START_HEIGHT: usize = 600;

const DEFAULT_TITLE: &str = "Welcome back!";
const DEFAULT_SUBTITLE: &str =
    "Sign in to continue your conversations and catch up with your messages.";

/// Device pixel ratio. minifb cannot report one, so honor an env override the
/// way HiDPI X11 setups do; Viewport::fit clamps whatever comes in to [1, 2].
fn device_scale() -> f32 {
    env::var("ORBFIELD_SCALE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1.0)
}

/// Layout seed. The wall clock is plenty for decoration; tests that need
/// reproducible fields pass their own seed to Field::new.
fn layout_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(0x9E37_79B9)
}

fn main() -> Result<(), Error> {
    env_logger::init();

    // Mount-time props: title and subtitle, overridable from the command line.
    let mut args = env::args().skip(1);
    let title = args.next().unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let subtitle = args.next().unwrap_or_else(|| DEFAULT_SUBTITLE.to_string());

    let mut viewport = Viewport::fit(START_WIDTH, START_HEIGHT, device_scale());

    /* --- Window setup ---
       A missing display is not an error for a purely decorative surface:
       say so, render nothing, schedule nothing. */
    let mut drawer =
        match Drawer::new(WINDOW_TITLE, viewport.backing_width(), viewport.backing_height()) {
            Ok(d) => d,
            Err(e) => {
                warn!("no drawing surface available, nothing to show: {e}");
                return Ok(());
            }
        };

    /* --- Reusable screen buffer + simulation state ---
       Visual: `screen` is the image you actually see each frame. */
    let mut screen = FrameBuffer::new(viewport.backing_width(), viewport.backing_height());
    let mut field = Field::new(viewport.width as f32, viewport.height as f32, layout_seed());
    let mut pointer = Pointer::idle();
    let mut was_down = false; // press latch so a click bursts exactly once

    info!(
        "{} orbs over a {}x{} surface (scale {})",
        field.particles().len(),
        viewport.width,
        viewport.height,
        viewport.scale
    );

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Follow window resizes. Orb positions are not renormalized to the
           new bounds; the edge bounce reins them in on the next step. */
        let (win_w, win_h) = drawer.size();
        let logical_w = ((win_w as f32 / viewport.scale).floor() as usize).max(1);
        let logical_h = ((win_h as f32 / viewport.scale).floor() as usize).max(1);
        if logical_w != viewport.width || logical_h != viewport.height {
            viewport = Viewport::fit(logical_w, logical_h, device_scale());
            screen.resize(viewport.backing_width(), viewport.backing_height());
            info!("surface resized to {}x{}", viewport.width, viewport.height);
        }

        /* 2) Pointer, in logical pixels — or parked once it leaves the
           window, so no orb feels a cursor that is not there. */
        match drawer.mouse_pos() {
            Some((mx, my)) => pointer.move_to(mx / viewport.scale, my / viewport.scale),
            None => pointer.clear(),
        }

        let down = drawer.left_mouse_down();
        if down && !was_down && pointer.active {
            field.burst(pointer.x, pointer.y);
            debug!("burst at ({:.0}, {:.0})", pointer.x, pointer.y);
        }
        was_down = down;

        /* 3) One simulation tick, then rasterize the frame. */
        field.step(viewport.width as f32, viewport.height as f32, &pointer);
        render::render(&mut screen, &viewport, &field, &title, &subtitle);

        // HUD: key hints + FPS in the corner
        let hud = format!("ESC QUIT | S SNAPSHOT | {hud_fps_text}");
        let hud_scale = (viewport.scale.round() as i32).max(1);
        let hud_y = screen.height as i32 - 8 * hud_scale - 8;
        draw::draw_text_5x7(
            &mut screen,
            8,
            hud_y,
            &hud,
            (148, 163, 184),
            0.6,
            hud_scale,
        );

        /* 4) Snapshot on demand; a failed save never kills the surface. */
        if drawer.s_pressed_once() {
            let path = snapshot::default_path();
            match snapshot::save_png(&screen, &path) {
                Ok(()) => info!("saved {}", path.display()),
                Err(e) => warn!("snapshot failed: {e}"),
            }
        }

        /* 5) Present to the window. */
        drawer.present(&screen)?;

        /* 6) FPS counter, once per second. */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
