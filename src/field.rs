// The particle field: drifting glow orbs that shy away from the pointer and
// scatter outward on click. Everything here works in logical (layout) pixels;
// render.rs maps the result onto the backing buffer.

use crate::types::Rgb;

/// Fixed palette, assigned round-robin at creation: cyan, teal, slate.
pub const PALETTE: [Rgb; 3] = [(34, 211, 238), (20, 184, 166), (148, 163, 184)];

/// Pointer influence radius for the continuous repel, in logical pixels.
pub const REPEL_RADIUS: f32 = 120.0;
/// Influence radius of the click burst.
pub const BURST_RADIUS: f32 = 160.0;
/// Pairs closer than this get a connector line.
pub const LINK_RADIUS: f32 = 110.0;
/// Peak connector opacity (reached at distance zero).
pub const LINK_ALPHA: f32 = 0.18;

const REPEL_PUSH: f32 = 0.6;
const BURST_PUSH: f32 = 2.0;
const DRAG: f32 = 0.996;
const BOUNCE: f32 = -0.9;
const SWELL: f32 = 4.0;   // max radius growth under the pointer
const RELAX: f32 = 0.08;  // per-frame ease back toward the base radius

// Density follows the surface width, bounded both ways so narrow and wide
// surfaces read the same.
const WIDTH_PER_ORB: f32 = 18.0;
const MIN_COUNT: usize = 28;
const MAX_COUNT: usize = 72;

// ----------------------------- tiny RNG (no external crate) -----------------------------

/// Deterministic xorshift32. Drives placement, velocity and radius at
/// creation; seedable so tests can reproduce a field exactly.
#[derive(Clone)]
struct Rng32 {
    state: u32,
}

impl Rng32 {
    fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 }
    }

    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform [0, 1)
    #[inline]
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / ((1u32 << 24) as f32)
    }

    #[inline]
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}

// ----------------------------- particles ------------------------------------------------

/// One orb. Visual: a soft glowing disc that drifts, bounces off the edges,
/// and swells while the pointer is close.
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,      // logical pixels per frame
    pub vy: f32,
    pub r: f32,       // current radius; stays in [base_r, base_r + SWELL]
    pub base_r: f32,
    pub color: Rgb,
}

/// Last known pointer position, or parked far off-surface when inactive so no
/// distance test can fire near the origin.
#[derive(Clone, Copy)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

impl Pointer {
    pub fn idle() -> Self {
        Self { x: -9999.0, y: -9999.0, active: false }
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.active = true;
        self.x = x;
        self.y = y;
    }

    pub fn clear(&mut self) {
        *self = Self::idle();
    }
}

/// The full orb set. Created once per surface; no orb is added or removed
/// afterwards.
pub struct Field {
    particles: Vec<Particle>,
}

impl Field {
    /// Seed a field for a surface of the given logical size.
    pub fn new(width: f32, height: f32, seed: u32) -> Self {
        let count = ((width / WIDTH_PER_ORB).floor() as usize).clamp(MIN_COUNT, MAX_COUNT);
        let mut rng = Rng32::from_seed(seed);

        let particles = (0..count)
            .map(|i| {
                let r = rng.range(6.0, 14.0);
                Particle {
                    x: rng.range(0.0, width),
                    y: rng.range(0.0, height),
                    vx: rng.range(-0.4, 0.4),
                    vy: rng.range(-0.4, 0.4),
                    r,
                    base_r: r,
                    color: PALETTE[i % PALETTE.len()],
                }
            })
            .collect();

        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Instantaneous outward impulse on everything within BURST_RADIUS of
    /// (x, y). Visual: orbs near the click scatter away, then drag slows them.
    pub fn burst(&mut self, x: f32, y: f32) {
        for p in &mut self.particles {
            let dx = p.x - x;
            let dy = p.y - y;
            let mut d = dx.hypot(dy);
            if d == 0.0 {
                d = 1.0; // degenerate: orb exactly under the pointer
            }
            if d < BURST_RADIUS {
                let f = (BURST_RADIUS - d) / BURST_RADIUS;
                p.vx += (dx / d) * (BURST_PUSH * f);
                p.vy += (dy / d) * (BURST_PUSH * f);
            }
        }
    }

    /// One simulation tick over the current logical bounds.
    pub fn step(&mut self, width: f32, height: f32, pointer: &Pointer) {
        for p in &mut self.particles {
            // Move
            p.x += p.vx;
            p.y += p.vy;

            // Light drag
            p.vx *= DRAG;
            p.vy *= DRAG;

            // Pointer repel + swell. Outside the influence radius (which
            // includes an inactive pointer) the radius eases back to base.
            let dx = p.x - pointer.x;
            let dy = p.y - pointer.y;
            let mut d = dx.hypot(dy);
            if d == 0.0 {
                d = 1.0;
            }
            if pointer.active && d < REPEL_RADIUS {
                let force = (REPEL_RADIUS - d) / REPEL_RADIUS;
                let push = REPEL_PUSH * force;
                p.vx += (dx / d) * push;
                p.vy += (dy / d) * push;
                p.r = p.base_r + SWELL * force;
            } else {
                p.r += (p.base_r - p.r) * RELAX;
            }

            // Edge bounce: clamp inside the bounds, lose a tenth of the
            // perpendicular speed on each hit.
            if p.x < p.r {
                p.x = p.r;
                p.vx *= BOUNCE;
            } else if p.x > width - p.r {
                p.x = width - p.r;
                p.vx *= BOUNCE;
            }
            if p.y < p.r {
                p.y = p.r;
                p.vy *= BOUNCE;
            } else if p.y > height - p.r {
                p.y = height - p.r;
                p.vy *= BOUNCE;
            }
        }
    }
}

/// Connector opacity for a pair at distance `d`, or None when too far apart.
/// Closer pairs get more visible lines.
pub fn link_alpha(d: f32) -> Option<f32> {
    if d < LINK_RADIUS {
        Some(((LINK_RADIUS - d) / LINK_RADIUS) * LINK_ALPHA)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_particle(x: f32, y: f32) -> Particle {
        Particle { x, y, vx: 0.0, vy: 0.0, r: 8.0, base_r: 8.0, color: PALETTE[0] }
    }

    #[test]
    fn count_follows_width_with_clamps() {
        assert_eq!(Field::new(504.0, 300.0, 7).particles().len(), 28);
        assert_eq!(Field::new(300.0, 300.0, 7).particles().len(), 28);
        assert_eq!(Field::new(900.0, 300.0, 7).particles().len(), 50);
        assert_eq!(Field::new(2000.0, 300.0, 7).particles().len(), 72);
    }

    #[test]
    fn same_seed_reproduces_the_field() {
        let a = Field::new(960.0, 600.0, 0xBEEF);
        let b = Field::new(960.0, 600.0, 0xBEEF);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!((pa.x, pa.y, pa.vx, pa.vy, pa.base_r), (pb.x, pb.y, pb.vx, pb.vy, pb.base_r));
            assert_eq!(pa.color, pb.color);
        }
    }

    #[test]
    fn creation_stays_in_bounds_with_positive_radii() {
        let field = Field::new(960.0, 600.0, 42);
        for p in field.particles() {
            assert!(p.base_r >= 6.0 && p.base_r < 14.0);
            assert!(p.x >= 0.0 && p.x < 960.0);
            assert!(p.y >= 0.0 && p.y < 600.0);
            assert!(p.vx >= -0.4 && p.vx < 0.4);
            assert!(p.vy >= -0.4 && p.vy < 0.4);
        }
    }

    #[test]
    fn palette_is_assigned_round_robin() {
        let field = Field::new(960.0, 600.0, 1);
        for (i, p) in field.particles().iter().enumerate() {
            assert_eq!(p.color, PALETTE[i % 3]);
        }
    }

    #[test]
    fn burst_outside_radius_changes_no_velocity() {
        let mut field = Field { particles: vec![still_particle(500.0, 100.0)] };
        field.burst(100.0, 100.0); // distance 400
        let p = &field.particles()[0];
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
    }

    #[test]
    fn burst_at_eighty_pixels_has_unit_impulse() {
        let mut field = Field { particles: vec![still_particle(180.0, 100.0)] };
        field.burst(100.0, 100.0);
        let p = &field.particles()[0];
        // (160 - 80) / 160 * 2.0 = 1.0, directed outward along +x
        assert!((p.vx - 1.0).abs() < 1e-6);
        assert!(p.vy.abs() < 1e-6);
    }

    #[test]
    fn burst_on_top_of_an_orb_uses_the_unit_fallback() {
        let mut field = Field { particles: vec![still_particle(100.0, 100.0)] };
        field.burst(100.0, 100.0);
        let p = &field.particles()[0];
        assert!(p.vx.is_finite() && p.vy.is_finite());
    }

    #[test]
    fn radius_stays_between_base_and_base_plus_swell() {
        let mut field = Field::new(960.0, 600.0, 99);
        let pointer = Pointer { x: 480.0, y: 300.0, active: true };
        for _ in 0..300 {
            field.step(960.0, 600.0, &pointer);
            for p in field.particles() {
                assert!(p.r >= p.base_r - 1e-4, "radius dropped below base");
                assert!(p.r <= p.base_r + SWELL + 1e-4, "radius overshot the swell cap");
            }
        }
    }

    #[test]
    fn step_keeps_every_orb_inside_the_bounds() {
        let mut field = Field::new(960.0, 600.0, 3);
        let mut pointer = Pointer::idle();
        for i in 0..500 {
            // Wiggle the pointer around so repulsion kicks orbs toward edges.
            pointer.move_to(480.0 + (i as f32 * 3.0) % 400.0, 300.0);
            if i % 40 == 0 {
                field.burst(pointer.x, pointer.y);
            }
            field.step(960.0, 600.0, &pointer);
            for p in field.particles() {
                assert!(p.x >= p.r && p.x <= 960.0 - p.r);
                assert!(p.y >= p.r && p.y <= 600.0 - p.r);
            }
        }
    }

    #[test]
    fn cleared_pointer_never_grows_radii() {
        let mut field = Field { particles: vec![still_particle(10.0, 10.0)] };
        field.particles[0].r = 11.0; // inflated by an earlier pass
        let mut pointer = Pointer::idle();
        pointer.clear();
        field.step(600.0, 600.0, &pointer);
        let p = &field.particles()[0];
        // Relaxes toward base even though the orb sits near the origin, where
        // a forgotten pointer reset would have put the "cursor".
        assert!(p.r < 11.0 && p.r >= p.base_r);
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
    }

    #[test]
    fn idle_pointer_parks_far_off_surface() {
        let p = Pointer::idle();
        assert!(!p.active);
        assert!(p.x < -1000.0 && p.y < -1000.0);
    }

    #[test]
    fn link_alpha_fades_with_distance() {
        assert!((link_alpha(0.0).unwrap() - LINK_ALPHA).abs() < 1e-6);
        let near = link_alpha(20.0).unwrap();
        let far = link_alpha(100.0).unwrap();
        assert!(near > far && far > 0.0);
        assert!(link_alpha(110.0).is_none());
        assert!(link_alpha(500.0).is_none());
    }
}
