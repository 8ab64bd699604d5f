//! Star kinematics
//!
//! A star is spawned at a uniformly random point of the surface and from
//! then on accelerates along the radial heading it had at spawn time. The
//! heading is never recomputed, so stars drift outward in straight lines
//! while speeding up monotonically.

use rand::Rng;
use std::ops::AddAssign;

/// 2-D vector in surface-local logical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// Horizontal component
    pub x: f64,
    /// Vertical component (grows downward)
    pub y: f64,
}

impl Vec2 {
    /// The origin / zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// A single animated star
///
/// Fields are private so the heading stays fixed for the star's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    position: Vec2,
    previous_position: Vec2,
    velocity: Vec2,
    angle: f64,
}

impl Star {
    /// Place a star at a known point of a `width` x `height` surface
    ///
    /// A star placed exactly at the center gets `atan2(0, 0) = 0`, i.e. it
    /// heads right. That is the only degenerate case and is not an error.
    pub fn at(x: f64, y: f64, width: f64, height: f64) -> Self {
        let position = Vec2::new(x, y);
        Self {
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            angle: (y - height / 2.0).atan2(x - width / 2.0),
        }
    }

    /// Spawn a star at a uniformly random point in `[0, width) x [0, height)`
    ///
    /// With `seed_previous_to_origin` the previous position starts at
    /// `(0, 0)`, which draws a stray line from the corner on the first
    /// frame. That reproduces a known rendering defect and is off by default.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        width: f64,
        height: f64,
        seed_previous_to_origin: bool,
    ) -> Self {
        // gen::<f64>() is in [0, 1) and stays valid for zero-sized surfaces
        let x = rng.gen::<f64>() * width;
        let y = rng.gen::<f64>() * height;

        let mut star = Self::at(x, y, width, height);
        if seed_previous_to_origin {
            star.previous_position = Vec2::ZERO;
        }
        star
    }

    /// Advance one frame under a radial acceleration of `acceleration`
    pub fn update(&mut self, acceleration: f64) {
        self.velocity.x += self.angle.cos() * acceleration;
        self.velocity.y += self.angle.sin() * acceleration;

        self.previous_position = self.position;
        self.position += self.velocity;
    }

    /// A star is active while its previous position is on the surface
    ///
    /// Bounds are inclusive on both ends.
    pub fn is_active(&self, width: f64, height: f64) -> bool {
        let Vec2 { x, y } = self.previous_position;
        (0.0..=width).contains(&x) && (0.0..=height).contains(&y)
    }

    /// Current speed in logical pixels per frame
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Current position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position one frame ago
    pub fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    /// Accumulated velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Heading fixed at spawn, in radians
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_center_spawn_heads_right() {
        let star = Star::at(400.0, 300.0, 800.0, 600.0);
        assert_eq!(star.angle(), 0.0);
        assert_eq!(star.previous_position(), star.position());
        assert_eq!(star.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_angle_points_away_from_center() {
        // Directly below center
        let star = Star::at(400.0, 500.0, 800.0, 600.0);
        assert!((star.angle() - FRAC_PI_2).abs() < 1e-12);

        // Left of center
        let star = Star::at(100.0, 300.0, 800.0, 600.0);
        assert!((star.angle() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_update_accumulates_velocity() {
        let mut star = Star::at(500.0, 300.0, 800.0, 600.0);

        star.update(0.5);
        assert_eq!(star.velocity(), Vec2::new(0.5, 0.0));
        assert_eq!(star.position(), Vec2::new(500.5, 300.0));
        assert_eq!(star.previous_position(), Vec2::new(500.0, 300.0));

        star.update(0.5);
        assert_eq!(star.velocity(), Vec2::new(1.0, 0.0));
        assert_eq!(star.position(), Vec2::new(501.5, 300.0));
        assert_eq!(star.previous_position(), Vec2::new(500.5, 300.0));
        assert_eq!(star.speed(), 1.0);
    }

    #[test]
    fn test_activity_uses_previous_position() {
        let mut star = Star::at(799.5, 300.0, 800.0, 600.0);
        star.update(1.0);

        // Moved off-surface but previous position is still inside
        assert!(star.position().x > 800.0);
        assert!(star.is_active(800.0, 600.0));

        star.update(1.0);
        assert!(!star.is_active(800.0, 600.0));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Star::at(0.0, 0.0, 800.0, 600.0).is_active(800.0, 600.0));
        assert!(Star::at(800.0, 600.0, 800.0, 600.0).is_active(800.0, 600.0));
        assert!(!Star::at(-0.1, 10.0, 800.0, 600.0).is_active(800.0, 600.0));
    }

    #[test]
    fn test_spawn_within_surface() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let star = Star::spawn(&mut rng, 320.0, 200.0, false);
            let p = star.position();
            assert!((0.0..320.0).contains(&p.x));
            assert!((0.0..200.0).contains(&p.y));
            assert_eq!(star.previous_position(), p);
        }
    }

    #[test]
    fn test_spawn_on_empty_surface() {
        let mut rng = StdRng::seed_from_u64(1);
        let star = Star::spawn(&mut rng, 0.0, 0.0, false);
        assert_eq!(star.position(), Vec2::ZERO);
    }

    #[test]
    fn test_origin_seeding_defect() {
        let mut rng = StdRng::seed_from_u64(3);
        let star = Star::spawn(&mut rng, 800.0, 600.0, true);
        assert_eq!(star.previous_position(), Vec2::ZERO);
        assert_ne!(star.position(), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_angle_never_changes(
            x in 0.0f64..1920.0,
            y in 0.0f64..1080.0,
            accelerations in proptest::collection::vec(0.0f64..0.3, 1..64),
        ) {
            let mut star = Star::at(x, y, 1920.0, 1080.0);
            let angle = star.angle();
            for acc in accelerations {
                star.update(acc);
                prop_assert_eq!(star.angle(), angle);
            }
        }

        #[test]
        fn prop_previous_is_snapshot_before_move(
            x in 0.0f64..1920.0,
            y in 0.0f64..1080.0,
            accelerations in proptest::collection::vec(0.0f64..0.3, 1..64),
        ) {
            let mut star = Star::at(x, y, 1920.0, 1080.0);
            for acc in accelerations {
                let before = star.position();
                star.update(acc);
                prop_assert_eq!(star.previous_position(), before);
            }
        }
    }
}
