//! Particle collection
//!
//! Holds the stars and keeps the population at its target size: every
//! frame inactive stars are retired and fresh ones spawned in their place.

use super::star::Star;
use crate::render::{draw_trail, DrawingSurface};
use rand::Rng;

/// Acceleration scalar for a horizontal pointer position
///
/// Affine in `pointer_x`: `pointer_x / width * scale + base`. A zero-width
/// surface yields the base term only.
pub fn acceleration_for(pointer_x: f64, width: f64, scale: f64, base: f64) -> f64 {
    if width <= 0.0 {
        return base;
    }
    pointer_x / width * scale + base
}

/// Fixed-size, unordered star population
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Vec<Star>,
    target: usize,
    seed_previous_to_origin: bool,
}

impl StarField {
    /// Create an empty field that replenishes to `target` stars
    pub fn new(target: usize, seed_previous_to_origin: bool) -> Self {
        Self {
            stars: Vec::with_capacity(target),
            target,
            seed_previous_to_origin,
        }
    }

    /// Target population
    pub fn target(&self) -> usize {
        self.target
    }

    /// Current population
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Whether the field holds no stars
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Stars currently alive
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Add a specific star
    pub fn push(&mut self, star: Star) {
        self.stars.push(star);
    }

    /// Drop every star; the next replenish repopulates from scratch
    pub fn clear(&mut self) {
        self.stars.clear();
    }

    /// Spawn stars until the target is reached, returning how many were added
    pub fn replenish<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f64, height: f64) -> usize {
        let missing = self.target.saturating_sub(self.stars.len());
        for _ in 0..missing {
            self.stars
                .push(Star::spawn(rng, width, height, self.seed_previous_to_origin));
        }
        missing
    }

    /// Update and draw every star, then retire the inactive ones
    ///
    /// Returns the number of stars retired.
    pub fn advance<S>(
        &mut self,
        acceleration: f64,
        width: f64,
        height: f64,
        surface: &mut S,
        stroke_width: f64,
    ) -> usize
    where
        S: DrawingSurface + ?Sized,
    {
        let before = self.stars.len();
        self.stars.retain_mut(|star| {
            star.update(acceleration);
            draw_trail(star, surface, stroke_width);
            star.is_active(width, height)
        });
        before - self.stars.len()
    }
}
