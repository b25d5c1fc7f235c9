//! Arena generation settings

use rand::Rng;

const MIN_HEIGHT: i32 = 5;
/// Narrowest arena whose player and enemy spawn blocks never overlap
const MIN_WIDTH: i32 = 9;
/// Largest accepted width or height
pub const MAX_DIMENSION: i32 = 255;
const MIN_TILE_SIZE: i32 = 16;
const MAX_TILE_SIZE: i32 = 128;
const MIN_HAZARD: f32 = 0.0;
const MAX_HAZARD: f32 = 0.6;

/// Normalised parameters for [`LevelGenerator`](super::generator::LevelGenerator)
///
/// Every constructor and `with_*` method re-normalises, so a `LevelSettings`
/// value always holds odd dimensions (width `9..=255`, height `5..=255`), a
/// tile size in `16..=128` and a hazard density in `0.0..=0.6`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSettings {
    width: i32,
    height: i32,
    tile_size: i32,
    hazard_density: f32,
    seed: i64,
    lock_seed: bool,
}

impl LevelSettings {
    pub fn new(
        width: i32,
        height: i32,
        tile_size: i32,
        hazard_density: f32,
        seed: i64,
        lock_seed: bool,
    ) -> Self {
        Self {
            width: ensure_odd(width.clamp(MIN_WIDTH, MAX_DIMENSION)),
            height: ensure_odd(height.clamp(MIN_HEIGHT, MAX_DIMENSION)),
            tile_size: tile_size.clamp(MIN_TILE_SIZE, MAX_TILE_SIZE),
            hazard_density: if hazard_density.is_nan() {
                MIN_HAZARD
            } else {
                hazard_density.clamp(MIN_HAZARD, MAX_HAZARD)
            },
            seed,
            lock_seed,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn hazard_density(&self) -> f32 {
        self.hazard_density
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn lock_seed(&self) -> bool {
        self.lock_seed
    }

    pub fn with_width_delta(self, delta: i32) -> Self {
        Self::new(
            self.width.saturating_add(delta),
            self.height,
            self.tile_size,
            self.hazard_density,
            self.seed,
            self.lock_seed,
        )
    }

    pub fn with_height_delta(self, delta: i32) -> Self {
        Self::new(
            self.width,
            self.height.saturating_add(delta),
            self.tile_size,
            self.hazard_density,
            self.seed,
            self.lock_seed,
        )
    }

    pub fn with_tile_size_delta(self, delta: i32) -> Self {
        Self::new(
            self.width,
            self.height,
            self.tile_size.saturating_add(delta),
            self.hazard_density,
            self.seed,
            self.lock_seed,
        )
    }

    pub fn with_hazard_delta(self, delta: f32) -> Self {
        Self::new(
            self.width,
            self.height,
            self.tile_size,
            self.hazard_density + delta,
            self.seed,
            self.lock_seed,
        )
    }

    /// Uses an explicit seed and locks it
    pub fn with_seed(self, seed: i64) -> Self {
        Self { seed, lock_seed: true, ..self }
    }

    /// Draws a fresh seed and unlocks it
    pub fn with_random_seed(self) -> Self {
        Self {
            seed: rand::rng().random(),
            lock_seed: false,
            ..self
        }
    }

    pub fn with_seed_lock(self, locked: bool) -> Self {
        Self { lock_seed: locked, ..self }
    }
}

fn ensure_odd(value: i32) -> i32 {
    if value % 2 == 0 { value + 1 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalises_dimensions() {
        let settings = LevelSettings::new(2, 10, 48, 0.1, 7, false);
        assert_eq!(settings.width(), 9);
        assert_eq!(settings.height(), 11);

        let settings = LevelSettings::new(5, 2, 48, 0.1, 7, false);
        assert_eq!(settings.width(), 9);
        assert_eq!(settings.height(), 5);
    }

    #[test]
    fn test_caps_huge_dimensions() {
        let settings = LevelSettings::new(60_001, i32::MAX, 48, 0.1, 7, false);
        assert_eq!(settings.width(), MAX_DIMENSION);
        assert_eq!(settings.height(), MAX_DIMENSION);
        assert_eq!(settings.with_width_delta(2).width(), MAX_DIMENSION);
        assert_eq!(settings.with_height_delta(i32::MAX).height(), MAX_DIMENSION);
    }

    #[test]
    fn test_clamps_tile_size_and_hazard() {
        let settings = LevelSettings::new(9, 9, 4, 2.0, 0, false);
        assert_eq!(settings.tile_size(), 16);
        assert_eq!(settings.hazard_density(), 0.6);

        let settings = settings.with_tile_size_delta(500).with_hazard_delta(-5.0);
        assert_eq!(settings.tile_size(), 128);
        assert_eq!(settings.hazard_density(), 0.0);
    }

    #[test]
    fn test_width_steps_stay_odd() {
        let settings = LevelSettings::new(25, 19, 48, 0.08, 1, false);
        assert_eq!(settings.with_width_delta(2).width(), 27);
        assert_eq!(settings.with_width_delta(-2).width(), 23);
        assert_eq!(settings.with_height_delta(-100).height(), 5);
    }

    #[test]
    fn test_seed_locking() {
        let settings = LevelSettings::new(25, 19, 48, 0.08, 1, false);
        let locked = settings.with_seed(42);
        assert_eq!(locked.seed(), 42);
        assert!(locked.lock_seed());

        let unlocked = locked.with_random_seed();
        assert!(!unlocked.lock_seed());

        assert!(unlocked.with_seed_lock(true).lock_seed());
        assert_eq!(unlocked.with_seed_lock(true).seed(), unlocked.seed());
    }
}
