use lotto_core::{LottoConfig, NumberSet};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Winning numbers plus a bonus drawn from the 39 numbers left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDraw {
    pub numbers: NumberSet,
    pub bonus: u8,
}

/// Draw six numbers without replacement, then one bonus out of the
/// remaining pool. The bonus cannot collide with the set.
pub fn generate_draw<R: Rng + ?Sized>(rng: &mut R) -> GeneratedDraw {
    let numbers = NumberSet::random(rng);
    let remaining = numbers.complement();
    let bonus = remaining[rng.gen_range(0..remaining.len())];
    GeneratedDraw { numbers, bonus }
}

/// Shared entropy source for draws and quick picks.
pub struct DrawGenerator {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl DrawGenerator {
    pub fn new(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &LottoConfig) -> Self {
        match config.draw_seed {
            Some(seed) => {
                tracing::warn!("Using fixed draw seed {}, draws are reproducible", seed);
                Self::seeded(seed)
            }
            None => Self::from_entropy(),
        }
    }

    pub fn generate(&self) -> GeneratedDraw {
        let mut rng = self.rng.lock();
        generate_draw(&mut *rng)
    }

    pub fn quick_pick(&self) -> NumberSet {
        let mut rng = self.rng.lock();
        NumberSet::random(&mut *rng)
    }
}

impl std::fmt::Debug for DrawGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_bonus_never_in_winning_set() {
        let generator = DrawGenerator::seeded(45);
        for _ in 0..5_000 {
            let draw = generator.generate();
            assert!(!draw.numbers.contains(draw.bonus));
            assert!((1..=45).contains(&draw.bonus));
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let a = DrawGenerator::seeded(99);
        let b = DrawGenerator::seeded(99);
        for _ in 0..20 {
            assert_eq!(a.generate(), b.generate());
            assert_eq!(a.quick_pick(), b.quick_pick());
        }
    }

    #[test]
    fn test_any_rng_can_be_injected() {
        // a degenerate source still yields a valid draw
        let generator = DrawGenerator::new(StepRng::new(0, 0));
        let draw = generator.generate();
        assert!(!draw.numbers.contains(draw.bonus));
        assert_eq!(draw.numbers.as_slice().len(), 6);
    }

    #[test]
    fn test_every_number_can_be_drawn() {
        let generator = DrawGenerator::seeded(1);
        let mut seen = [false; 46];
        for _ in 0..1_000 {
            let draw = generator.generate();
            for n in draw.numbers.iter() {
                seen[n as usize] = true;
            }
            seen[draw.bonus as usize] = true;
        }
        assert!(seen[1..].iter().all(|s| *s));
    }
}
