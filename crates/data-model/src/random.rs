//! Random source handed to data models.
//!
//! The job picks the source once and passes it into every build, so no
//! process-wide generator is touched.

use conf::{keys, Configuration};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    uniform: bool,
}

impl RandomSource {
    /// Entropy-seeded; every job sees a different split
    pub fn uniform() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            uniform: true,
        }
    }

    /// Deterministic; the same seed yields the same split
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            uniform: false,
        }
    }

    /// Picks the source from `data.splitter.random.uniform` and `rec.random.seed`
    pub fn from_conf(conf: &Configuration) -> conf::Result<Self> {
        if conf.get_bool(keys::RANDOM_UNIFORM)? {
            return Ok(Self::uniform());
        }
        let seed = conf.get_int_or(keys::RANDOM_SEED, 1)?;
        Ok(Self::seeded(seed as u64))
    }

    pub fn is_uniform(&self) -> bool {
        self.uniform
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RandomSource::seeded(7);
        let mut b = RandomSource::seeded(7);
        let mut xs: Vec<u32> = (0..50).collect();
        let mut ys = xs.clone();
        a.shuffle(&mut xs);
        b.shuffle(&mut ys);
        assert_eq!(xs, ys);
        assert!(!a.is_uniform());
    }

    #[test]
    fn test_from_conf() {
        let mut conf = Configuration::new();
        assert!(!RandomSource::from_conf(&conf).unwrap().is_uniform());
        conf.set(keys::RANDOM_UNIFORM, true);
        assert!(RandomSource::from_conf(&conf).unwrap().is_uniform());
    }
}
