//! Random field generation.
//!
//! Every generator run builds its own sample source from the seed, so two runs
//! never share state and the same `(size, seed)` always yields the same field.
//! The default source is ChaCha8; a classic linear congruential generator can
//! be selected explicitly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{ConfigError, TextureError};
use crate::field::ScalarField;

/// A stream of byte samples, uniform over `0..=255`.
pub trait SampleSource {
    fn next_sample(&mut self) -> u8;
}

/// ChaCha8 stream seeded from the 32-bit texture seed.
pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }
}

impl SampleSource for ChaChaSource {
    fn next_sample(&mut self) -> u8 {
        self.rng.gen_range(0..=255u8)
    }
}

/// Largest accepted LCG modulus.
pub const MAX_LCG_MODULUS: u64 = u32::MAX as u64;

/// Parameters of `state = (factor * state + offset) % modulus`.
///
/// Construction enforces the Hull-Dobell conditions so the sequence reaches
/// every residue before repeating:
/// - offset and modulus are coprime
/// - if 4 divides modulus, factor % 4 == 1
/// - for every prime p dividing modulus, factor % p == 1
///
/// The modulus is capped at [`MAX_LCG_MODULUS`] so factoring it stays cheap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LcgParams {
    factor: u64,
    offset: u64,
    modulus: u64,
}

impl LcgParams {
    pub fn new(factor: u64, offset: u64, modulus: u64) -> Result<Self, ConfigError> {
        if modulus < 2 {
            return Err(ConfigError::InvalidLcg(format!(
                "modulus must be at least 2, got {}",
                modulus
            )));
        }
        if modulus > MAX_LCG_MODULUS {
            return Err(ConfigError::InvalidLcg(format!(
                "modulus must be at most {}, got {}",
                MAX_LCG_MODULUS, modulus
            )));
        }
        if factor == 0 || factor >= modulus {
            return Err(ConfigError::InvalidLcg(format!(
                "factor must lie in 1..{}, got {}",
                modulus, factor
            )));
        }
        if gcd(offset, modulus) != 1 {
            return Err(ConfigError::InvalidLcg(format!(
                "offset {} and modulus {} are not coprime",
                offset, modulus
            )));
        }
        if modulus % 4 == 0 && factor % 4 != 1 {
            return Err(ConfigError::InvalidLcg(format!(
                "modulus {} is a multiple of 4 but factor {} % 4 != 1",
                modulus, factor
            )));
        }
        if let Some(p) = prime_factors(modulus).into_iter().find(|&p| factor % p != 1) {
            return Err(ConfigError::InvalidLcg(format!(
                "factor {} % {} != 1 for prime factor {} of modulus",
                factor, p, p
            )));
        }

        Ok(Self { factor, offset, modulus })
    }

    pub fn factor(&self) -> u64 {
        self.factor
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}

impl Default for LcgParams {
    /// Full-period generator over 2^16 states; factor sits next to sqrt(modulus).
    fn default() -> Self {
        Self {
            factor: 257,
            offset: 13,
            modulus: 1 << 16,
        }
    }
}

/// Linear congruential stream. The first sample is the seed itself.
pub struct LcgSource {
    params: LcgParams,
    state: u64,
    started: bool,
}

impl LcgSource {
    pub fn new(params: LcgParams, seed: u32) -> Self {
        Self {
            params,
            state: seed as u64 % params.modulus,
            started: false,
        }
    }

    fn advance(&mut self) -> u64 {
        if self.started {
            let next = (self.params.factor as u128 * self.state as u128 + self.params.offset as u128)
                % self.params.modulus as u128;
            self.state = next as u64;
        } else {
            self.started = true;
        }
        self.state
    }
}

impl SampleSource for LcgSource {
    fn next_sample(&mut self) -> u8 {
        let state = self.advance();
        // Scale onto the byte range using the high bits of the state.
        ((state as u128 * 256) / self.params.modulus as u128) as u8
    }
}

/// Which sample source backs a generator run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RandomStrategy {
    #[default]
    ChaCha,
    Lcg(LcgParams),
}

impl RandomStrategy {
    fn source(&self, seed: u32) -> Box<dyn SampleSource> {
        match *self {
            RandomStrategy::ChaCha => Box::new(ChaChaSource::new(seed)),
            RandomStrategy::Lcg(params) => Box::new(LcgSource::new(params, seed)),
        }
    }
}

impl std::fmt::Display for RandomStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RandomStrategy::ChaCha => write!(f, "chacha8"),
            RandomStrategy::Lcg(p) => write!(f, "lcg(a={}, c={}, m={})", p.factor, p.offset, p.modulus),
        }
    }
}

/// Fills fields with independent byte samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomFieldGenerator {
    strategy: RandomStrategy,
}

impl RandomFieldGenerator {
    pub fn new(strategy: RandomStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> RandomStrategy {
        self.strategy
    }

    /// Generate a `size x size` field, filled row by row from a fresh source.
    pub fn generate(&self, size: usize, seed: u32) -> Result<ScalarField, TextureError> {
        let mut field = ScalarField::new(size)?;
        let mut source = self.strategy.source(seed);
        for sample in field.as_mut_slice() {
            *sample = source.next_sample() as f64;
        }
        Ok(field)
    }
}

/// Generate a random field with the default ChaCha source.
pub fn generate(size: usize, seed: u32) -> Result<ScalarField, TextureError> {
    RandomFieldGenerator::default().generate(size, seed)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut p = 2;
    while p <= n / p {
        if n % p == 0 {
            factors.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}
