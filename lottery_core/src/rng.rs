use std::collections::VecDeque;

use hmac::{Hmac, Mac};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::error::RngError;

pub type HmacSha256 = Hmac<Sha256>;

/// Uniform integer generator over a half-open range `[min, max)`.
///
/// Every consumer receives its source explicitly so tests can swap in a
/// [`ScriptedRandom`] and replay an exact sequence.
pub trait RandomSource {
    fn next(&mut self, min: u64, max: u64) -> Result<u64, RngError>;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next(&mut self, min: u64, max: u64) -> Result<u64, RngError> {
        (**self).next(min, max)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next(&mut self, min: u64, max: u64) -> Result<u64, RngError> {
        (**self).next(min, max)
    }
}

fn check_range(min: u64, max: u64) -> Result<u64, RngError> {
    if min >= max {
        return Err(RngError::InvalidRange { min, max });
    }
    Ok(max - min)
}

/// `StdRng` backed source, reproducible when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    inner: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next(&mut self, min: u64, max: u64) -> Result<u64, RngError> {
        check_range(min, max)?;
        Ok(self.inner.gen_range(min..max))
    }
}

// Provably-fair construction:
// server_seed (secret) + client_seed + nonce + cursor -> HMAC-SHA256 -> leading u32 -> float in [0,1)

pub fn derive_hash_hex(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

/// Maps the first four bytes (big endian) onto `[0, 1)`.
pub fn unit_float(hmac_bytes: &[u8; 32]) -> f64 {
    let v = u32::from_be_bytes([hmac_bytes[0], hmac_bytes[1], hmac_bytes[2], hmac_bytes[3]]);
    f64::from(v) / (f64::from(u32::MAX) + 1.0)
}

/// Deterministic source whose whole sequence can be re-derived once the
/// server seed is revealed. Publish [`ProvablyFairRng::server_seed_hash_hex`]
/// before play as the commitment.
#[derive(Debug, Clone)]
pub struct ProvablyFairRng {
    server_seed: String, // secret until revealed
    client_seed: String,
    nonce: u64,
    cursor: u64,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            cursor: 0,
        }
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Number of values drawn so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self, cursor: u64) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        let msg = format!("{}:{}:{}", self.client_seed, self.nonce, cursor);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }
}

impl RandomSource for ProvablyFairRng {
    fn next(&mut self, min: u64, max: u64) -> Result<u64, RngError> {
        let span = check_range(min, max)?;
        let bytes = self.hmac_bytes(self.cursor);
        self.cursor += 1;
        let f = unit_float(&bytes);
        let offset = ((f * span as f64).floor() as u64).min(span - 1);
        Ok(min + offset)
    }
}

/// Replays a fixed sequence of values and records every requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<u64>,
    fallback: Option<u64>,
    calls: Vec<(u64, u64)>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: None,
            calls: Vec::new(),
        }
    }

    /// Value returned once the script has run out.
    pub fn with_fallback(mut self, value: u64) -> Self {
        self.fallback = Some(value);
        self
    }

    /// Ranges requested so far, in call order.
    pub fn calls(&self) -> &[(u64, u64)] {
        &self.calls
    }
}

impl RandomSource for ScriptedRandom {
    fn next(&mut self, min: u64, max: u64) -> Result<u64, RngError> {
        check_range(min, max)?;
        self.calls.push((min, max));
        let value = self
            .values
            .pop_front()
            .or(self.fallback)
            .ok_or(RngError::Exhausted)?;
        if value < min || value >= max {
            return Err(RngError::OutOfRange { value, min, max });
        }
        Ok(value)
    }
}
