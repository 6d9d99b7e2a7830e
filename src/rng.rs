//! Session PRNG.
//!
//! Mulberry32: tiny, fast, and good enough for picking game colors. The step
//! is a pure function so challenge-generation tests can fix a seed and assert
//! exact rounds; the browser only contributes entropy once, at session start.

/// Advance one Mulberry32 step. Returns `(value_in_0_1, next_state)`.
pub fn mulberry32(state: u32) -> (f64, u32) {
    let mut t = state.wrapping_add(0x6d2b79f5);
    let next_state = t;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    let value = (t ^ (t >> 14)) as f64 / 4294967296.0;
    (value, next_state)
}

/// Stateful handle over the Mulberry32 stream.
#[derive(Clone, Copy, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from platform entropy (browser crypto on wasm, OS otherwise).
    /// Falls back to a fixed seed if the entropy source is unavailable;
    /// gameplay fairness does not depend on unpredictability.
    pub fn seeded() -> Self {
        let mut buf = [0u8; 4];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => Self::new(u32::from_le_bytes(buf)),
            Err(_) => Self::new(0x5eed_c0de),
        }
    }

    pub fn next_f64(&mut self) -> f64 {
        let (value, next) = mulberry32(self.state);
        self.state = next;
        value
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_f64() * len as f64) as usize
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_deterministic() {
        assert_eq!(mulberry32(12345), mulberry32(12345));
        let (v, s) = mulberry32(0);
        assert_eq!(v, 0.26642920868471265);
        assert_eq!(s, 1831565813);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let mut rng = Rng::new(42);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "value out of range: {v}");
        }
    }

    #[test]
    fn pick_stays_in_bounds() {
        let mut rng = Rng::new(99);
        for _ in 0..1000 {
            assert!(rng.pick(4) < 4);
        }
    }

    #[test]
    fn fixed_seed_reproduces_pick_sequence() {
        let mut rng = Rng::new(7);
        let picks: Vec<usize> = (0..8).map(|_| rng.pick(4)).collect();
        assert_eq!(picks, [0, 0, 3, 2, 2, 1, 1, 0]);
    }

    #[test]
    fn chance_follows_the_stream() {
        let mut rng = Rng::new(2024);
        let hits: Vec<bool> = (0..8).map(|_| rng.chance(0.6)).collect();
        assert_eq!(
            hits,
            [false, false, false, false, true, false, true, true]
        );
    }
}
