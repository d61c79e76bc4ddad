use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random draws over [0, 1).
///
/// The processor takes its delay and failure draws through this trait so
/// tests can swap in a fixed or seeded sequence instead of `thread_rng`.
pub trait UniformSampler: Send + Sync {
    fn sample(&self) -> f64;
}

/// Production sampler backed by the thread-local RNG.
pub struct ThreadRngSampler;

impl UniformSampler for ThreadRngSampler {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic sampler seeded from a fixed value.
pub struct SeededSampler {
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl UniformSampler for SeededSampler {
    fn sample(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap();
        rng.gen::<f64>()
    }
}

/// Sampler that cycles through a fixed sequence of values.
///
/// With two values the first drives the delay draw and the second the
/// failure draw, so `[0.0, 0.0]` forces an instant success and
/// `[0.0, 0.99]` an instant failure.
pub struct SequenceSampler {
    values: Vec<f64>,
    next: AtomicUsize,
}

impl SequenceSampler {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceSampler needs at least one value");
        Self {
            values,
            next: AtomicUsize::new(0),
        }
    }
}

impl UniformSampler for SequenceSampler {
    fn sample(&self) -> f64 {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_sampler_cycles() {
        let s = SequenceSampler::new(vec![0.1, 0.9]);
        assert_eq!(s.sample(), 0.1);
        assert_eq!(s.sample(), 0.9);
        assert_eq!(s.sample(), 0.1);
    }

    #[test]
    fn seeded_sampler_is_reproducible() {
        let a = SeededSampler::new(7);
        let b = SeededSampler::new(7);
        for _ in 0..32 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn samplers_stay_in_unit_interval() {
        let s = SeededSampler::new(42);
        for _ in 0..1000 {
            let v = s.sample();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
