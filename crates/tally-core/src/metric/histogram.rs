use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Values retained for quantile estimates.
const SAMPLE_SIZE: usize = 1028;

/// How a histogram chooses which values to keep for quantiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleMode {
    /// Every recorded value is equally likely to be kept.
    #[default]
    Uniform,
    /// Keep the most recent values.
    Biased,
}

/// Distribution of recorded `i64` values.
///
/// Count, min, max, mean and variance cover every value ever recorded;
/// quantiles come from a bounded sample.
#[derive(Debug)]
pub struct Histogram {
    mode: SampleMode,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    count: u64,
    min: i64,
    max: i64,
    sum: i128,
    mean: f64,
    m2: f64,
    sample: Vec<i64>,
    /// Next slot to overwrite once a biased sample is full.
    cursor: usize,
    rng: u64,
}

impl State {
    fn new() -> Self {
        Self {
            count: 0,
            min: i64::MAX,
            max: i64::MIN,
            sum: 0,
            mean: 0.0,
            m2: 0.0,
            sample: Vec::with_capacity(SAMPLE_SIZE),
            cursor: 0,
            rng: seed(),
        }
    }

    fn next_random(&mut self) -> u64 {
        // xorshift64
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng = x;
        x
    }
}

fn seed() -> u64 {
    let s = RandomState::new().build_hasher().finish();
    if s == 0 {
        0x9E37_79B9_7F4A_7C15
    } else {
        s
    }
}

impl Histogram {
    pub fn new(mode: SampleMode) -> Self {
        Self {
            mode,
            state: Mutex::new(State::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mode(&self) -> SampleMode {
        self.mode
    }

    pub fn update(&self, value: i64) {
        let mut s = self.state();
        s.count += 1;
        s.min = s.min.min(value);
        s.max = s.max.max(value);
        s.sum += i128::from(value);

        // Welford
        let v = value as f64;
        let delta = v - s.mean;
        s.mean += delta / s.count as f64;
        s.m2 += delta * (v - s.mean);

        if s.sample.len() < SAMPLE_SIZE {
            s.sample.push(value);
            return;
        }
        match self.mode {
            SampleMode::Biased => {
                let slot = s.cursor;
                s.sample[slot] = value;
                s.cursor = (slot + 1) % SAMPLE_SIZE;
            }
            SampleMode::Uniform => {
                let count = s.count;
                let r = (s.next_random() % count) as usize;
                if r < SAMPLE_SIZE {
                    s.sample[r] = value;
                }
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.state().count
    }

    /// Smallest recorded value, or 0 when empty.
    pub fn min(&self) -> i64 {
        let s = self.state();
        if s.count == 0 {
            0
        } else {
            s.min
        }
    }

    /// Largest recorded value, or 0 when empty.
    pub fn max(&self) -> i64 {
        let s = self.state();
        if s.count == 0 {
            0
        } else {
            s.max
        }
    }

    pub fn sum(&self) -> i128 {
        self.state().sum
    }

    pub fn mean(&self) -> f64 {
        self.state().mean
    }

    /// Sample standard deviation, or 0 with fewer than two values.
    pub fn std_dev(&self) -> f64 {
        let s = self.state();
        if s.count < 2 {
            return 0.0;
        }
        (s.m2 / (s.count - 1) as f64).sqrt()
    }

    /// Estimate the value at quantile `q` (clamped to `0.0..=1.0`).
    pub fn quantile(&self, q: f64) -> f64 {
        self.quantiles(&[q]).first().copied().unwrap_or(0.0)
    }

    /// Estimate several quantiles from one sorted copy of the sample.
    pub fn quantiles(&self, qs: &[f64]) -> Vec<f64> {
        let mut values = self.state().sample.clone();
        if values.is_empty() {
            return vec![0.0; qs.len()];
        }
        values.sort_unstable();
        qs.iter().map(|&q| interpolate(&values, q)).collect()
    }

    pub fn clear(&self) {
        *self.state() = State::new();
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn interpolate(sorted: &[i64], q: f64) -> f64 {
    let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
    let pos = q * (sorted.len() + 1) as f64;
    if pos < 1.0 {
        return sorted[0] as f64;
    }
    if pos >= sorted.len() as f64 {
        return sorted[sorted.len() - 1] as f64;
    }
    let lower = sorted[pos as usize - 1] as f64;
    let upper = sorted[pos as usize] as f64;
    lower + (pos - pos.floor()) * (upper - lower)
}
