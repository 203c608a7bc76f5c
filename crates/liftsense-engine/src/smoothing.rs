//! Exponential moving average smoothing.
//!
//! Two independent filter configurations run in this engine: the live
//! feedback path smooths knee/hip/back angles with [`LIVE_ALPHA`] in one
//! process-wide filter, and each session's spine monitor owns a private
//! scalar smoother at [`SPINE_ALPHA`]. They never share state or keys.

use std::collections::HashMap;
use std::hash::Hash;

/// Smoothing weight for the live-feedback angle filter.
pub const LIVE_ALPHA: f64 = 0.4;

/// Smoothing weight for the per-session spinal curvature smoother.
pub const SPINE_ALPHA: f64 = 0.3;

/// Scalar exponential moving average over a single signal.
///
/// The first update returns the raw value unchanged; afterwards each update
/// blends `alpha * value + (1 - alpha) * previous`. Updating with `None` is
/// a no-op that leaves and returns the previous state.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    state: Option<f64>,
}

impl Ema {
    /// Creates an unset smoother with the given weight.
    #[must_use]
    pub const fn new(alpha: f64) -> Self {
        Self { alpha, state: None }
    }

    /// Feeds one sample, returning the smoothed value.
    pub fn update(&mut self, value: Option<f64>) -> Option<f64> {
        if let Some(v) = value {
            let next = match self.state {
                None => v,
                Some(prev) => self.alpha * v + (1.0 - self.alpha) * prev,
            };
            self.state = Some(next);
        }
        self.state
    }

    /// The current smoothed value, if any sample has been seen.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.state
    }

    /// Clears the smoother back to the unset state.
    pub fn reset(&mut self) {
        self.state = None;
    }
}

/// Keyed EMA filter: one independent [`Ema`] per signal key.
#[derive(Debug, Clone)]
pub struct EmaFilter<K> {
    alpha: f64,
    state: HashMap<K, f64>,
}

impl<K: Eq + Hash + Copy> EmaFilter<K> {
    /// Creates an empty filter with the given weight.
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            state: HashMap::new(),
        }
    }

    /// Feeds one sample for `key`, returning the smoothed value.
    ///
    /// `None` is a no-op returning whatever the key last smoothed to.
    pub fn update(&mut self, key: K, value: Option<f64>) -> Option<f64> {
        if let Some(v) = value {
            let next = match self.state.get(&key) {
                None => v,
                Some(prev) => self.alpha * v + (1.0 - self.alpha) * prev,
            };
            self.state.insert(key, next);
        }
        self.state.get(&key).copied()
    }

    /// The current smoothed value for `key`.
    #[must_use]
    pub fn value(&self, key: K) -> Option<f64> {
        self.state.get(&key).copied()
    }
}
