//! Per-session sliding window of feature vectors and its aggregate.
//!
//! The classifier consumes one statistic vector per window, not per frame:
//! 30 frames (about one second of video) collapse into per-dimension mean,
//! max, min, and population standard deviation blocks. The window is pure
//! bookkeeping; invoking the classifier on the aggregate is the caller's
//! job so this stays independently testable.

use crate::error::{EngineError, EngineResult};
use crate::features::{FeatureVector, FEATURE_DIM};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of frames a session window holds when full.
pub const WINDOW_CAPACITY: usize = 30;

/// Number of dimensions in an aggregate vector (4 statistic blocks).
pub const AGGREGATE_DIM: usize = 4 * FEATURE_DIM;

/// The 56-dimension window statistic fed to the fault classifier.
///
/// Layout: mean block, max block, min block, population-std block, each in
/// the original 14-dimension feature order. The layout must match the order
/// used when the classifier was fit.
///
/// `serde`'s built-in array impls only cover lengths up to 32, so
/// (de)serialization for this fixed-size array is implemented by hand below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateVector(pub [f64; AGGREGATE_DIM]);

impl Serialize for AggregateVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut seq = serializer.serialize_tuple(AGGREGATE_DIM)?;
        for v in &self.0 {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for AggregateVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AggregateVectorVisitor;

        impl<'de> serde::de::Visitor<'de> for AggregateVectorVisitor {
            type Value = AggregateVector;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "an array of {AGGREGATE_DIM} f64 values")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = [0.0_f64; AGGREGATE_DIM];
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = seq.next_element()?.ok_or_else(|| {
                        serde::de::Error::invalid_length(i, &self)
                    })?;
                }
                Ok(AggregateVector(out))
            }
        }

        deserializer.deserialize_tuple(AGGREGATE_DIM, AggregateVectorVisitor)
    }
}

impl AggregateVector {
    /// The aggregate as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The mean block, in feature order.
    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.0[..FEATURE_DIM]
    }

    /// The max block, in feature order.
    #[must_use]
    pub fn maxima(&self) -> &[f64] {
        &self.0[FEATURE_DIM..2 * FEATURE_DIM]
    }

    /// The min block, in feature order.
    #[must_use]
    pub fn minima(&self) -> &[f64] {
        &self.0[2 * FEATURE_DIM..3 * FEATURE_DIM]
    }

    /// The population-std block, in feature order.
    #[must_use]
    pub fn deviations(&self) -> &[f64] {
        &self.0[3 * FEATURE_DIM..]
    }
}

/// Fixed-capacity FIFO of the most recent feature vectors for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionWindow {
    frames: VecDeque<FeatureVector>,
}

impl SessionWindow {
    /// Creates an empty window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: VecDeque::with_capacity(WINDOW_CAPACITY),
        }
    }

    /// Appends a feature vector, evicting the oldest entry once full.
    pub fn push(&mut self, features: FeatureVector) {
        if self.frames.len() == WINDOW_CAPACITY {
            self.frames.pop_front();
        }
        self.frames.push_back(features);
    }

    /// Number of frames currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the window holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether the window holds exactly [`WINDOW_CAPACITY`] frames.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.frames.len() == WINDOW_CAPACITY
    }

    /// Collapses the full window into its aggregate statistic vector.
    ///
    /// Fails with [`EngineError::WindowNotFull`] until exactly
    /// [`WINDOW_CAPACITY`] frames have been buffered.
    pub fn aggregate(&self) -> EngineResult<AggregateVector> {
        if !self.is_ready() {
            return Err(EngineError::WindowNotFull {
                required: WINDOW_CAPACITY,
                available: self.frames.len(),
            });
        }

        let mut matrix = Array2::zeros((WINDOW_CAPACITY, FEATURE_DIM));
        for (i, features) in self.frames.iter().enumerate() {
            for (j, &value) in features.as_slice().iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }

        let mut out = [0.0; AGGREGATE_DIM];
        for j in 0..FEATURE_DIM {
            let column = matrix.index_axis(Axis(1), j);

            let mean = column.sum() / WINDOW_CAPACITY as f64;
            let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = column.iter().copied().fold(f64::INFINITY, f64::min);
            let variance =
                column.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / WINDOW_CAPACITY as f64;

            out[j] = mean;
            out[FEATURE_DIM + j] = max;
            out[2 * FEATURE_DIM + j] = min;
            out[3 * FEATURE_DIM + j] = variance.sqrt();
        }

        Ok(AggregateVector(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_features(value: f64) -> FeatureVector {
        FeatureVector([value; FEATURE_DIM])
    }

    #[test]
    fn test_ready_exactly_at_capacity() {
        let mut window = SessionWindow::new();
        for i in 0..WINDOW_CAPACITY {
            assert!(!window.is_ready(), "not ready at {i} frames");
            window.push(constant_features(i as f64));
        }
        assert!(window.is_ready());
    }

    #[test]
    fn test_aggregate_before_ready_fails() {
        let mut window = SessionWindow::new();
        for _ in 0..WINDOW_CAPACITY - 1 {
            window.push(constant_features(1.0));
        }
        let err = window.aggregate().unwrap_err();
        assert!(matches!(
            err,
            EngineError::WindowNotFull {
                required: 30,
                available: 29
            }
        ));
    }

    #[test]
    fn test_fifo_eviction_keeps_capacity() {
        let mut window = SessionWindow::new();
        for i in 0..WINDOW_CAPACITY {
            window.push(constant_features(i as f64));
        }
        // The 31st append evicts frame 0
        window.push(constant_features(99.0));

        assert_eq!(window.len(), WINDOW_CAPACITY);
        assert!(window.is_ready());

        let aggregate = window.aggregate().unwrap();
        // Min is now 1.0 (frame 0's zeros evicted), max the new 99.0
        assert_eq!(aggregate.minima()[0], 1.0);
        assert_eq!(aggregate.maxima()[0], 99.0);
    }

    #[test]
    fn test_aggregate_dimension_and_block_order() {
        let mut window = SessionWindow::new();
        for _ in 0..WINDOW_CAPACITY {
            window.push(constant_features(2.5));
        }
        let aggregate = window.aggregate().unwrap();

        assert_eq!(aggregate.as_slice().len(), AGGREGATE_DIM);
        // A constant window: mean == max == min, std == 0
        assert!(aggregate.means().iter().all(|&v| v == 2.5));
        assert!(aggregate.maxima().iter().all(|&v| v == 2.5));
        assert!(aggregate.minima().iter().all(|&v| v == 2.5));
        assert!(aggregate.deviations().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_min_mean_max_invariant() {
        let mut window = SessionWindow::new();
        for i in 0..WINDOW_CAPACITY {
            let mut values = [0.0; FEATURE_DIM];
            for (d, v) in values.iter_mut().enumerate() {
                *v = (i as f64) * 0.7 + (d as f64) * 1.3;
            }
            window.push(FeatureVector(values));
        }
        let aggregate = window.aggregate().unwrap();

        for d in 0..FEATURE_DIM {
            assert!(aggregate.minima()[d] <= aggregate.means()[d]);
            assert!(aggregate.means()[d] <= aggregate.maxima()[d]);
            assert!(aggregate.deviations()[d] >= 0.0);
        }
    }

    #[test]
    fn test_population_std() {
        let mut window = SessionWindow::new();
        // Alternate 0 and 10: population std is exactly 5
        for i in 0..WINDOW_CAPACITY {
            window.push(constant_features(if i % 2 == 0 { 0.0 } else { 10.0 }));
        }
        let aggregate = window.aggregate().unwrap();
        assert!((aggregate.deviations()[0] - 5.0).abs() < 1e-12);
    }
}
