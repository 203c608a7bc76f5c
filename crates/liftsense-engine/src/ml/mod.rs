//! Fault classification over window aggregates.
//!
//! The engine treats the classifier as a black box behind
//! [`FaultClassifier`]: it accepts the fixed 56-dimension aggregate layout
//! and returns zero or more fault labels. Whether a model artifact is
//! available is decided **once**, when the adapter is constructed, and the
//! result is cached; the engine never re-probes the filesystem per request.
//! An unavailable classifier degrades the label channel only — live angles
//! and the spinal risk tier keep flowing.

mod rule_based;

pub use rule_based::{RuleBasedFaultClassifier, RuleBasedThresholds};

use crate::window::AggregateVector;
use thiserror::Error;

/// Fault labels the bundled rule-based classifier can emit.
pub mod labels {
    /// No fault detected over the window
    pub const CORRECT_FORM: &str = "correct_form";
    /// Spine flexed through the pull
    pub const ROUNDED_BACK: &str = "rounded_back";
    /// Hips extending ahead of the knees
    pub const EARLY_HIP_RISE: &str = "early_hip_rise";
    /// Knees collapsing too deep for a hinge
    pub const EXCESSIVE_KNEE_BEND: &str = "excessive_knee_bend";
}

/// Errors that can occur in ML operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MlError {
    /// The model artifact failed to load; cached at construction
    #[error("Fault model is not loaded")]
    ModelUnavailable,

    /// Aggregate vector with the wrong layout reached the adapter
    #[error("Invalid input: expected {expected} dimensions, got {actual}")]
    InvalidInput {
        /// Expected dimension count
        expected: usize,
        /// Actual dimension count
        actual: usize,
    },

    /// The underlying model failed during inference
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl MlError {
    /// Returns `true` if this error is recoverable.
    ///
    /// An unavailable model stays unavailable for the process lifetime;
    /// inference failures are per-call and worth retrying.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Inference(_) => true,
            Self::ModelUnavailable | Self::InvalidInput { .. } => false,
        }
    }
}

/// Result type for ML operations.
pub type MlResult<T> = Result<T, MlError>;

/// Multi-label technique-fault classifier over a window aggregate.
pub trait FaultClassifier: Send + Sync {
    /// Predicts fault labels for one aggregate vector.
    ///
    /// Returns an empty set when the window shows nothing the model
    /// recognizes, and [`MlError::ModelUnavailable`] when the underlying
    /// model resource never loaded.
    fn predict(&self, aggregate: &AggregateVector) -> MlResult<Vec<String>>;

    /// Whether the underlying model resource is available.
    fn is_loaded(&self) -> bool;
}

/// Adapter representing a model artifact that failed to load.
///
/// Construction is the one-time initialization step: the failed state is
/// cached here instead of re-probing the model path on every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClassifier;

impl FaultClassifier for UnavailableClassifier {
    fn predict(&self, _aggregate: &AggregateVector) -> MlResult<Vec<String>> {
        Err(MlError::ModelUnavailable)
    }

    fn is_loaded(&self) -> bool {
        false
    }
}
