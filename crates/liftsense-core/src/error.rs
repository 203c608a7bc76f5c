//! Error types shared across the LiftSense workspace.
//!
//! Frame-level errors are deliberately small: a frame either carries the
//! joints a consumer needs or it does not. Everything else (window
//! readiness, classifier availability) lives with the engine that owns the
//! state in question.
//!
//! # Example
//!
//! ```rust
//! use liftsense_core::{BodyJoint, Landmark, PoseFrame, PoseError};
//!
//! let short_frame = PoseFrame::new(vec![Landmark::at(0.1, 0.2); 5]);
//! let err = short_frame.joint(BodyJoint::LeftHip).unwrap_err();
//! assert!(matches!(err, PoseError::LandmarkMissing { .. }));
//! ```

use crate::types::BodyJoint;
use thiserror::Error;

/// A specialized `Result` type for frame-level operations.
pub type PoseResult<T> = Result<T, PoseError>;

/// Errors raised while reading joints out of a pose frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PoseError {
    /// A joint the consumer requires is absent from the submitted frame,
    /// either because the pose source returned a truncated landmark list
    /// or because it never produced that index.
    #[error("Required landmark missing: {joint} (index {})", .joint.index())]
    LandmarkMissing {
        /// The joint that could not be resolved
        joint: BodyJoint,
    },

    /// The submitted frame does not carry the full landmark set the pose
    /// model contract promises.
    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount {
        /// Expected number of landmarks
        expected: usize,
        /// Actual number of landmarks received
        actual: usize,
    },
}

impl PoseError {
    /// Creates a missing-landmark error for the given joint.
    #[must_use]
    pub fn landmark_missing(joint: BodyJoint) -> Self {
        Self::LandmarkMissing { joint }
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// All frame-level errors are recoverable: the caller resubmits a
    /// complete frame and accumulated session state is untouched.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::LandmarkMissing { .. } | Self::InvalidLandmarkCount { .. } => true,
        }
    }
}
