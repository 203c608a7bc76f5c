//! # LiftSense Core
//!
//! Core types, the anatomical landmark scheme, and the geometry kernel for
//! the LiftSense deadlift analysis engine.
//!
//! This crate provides the foundational building blocks used throughout the
//! LiftSense workspace, including:
//!
//! - **Core Data Types**: [`Landmark`], [`PoseFrame`], [`Point`], and
//!   [`SessionId`] for representing per-frame pose observations and the
//!   session streams they belong to.
//!
//! - **Landmark Scheme**: [`BodyJoint`], the named mapping onto the fixed
//!   33-point pose-model index layout, validated at the frame boundary
//!   instead of re-derived from magic indices per call.
//!
//! - **Geometry Kernel**: pure angle/distance/midpoint/offset functions in
//!   the [`geometry`] module, with epsilon-guarded degenerate handling.
//!
//! - **Error Types**: the [`error`] module with the frame-level error
//!   taxonomy shared by all consumers.
//!
//! ## Example
//!
//! ```rust
//! use liftsense_core::{BodyJoint, Landmark, PoseFrame};
//!
//! let landmarks = vec![Landmark::at(0.5, 0.5); liftsense_core::POSE_LANDMARK_COUNT];
//! let frame = PoseFrame::new(landmarks);
//!
//! let hip = frame.joint(BodyJoint::LeftHip).unwrap();
//! assert_eq!(hip.x, 0.5);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod geometry;
pub mod types;

// Re-export commonly used types at the crate root
pub use error::{PoseError, PoseResult};
pub use types::{BodyJoint, Landmark, Point, PoseFrame, SessionId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of landmarks in a full pose observation (fixed pose-model contract)
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Default visibility assigned when the pose source omits the field
pub const DEFAULT_VISIBILITY: f64 = 1.0;

/// Prelude module for convenient imports.
///
/// ```rust
/// use liftsense_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{PoseError, PoseResult};
    pub use crate::geometry;
    pub use crate::types::{BodyJoint, Landmark, Point, PoseFrame, SessionId};
}
