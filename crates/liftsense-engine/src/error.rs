//! Engine-level error taxonomy.
//!
//! Every error here is local to a single frame and session: a failed frame
//! is dropped without corrupting accumulated window or risk state, and a
//! classifier failure degrades only the fault-label channel. Nothing in
//! this module is fatal to the process.

use crate::ml::MlError;
use liftsense_core::PoseError;
use thiserror::Error;

/// A specialized `Result` type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level error type for the analysis engine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    /// Frame-level landmark error
    #[error(transparent)]
    Pose(#[from] PoseError),

    /// The session window has not yet accumulated enough frames
    #[error("Window not full: need {required} frames, have {available}")]
    WindowNotFull {
        /// Frames required before aggregation
        required: usize,
        /// Frames currently buffered
        available: usize,
    },

    /// Fault classifier error
    #[error("Classifier error: {0}")]
    Classifier(#[from] MlError),
}

impl EngineError {
    /// Returns `true` if this error is recoverable.
    ///
    /// A not-full window self-resolves as frames arrive; a landmark error
    /// resolves when the caller resubmits a complete frame; classifier
    /// recoverability is delegated to the ML layer.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Pose(e) => e.is_recoverable(),
            Self::WindowNotFull { .. } => true,
            Self::Classifier(e) => e.is_recoverable(),
        }
    }
}
