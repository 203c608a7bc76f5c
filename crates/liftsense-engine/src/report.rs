//! Response shapes handed to the transport layer.
//!
//! The engine does not own a network server; these are the serializable
//! contracts a transport (REST handler, IPC bridge, test harness) returns
//! verbatim. Field and code names are part of the wire contract consumed by
//! the existing front end, so they are pinned here rather than derived.

use crate::detection::live::{AnnotatedKeypoint, LiveAngles, LiveFormAnalysis};
use crate::domain::{Feedback, SpineRiskReport};
use serde::{Deserialize, Serialize};

/// Machine-readable error codes on the predict channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A required landmark was absent from the submitted frame
    LandmarkMissing,
    /// The session window has not accumulated 30 frames yet
    InsufficientFrames,
    /// The fault model never loaded; label channel unavailable
    #[serde(rename = "MLModelNotLoaded")]
    MlModelNotLoaded,
}

/// Response for one live-feedback frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePoseResponse {
    /// Whether angles were produced for this frame
    pub success: bool,
    /// Status message when no analysis was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Smoothed joint angles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angles: Option<LiveAngles>,
    /// Input landmarks plus synthesized control points
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keypoints: Vec<AnnotatedKeypoint>,
    /// Coaching message/level pair
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl LivePoseResponse {
    /// Successful analysis of a detected person.
    #[must_use]
    pub fn from_analysis(analysis: LiveFormAnalysis) -> Self {
        Self {
            success: true,
            message: None,
            angles: Some(analysis.angles),
            keypoints: analysis.keypoints,
            feedback: Some(analysis.feedback),
        }
    }

    /// The pose source saw no person; nothing was analyzed.
    #[must_use]
    pub fn no_person() -> Self {
        Self::skipped("No person detected")
    }

    /// Frame skipped with the given status message.
    #[must_use]
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            angles: None,
            keypoints: Vec::new(),
            feedback: None,
        }
    }
}

/// Response for one predict-channel frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Detected fault labels; empty until the window is full and classified
    pub labels: Vec<String>,
    /// Whether a full window was classified this frame
    pub ml_ready: bool,
    /// Error code when labels could not be produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    /// Spinal risk report; absent only when the frame itself was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spine: Option<SpineRiskReport>,
}

impl PredictResponse {
    /// Frame rejected outright; no session state was touched.
    #[must_use]
    pub fn rejected(error: ErrorCode) -> Self {
        Self {
            labels: Vec::new(),
            ml_ready: false,
            error: Some(error),
            spine: None,
        }
    }

    /// Frame accepted but the window is still filling.
    #[must_use]
    pub fn accumulating(spine: SpineRiskReport) -> Self {
        Self {
            labels: Vec::new(),
            ml_ready: false,
            error: Some(ErrorCode::InsufficientFrames),
            spine: Some(spine),
        }
    }

    /// Full window classified.
    #[must_use]
    pub fn classified(labels: Vec<String>, spine: SpineRiskReport) -> Self {
        Self {
            labels,
            ml_ready: true,
            error: None,
            spine: Some(spine),
        }
    }

    /// Window full but the classifier is unavailable; label channel only
    /// is degraded.
    #[must_use]
    pub fn degraded(spine: SpineRiskReport) -> Self {
        Self {
            labels: Vec::new(),
            ml_ready: false,
            error: Some(ErrorCode::MlModelNotLoaded),
            spine: Some(spine),
        }
    }
}
