//! Core data types for pose observations.
//!
//! The pose source emits frames of 33 landmarks indexed by a fixed
//! anatomical scheme. [`BodyJoint`] names the indices this workspace
//! actually consumes, so lookups are validated once at the frame boundary
//! rather than scattered as magic numbers through every consumer.

use crate::error::{PoseError, PoseResult};
use crate::{DEFAULT_VISIBILITY, POSE_LANDMARK_COUNT};
use serde::{Deserialize, Serialize};

/// A 2-D point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One tracked anatomical point as reported by the pose source.
///
/// Coordinates are image-relative (typically in [0, 1]); `visibility` is a
/// confidence score in [0, 1] that defaults to 1.0 when the source omits it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
    /// Depth coordinate (unused by the 2-D analysis paths)
    #[serde(default)]
    pub z: f64,
    /// Detection confidence in [0, 1]
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

fn default_visibility() -> f64 {
    DEFAULT_VISIBILITY
}

impl Landmark {
    /// Creates a fully visible landmark at the given 2-D position.
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: DEFAULT_VISIBILITY,
        }
    }

    /// The landmark's 2-D position.
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Named joints over the fixed 33-point pose-model index layout.
///
/// Only the joints the analysis paths consume are named; the remaining
/// indices pass through untouched (e.g. in annotated keypoint output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyJoint {
    /// Nose (index 0)
    Nose,
    /// Left ear (index 7)
    LeftEar,
    /// Right ear (index 8)
    RightEar,
    /// Left shoulder (index 11)
    LeftShoulder,
    /// Right shoulder (index 12)
    RightShoulder,
    /// Left wrist (index 15)
    LeftWrist,
    /// Right wrist (index 16)
    RightWrist,
    /// Left hip (index 23)
    LeftHip,
    /// Right hip (index 24)
    RightHip,
    /// Left knee (index 25)
    LeftKnee,
    /// Right knee (index 26)
    RightKnee,
    /// Left ankle (index 27)
    LeftAnkle,
    /// Right ankle (index 28)
    RightAnkle,
}

impl BodyJoint {
    /// All named joints, in index order.
    pub const ALL: [BodyJoint; 13] = [
        BodyJoint::Nose,
        BodyJoint::LeftEar,
        BodyJoint::RightEar,
        BodyJoint::LeftShoulder,
        BodyJoint::RightShoulder,
        BodyJoint::LeftWrist,
        BodyJoint::RightWrist,
        BodyJoint::LeftHip,
        BodyJoint::RightHip,
        BodyJoint::LeftKnee,
        BodyJoint::RightKnee,
        BodyJoint::LeftAnkle,
        BodyJoint::RightAnkle,
    ];

    /// Index of this joint in the pose-model landmark array.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            BodyJoint::Nose => 0,
            BodyJoint::LeftEar => 7,
            BodyJoint::RightEar => 8,
            BodyJoint::LeftShoulder => 11,
            BodyJoint::RightShoulder => 12,
            BodyJoint::LeftWrist => 15,
            BodyJoint::RightWrist => 16,
            BodyJoint::LeftHip => 23,
            BodyJoint::RightHip => 24,
            BodyJoint::LeftKnee => 25,
            BodyJoint::RightKnee => 26,
            BodyJoint::LeftAnkle => 27,
            BodyJoint::RightAnkle => 28,
        }
    }

    /// Stable snake_case name, matching the wire format.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            BodyJoint::Nose => "nose",
            BodyJoint::LeftEar => "left_ear",
            BodyJoint::RightEar => "right_ear",
            BodyJoint::LeftShoulder => "left_shoulder",
            BodyJoint::RightShoulder => "right_shoulder",
            BodyJoint::LeftWrist => "left_wrist",
            BodyJoint::RightWrist => "right_wrist",
            BodyJoint::LeftHip => "left_hip",
            BodyJoint::RightHip => "right_hip",
            BodyJoint::LeftKnee => "left_knee",
            BodyJoint::RightKnee => "right_knee",
            BodyJoint::LeftAnkle => "left_ankle",
            BodyJoint::RightAnkle => "right_ankle",
        }
    }
}

impl std::fmt::Display for BodyJoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One full pose observation: an ordered landmark list from the pose source.
///
/// The frame stores whatever the source produced; consumers resolve the
/// joints they need through [`PoseFrame::joint`], which reports a missing
/// joint instead of panicking on a truncated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Landmarks in pose-model index order
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    /// Creates a frame from a raw landmark list.
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Validates that the frame carries the full landmark set.
    pub fn validate(&self) -> PoseResult<()> {
        if self.landmarks.len() == POSE_LANDMARK_COUNT {
            Ok(())
        } else {
            Err(PoseError::InvalidLandmarkCount {
                expected: POSE_LANDMARK_COUNT,
                actual: self.landmarks.len(),
            })
        }
    }

    /// Resolves a named joint to its 2-D position.
    pub fn joint(&self, joint: BodyJoint) -> PoseResult<Point> {
        self.landmarks
            .get(joint.index())
            .map(Landmark::point)
            .ok_or(PoseError::LandmarkMissing { joint })
    }

    /// Number of landmarks in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Whether the frame carries no landmarks at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// Opaque caller-supplied identifier scoping all per-user state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a session id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_frame() -> PoseFrame {
        PoseFrame::new(vec![Landmark::at(0.4, 0.6); POSE_LANDMARK_COUNT])
    }

    #[test]
    fn test_joint_lookup() {
        let frame = full_frame();
        let shoulder = frame.joint(BodyJoint::LeftShoulder).unwrap();
        assert_eq!(shoulder, Point::new(0.4, 0.6));
    }

    #[test]
    fn test_truncated_frame_reports_missing_joint() {
        // Indices 0..11 present, shoulders and below absent
        let frame = PoseFrame::new(vec![Landmark::at(0.0, 0.0); 11]);
        assert!(frame.joint(BodyJoint::Nose).is_ok());

        let err = frame.joint(BodyJoint::LeftShoulder).unwrap_err();
        assert_eq!(
            err,
            PoseError::LandmarkMissing {
                joint: BodyJoint::LeftShoulder
            }
        );
    }

    #[test]
    fn test_validate_counts() {
        assert!(full_frame().validate().is_ok());
        let short = PoseFrame::new(vec![Landmark::at(0.0, 0.0); 17]);
        assert!(matches!(
            short.validate(),
            Err(PoseError::InvalidLandmarkCount {
                expected: 33,
                actual: 17
            })
        ));
    }

    #[test]
    fn test_joint_indices_match_pose_model_contract() {
        assert_eq!(BodyJoint::Nose.index(), 0);
        assert_eq!(BodyJoint::LeftEar.index(), 7);
        assert_eq!(BodyJoint::LeftShoulder.index(), 11);
        assert_eq!(BodyJoint::RightWrist.index(), 16);
        assert_eq!(BodyJoint::RightHip.index(), 24);
        assert_eq!(BodyJoint::RightAnkle.index(), 28);
    }

    #[test]
    fn test_landmark_visibility_defaults_on_deserialize() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.1,"y":0.2,"z":0.0}"#).unwrap();
        assert_eq!(lm.visibility, 1.0);
    }

    #[test]
    fn test_session_id_display() {
        let id = SessionId::from("s1");
        assert_eq!(id.to_string(), "s1");
        assert_eq!(id.as_str(), "s1");
    }
}
