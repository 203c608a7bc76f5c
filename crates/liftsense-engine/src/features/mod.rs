//! Per-frame feature extraction for the fault classifier.
//!
//! Two numerically incompatible variants exist behind one trait: the
//! torso-normalized layout the pretrained classifier was fit against
//! ([`NormalizedFeatureExtractor`]) and the raw-distance layout of the
//! legacy offline model ([`RawFeatureExtractor`]). A deployment picks one
//! explicitly through [`ExtractorKind`]; they are never reconciled, because
//! a model trained on one layout produces garbage on the other.

mod normalized;
mod raw;

pub use normalized::NormalizedFeatureExtractor;
pub use raw::RawFeatureExtractor;

use liftsense_core::{geometry, BodyJoint, Point, PoseFrame, PoseResult};
use serde::{Deserialize, Serialize};

/// Number of dimensions in a per-frame feature vector.
pub const FEATURE_DIM: usize = 14;

/// One per-frame feature vector in the fixed classifier layout.
///
/// Dimension order is load-bearing: it must match the order the classifier
/// was fit with. Slots 0–3 are the spine/hip/knee/torso-lean angles, slot 4
/// the head-to-shoulder measure, slot 5 the reserved legacy slot, and slots
/// 6–13 the four direction vectors (shoulder→hip, hip→knee, ear→shoulder,
/// wrist→ankle), two components each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_DIM]);

impl FeatureVector {
    /// The features as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Spine angle (ear–shoulder-center–hip-center), degrees.
    #[must_use]
    pub const fn spine_angle(&self) -> f64 {
        self.0[0]
    }

    /// Hip angle (shoulder-center–hip-center–knee-center), degrees.
    #[must_use]
    pub const fn hip_angle(&self) -> f64 {
        self.0[1]
    }

    /// Knee angle (hip-center–knee-center–ankle-center), degrees.
    #[must_use]
    pub const fn knee_angle(&self) -> f64 {
        self.0[2]
    }

    /// Torso-lean angle against the vertical reference, degrees.
    #[must_use]
    pub const fn torso_angle(&self) -> f64 {
        self.0[3]
    }
}

/// Bilateral joint centers shared by both extractor variants.
///
/// Resolving all required joints up front makes the landmark contract
/// explicit: a frame missing any of the eleven required joints fails here,
/// before any state is touched.
#[derive(Debug, Clone, Copy)]
pub struct JointCenters {
    /// Left ear position (the lateral head reference)
    pub ear: Point,
    /// Mean of left/right shoulder
    pub shoulder: Point,
    /// Mean of left/right hip
    pub hip: Point,
    /// Mean of left/right knee
    pub knee: Point,
    /// Mean of left/right ankle
    pub ankle: Point,
    /// Mean of left/right wrist
    pub wrist: Point,
}

impl JointCenters {
    /// Resolves the required joints of a frame into bilateral centers.
    pub fn resolve(frame: &PoseFrame) -> PoseResult<Self> {
        let ear = frame.joint(BodyJoint::LeftEar)?;
        let shoulder = geometry::midpoint(
            frame.joint(BodyJoint::LeftShoulder)?,
            frame.joint(BodyJoint::RightShoulder)?,
        );
        let hip = geometry::midpoint(
            frame.joint(BodyJoint::LeftHip)?,
            frame.joint(BodyJoint::RightHip)?,
        );
        let knee = geometry::midpoint(
            frame.joint(BodyJoint::LeftKnee)?,
            frame.joint(BodyJoint::RightKnee)?,
        );
        let ankle = geometry::midpoint(
            frame.joint(BodyJoint::LeftAnkle)?,
            frame.joint(BodyJoint::RightAnkle)?,
        );
        let wrist = geometry::midpoint(
            frame.joint(BodyJoint::LeftWrist)?,
            frame.joint(BodyJoint::RightWrist)?,
        );

        Ok(Self {
            ear,
            shoulder,
            hip,
            knee,
            ankle,
            wrist,
        })
    }

    /// Vertical reference point half a frame-height below the hip center,
    /// used as the third ray of the torso-lean angle.
    #[must_use]
    pub fn vertical_reference(&self) -> Point {
        Point::new(self.hip.x, self.hip.y - 0.5)
    }
}

/// Extractor of the fixed 14-dimension feature layout from one pose frame.
///
/// Implementations are deterministic pure functions of the frame: identical
/// input yields identical output, and the only error path is a missing
/// required landmark.
pub trait FrameFeatureExtractor: Send + Sync {
    /// Extracts the feature vector for one frame.
    fn extract(&self, frame: &PoseFrame) -> PoseResult<FeatureVector>;
}

/// Which feature layout a deployment feeds its classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Torso-length-normalized layout (the served classifier)
    #[default]
    Normalized,
    /// Raw-distance layout (the legacy offline model)
    Raw,
}

impl ExtractorKind {
    /// Builds the extractor for this layout.
    #[must_use]
    pub fn build(&self) -> Box<dyn FrameFeatureExtractor> {
        match self {
            ExtractorKind::Normalized => Box::new(NormalizedFeatureExtractor),
            ExtractorKind::Raw => Box::new(RawFeatureExtractor),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use liftsense_core::{BodyJoint, Landmark, Point, PoseFrame, POSE_LANDMARK_COUNT};

    /// Builds a full 33-landmark frame with the given joints placed and all
    /// other landmarks parked at the frame center.
    pub fn frame_with(joints: &[(BodyJoint, Point)]) -> PoseFrame {
        let mut landmarks = vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT];
        for (joint, point) in joints {
            landmarks[joint.index()] = Landmark::at(point.x, point.y);
        }
        PoseFrame::new(landmarks)
    }

    /// An upright standing posture with distinct joint positions, placing
    /// left and right sides symmetrically about x = 0.5.
    pub fn standing_frame() -> PoseFrame {
        frame_with(&[
            (BodyJoint::Nose, Point::new(0.5, 0.10)),
            (BodyJoint::LeftEar, Point::new(0.48, 0.12)),
            (BodyJoint::RightEar, Point::new(0.52, 0.12)),
            (BodyJoint::LeftShoulder, Point::new(0.45, 0.25)),
            (BodyJoint::RightShoulder, Point::new(0.55, 0.25)),
            (BodyJoint::LeftWrist, Point::new(0.44, 0.55)),
            (BodyJoint::RightWrist, Point::new(0.56, 0.55)),
            (BodyJoint::LeftHip, Point::new(0.46, 0.55)),
            (BodyJoint::RightHip, Point::new(0.54, 0.55)),
            (BodyJoint::LeftKnee, Point::new(0.46, 0.75)),
            (BodyJoint::RightKnee, Point::new(0.54, 0.75)),
            (BodyJoint::LeftAnkle, Point::new(0.46, 0.95)),
            (BodyJoint::RightAnkle, Point::new(0.54, 0.95)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::standing_frame;
    use super::*;

    #[test]
    fn test_centers_resolve_to_bilateral_means() {
        let centers = JointCenters::resolve(&standing_frame()).unwrap();
        assert_eq!(centers.shoulder, Point::new(0.5, 0.25));
        assert_eq!(centers.hip, Point::new(0.5, 0.55));
        assert_eq!(centers.knee, Point::new(0.5, 0.75));
    }

    #[test]
    fn test_resolve_fails_on_truncated_frame() {
        let frame = PoseFrame::new(vec![liftsense_core::Landmark::at(0.5, 0.5); 15]);
        assert!(JointCenters::resolve(&frame).is_err());
    }

    #[test]
    fn test_variants_disagree_on_the_same_frame() {
        let frame = standing_frame();
        let normalized = ExtractorKind::Normalized.build().extract(&frame).unwrap();
        let raw = ExtractorKind::Raw.build().extract(&frame).unwrap();

        // Angle slots agree; measure and vector slots do not
        assert_eq!(normalized.spine_angle(), raw.spine_angle());
        assert_ne!(normalized.0[5], raw.0[5]);
    }
}
