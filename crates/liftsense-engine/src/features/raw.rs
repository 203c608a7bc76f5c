//! Raw-distance feature extraction for the legacy offline model.

use super::{FeatureVector, FrameFeatureExtractor, JointCenters};
use liftsense_core::geometry::{self, FEATURE_EPSILON};
use liftsense_core::{PoseFrame, PoseResult};

/// Extractor producing the unnormalized layout of the legacy offline model.
///
/// Same 14 slots as the normalized variant, but slot 4 carries the raw
/// ear-to-shoulder distance, slot 5 the raw torso length, and the four
/// direction vectors are left in image units. Scale-sensitive by design;
/// feeding these features to the normalized model (or vice versa) is a
/// configuration error, which is why the variant is selected explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFeatureExtractor;

impl FrameFeatureExtractor for RawFeatureExtractor {
    fn extract(&self, frame: &PoseFrame) -> PoseResult<FeatureVector> {
        let c = JointCenters::resolve(frame)?;

        let spine_angle = geometry::angle_deg(c.ear, c.shoulder, c.hip, FEATURE_EPSILON);
        let hip_angle = geometry::angle_deg(c.shoulder, c.hip, c.knee, FEATURE_EPSILON);
        let knee_angle = geometry::angle_deg(c.hip, c.knee, c.ankle, FEATURE_EPSILON);
        let torso_angle =
            geometry::angle_deg(c.vertical_reference(), c.hip, c.shoulder, FEATURE_EPSILON);

        let head_shoulder_dist = geometry::distance(c.ear, c.shoulder);
        let shoulder_hip_dist = geometry::distance(c.shoulder, c.hip);

        Ok(FeatureVector([
            spine_angle,
            hip_angle,
            knee_angle,
            torso_angle,
            head_shoulder_dist,
            shoulder_hip_dist,
            c.shoulder.x - c.hip.x,
            c.shoulder.y - c.hip.y,
            c.hip.x - c.knee.x,
            c.hip.y - c.knee.y,
            c.ear.x - c.shoulder.x,
            c.ear.y - c.shoulder.y,
            c.wrist.x - c.ankle.x,
            c.wrist.y - c.ankle.y,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::standing_frame;
    use super::*;

    #[test]
    fn test_slot_five_carries_torso_length() {
        let features = RawFeatureExtractor.extract(&standing_frame()).unwrap();
        // Shoulder center (0.5, 0.25) to hip center (0.5, 0.55)
        assert!((features.0[5] - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_vectors_stay_in_image_units() {
        let features = RawFeatureExtractor.extract(&standing_frame()).unwrap();
        assert!(features.0[6].abs() < 1e-9);
        assert!((features.0[7] + 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_missing_landmark_fails() {
        let mut frame = standing_frame();
        frame.landmarks.truncate(8);
        assert!(RawFeatureExtractor.extract(&frame).is_err());
    }
}
