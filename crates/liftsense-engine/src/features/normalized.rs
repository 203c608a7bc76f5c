//! Torso-length-normalized feature extraction.

use super::{FeatureVector, FrameFeatureExtractor, JointCenters};
use liftsense_core::geometry::{self, FEATURE_EPSILON};
use liftsense_core::{PoseFrame, PoseResult};

/// Extractor producing the torso-normalized layout the served classifier
/// was fit against.
///
/// Distances and direction vectors are divided by torso length (shoulder
/// center to hip center) so the features are invariant to how large the
/// lifter appears in the image. Slot 5 is held at 0.0 for vector-length
/// compatibility with the legacy raw layout, which carries the torso
/// length itself there.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedFeatureExtractor;

impl FrameFeatureExtractor for NormalizedFeatureExtractor {
    fn extract(&self, frame: &PoseFrame) -> PoseResult<FeatureVector> {
        let c = JointCenters::resolve(frame)?;

        // Degenerate frame: shoulder and hip centers coincide. Floor the
        // normalization unit so ratios stay finite.
        let torso_len = match geometry::distance(c.shoulder, c.hip) {
            len if len == 0.0 => 1.0,
            len => len,
        };

        let spine_angle = geometry::angle_deg(c.ear, c.shoulder, c.hip, FEATURE_EPSILON);
        let hip_angle = geometry::angle_deg(c.shoulder, c.hip, c.knee, FEATURE_EPSILON);
        let knee_angle = geometry::angle_deg(c.hip, c.knee, c.ankle, FEATURE_EPSILON);
        let torso_angle =
            geometry::angle_deg(c.vertical_reference(), c.hip, c.shoulder, FEATURE_EPSILON);

        let head_shoulder_ratio = geometry::distance(c.ear, c.shoulder) / torso_len;

        Ok(FeatureVector([
            spine_angle,
            hip_angle,
            knee_angle,
            torso_angle,
            head_shoulder_ratio,
            0.0,
            (c.shoulder.x - c.hip.x) / torso_len,
            (c.shoulder.y - c.hip.y) / torso_len,
            (c.hip.x - c.knee.x) / torso_len,
            (c.hip.y - c.knee.y) / torso_len,
            (c.ear.x - c.shoulder.x) / torso_len,
            (c.ear.y - c.shoulder.y) / torso_len,
            (c.wrist.x - c.ankle.x) / torso_len,
            (c.wrist.y - c.ankle.y) / torso_len,
        ]))
    }
}
