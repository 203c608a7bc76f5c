//! Live feedback analysis: smoothed joint angles and annotated keypoints.
//!
//! This path serves a single camera overlay, so its smoothing state is one
//! process-wide filter rather than session-scoped state. Serving two
//! concurrent live streams from one analyzer would interleave their
//! smoothing histories; that constraint is accepted, not accidental.

use crate::domain::Feedback;
use crate::smoothing::{EmaFilter, LIVE_ALPHA};
use liftsense_core::geometry::{self, LIVE_EPSILON};
use liftsense_core::{BodyJoint, Point, PoseFrame, PoseResult};
use serde::{Deserialize, Serialize};

/// Interpolation ratio from shoulder center toward hip center for the
/// synthesized spine control point.
pub const SPINE_OFFSET_RATIO: f64 = 0.4;

/// Vertical bias applied to the spine control point per unit of horizontal
/// shoulder/hip spread.
pub const SPINE_LATERAL_BIAS: f64 = 0.15;

/// Keypoint id assigned to the synthesized shoulder center.
pub const KEYPOINT_SHOULDER_CENTER: u32 = 101;
/// Keypoint id assigned to the synthesized spine control point.
pub const KEYPOINT_SPINE_CENTER: u32 = 102;
/// Keypoint id assigned to the synthesized hip center.
pub const KEYPOINT_HIP_CENTER: u32 = 103;

/// Signals tracked by the live smoothing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LiveSignal {
    Knee,
    Hip,
    Back,
}

/// One annotated 2-D point in the live overlay output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedKeypoint {
    /// Landmark index, or a synthesized id (101-103) for control points
    pub id: u32,
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
    /// Detection confidence; synthesized points carry 1.0
    pub score: f64,
}

/// Smoothed joint angles for the overlay, rounded to whole degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveAngles {
    /// Knee angle (hip-knee-ankle, averaged over both sides)
    pub knee: i32,
    /// Hip angle (shoulder-hip-knee, averaged over both sides)
    pub hip: i32,
    /// Back angle through the synthesized spine control point
    pub back: i32,
}

/// Full result of analyzing one live frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveFormAnalysis {
    /// Smoothed angles
    pub angles: LiveAngles,
    /// 33 input landmarks plus the three synthesized control points
    pub keypoints: Vec<AnnotatedKeypoint>,
    /// Coaching message for the smoothed angles
    pub feedback: Feedback,
}

/// Analyzer for the live feedback path.
///
/// Owns the process-wide knee/hip/back smoothing filter. A "no person
/// detected" frame must simply not be passed in; skipping a frame leaves
/// the smoothing state untouched.
#[derive(Debug)]
pub struct LiveFormAnalyzer {
    ema: EmaFilter<LiveSignal>,
}

impl Default for LiveFormAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveFormAnalyzer {
    /// Creates an analyzer with fresh smoothing state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ema: EmaFilter::new(LIVE_ALPHA),
        }
    }

    /// Analyzes one frame: joint angles, smoothing, feedback, keypoints.
    pub fn analyze(&mut self, frame: &PoseFrame) -> PoseResult<LiveFormAnalysis> {
        let l_shoulder = frame.joint(BodyJoint::LeftShoulder)?;
        let r_shoulder = frame.joint(BodyJoint::RightShoulder)?;
        let l_hip = frame.joint(BodyJoint::LeftHip)?;
        let r_hip = frame.joint(BodyJoint::RightHip)?;
        let l_knee = frame.joint(BodyJoint::LeftKnee)?;
        let r_knee = frame.joint(BodyJoint::RightKnee)?;
        let l_ankle = frame.joint(BodyJoint::LeftAnkle)?;
        let r_ankle = frame.joint(BodyJoint::RightAnkle)?;

        // Bilateral averages of the per-side joint angles
        let knee = (geometry::angle_deg(l_hip, l_knee, l_ankle, LIVE_EPSILON)
            + geometry::angle_deg(r_hip, r_knee, r_ankle, LIVE_EPSILON))
            / 2.0;
        let hip = (geometry::angle_deg(l_shoulder, l_hip, l_knee, LIVE_EPSILON)
            + geometry::angle_deg(r_shoulder, r_hip, r_knee, LIVE_EPSILON))
            / 2.0;

        // Back angle bends through the synthesized mid-spine control point
        let shoulder_center = geometry::midpoint(l_shoulder, r_shoulder);
        let hip_center = geometry::midpoint(l_hip, r_hip);
        let spine_center = geometry::offset_point(
            shoulder_center,
            hip_center,
            SPINE_OFFSET_RATIO,
            SPINE_LATERAL_BIAS,
        );
        let back = geometry::angle_deg(shoulder_center, spine_center, hip_center, LIVE_EPSILON);

        // Round once; the rule table and the displayed angles must read the
        // same value or a boundary frame can warn about an angle it displays
        // as passing. The filter itself keeps full precision.
        let knee_s = self.smooth(LiveSignal::Knee, knee).round() as i32;
        let hip_s = self.smooth(LiveSignal::Hip, hip).round() as i32;
        let back_s = self.smooth(LiveSignal::Back, back).round() as i32;

        let feedback = Feedback::evaluate(f64::from(knee_s), f64::from(hip_s), f64::from(back_s));

        let mut keypoints: Vec<AnnotatedKeypoint> = frame
            .landmarks
            .iter()
            .enumerate()
            .map(|(id, lm)| AnnotatedKeypoint {
                id: id as u32,
                x: lm.x,
                y: lm.y,
                score: lm.visibility,
            })
            .collect();
        keypoints.push(synthesized(KEYPOINT_SHOULDER_CENTER, shoulder_center));
        keypoints.push(synthesized(KEYPOINT_SPINE_CENTER, spine_center));
        keypoints.push(synthesized(KEYPOINT_HIP_CENTER, hip_center));

        Ok(LiveFormAnalysis {
            angles: LiveAngles {
                knee: knee_s,
                hip: hip_s,
                back: back_s,
            },
            keypoints,
            feedback,
        })
    }

    fn smooth(&mut self, signal: LiveSignal, value: f64) -> f64 {
        // The filter returns the fed value on first update, so this is total
        self.ema.update(signal, Some(value)).unwrap_or(value)
    }
}

fn synthesized(id: u32, point: Point) -> AnnotatedKeypoint {
    AnnotatedKeypoint {
        id,
        x: point.x,
        y: point.y,
        score: 1.0,
    }
}
