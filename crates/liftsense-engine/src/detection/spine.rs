//! Spinal-curvature risk monitor: a per-session hysteresis state machine.
//!
//! Curvature is measured as the angle between the upper spine (shoulder
//! center to nose) and lower spine (hip center to shoulder center): 0° is a
//! straight line from hip through shoulder to nose, larger is more forward
//! rounding. A single noisy pose frame must not fire a safety alert, so
//! escalation to `Warning`/`Danger` requires the violation to persist for
//! [`SpineMonitorConfig::confirm_frames`] consecutive frames. Above
//! [`SpineMonitorConfig::critical_deg`] the confirmation is bypassed:
//! waiting out a clearly dangerous curvature is itself unsafe.
//!
//! Risk only accumulates while the lifter is actually hinged into the lift;
//! the hip angle gates the whole machine, and standing upright resets it.

use crate::domain::{RiskTier, SpineRiskReport};
use crate::smoothing::{Ema, SPINE_ALPHA};
use chrono::Utc;
use liftsense_core::geometry::{self, LIVE_EPSILON};
use liftsense_core::{BodyJoint, Point, PoseFrame, PoseResult};
use tracing::debug;

/// Thresholds and hysteresis parameters for the spine monitor.
#[derive(Debug, Clone)]
pub struct SpineMonitorConfig {
    /// Curvature at or below this is a neutral spine, degrees
    pub safe_deg: f64,
    /// Curvature above this accumulates warning frames, degrees
    pub warning_deg: f64,
    /// Curvature above this accumulates danger frames, degrees
    pub danger_deg: f64,
    /// Curvature above this escalates immediately, degrees
    pub critical_deg: f64,
    /// Hip angle below which the lifter counts as lifting, degrees
    pub lifting_gate_deg: f64,
    /// Consecutive violating frames required to confirm a tier
    pub confirm_frames: u32,
    /// Smoothing weight for the curvature EMA
    pub smoothing_alpha: f64,
}

impl Default for SpineMonitorConfig {
    fn default() -> Self {
        Self {
            safe_deg: 10.0,
            warning_deg: 20.0,
            danger_deg: 30.0,
            critical_deg: 40.0,
            lifting_gate_deg: 160.0,
            confirm_frames: 10,
            smoothing_alpha: SPINE_ALPHA,
        }
    }
}

/// Per-session spinal risk state machine.
pub struct SpineRiskMonitor {
    config: SpineMonitorConfig,
    curvature: Ema,
    warning_frames: u32,
    danger_frames: u32,
}

impl SpineRiskMonitor {
    /// Creates a monitor with fresh state.
    #[must_use]
    pub fn new(config: SpineMonitorConfig) -> Self {
        let alpha = config.smoothing_alpha;
        Self {
            config,
            curvature: Ema::new(alpha),
            warning_frames: 0,
            danger_frames: 0,
        }
    }

    /// Creates a monitor with default thresholds.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(SpineMonitorConfig::default())
    }

    /// Evaluates one frame and returns the risk report.
    ///
    /// A frame missing a required joint fails before any smoothing or
    /// counter state is touched.
    pub fn observe(&mut self, frame: &PoseFrame) -> PoseResult<SpineRiskReport> {
        let nose = frame.joint(BodyJoint::Nose)?;
        let shoulder_center = geometry::midpoint(
            frame.joint(BodyJoint::LeftShoulder)?,
            frame.joint(BodyJoint::RightShoulder)?,
        );
        let hip_center = geometry::midpoint(
            frame.joint(BodyJoint::LeftHip)?,
            frame.joint(BodyJoint::RightHip)?,
        );
        let knee_center = geometry::midpoint(
            frame.joint(BodyJoint::LeftKnee)?,
            frame.joint(BodyJoint::RightKnee)?,
        );

        let raw = curvature_between(nose, shoulder_center, hip_center);
        let smoothed = self.curvature.update(Some(raw)).unwrap_or(raw);

        let hip_angle =
            geometry::angle_deg(shoulder_center, hip_center, knee_center, LIVE_EPSILON);
        let is_lifting = hip_angle < self.config.lifting_gate_deg;

        if is_lifting {
            self.accumulate(smoothed);
        } else {
            self.warning_frames = 0;
            self.danger_frames = 0;
        }

        let current_tier = self.band(smoothed);
        let (confirmed_tier, is_rounded) = if is_lifting {
            self.confirm(smoothed)
        } else {
            (RiskTier::Safe, false)
        };

        if confirmed_tier.is_alert() {
            debug!(
                smoothed,
                ?confirmed_tier,
                danger_frames = self.danger_frames,
                "spinal risk alert tier reached"
            );
        }

        let message = if is_lifting {
            confirmed_tier.description().to_owned()
        } else {
            "Standing ready, lift when set".to_owned()
        };

        Ok(SpineRiskReport {
            raw_curvature: round1(raw),
            smoothed_curvature: round1(smoothed),
            hip_angle: round1(hip_angle),
            is_lifting,
            current_tier,
            confirmed_tier,
            is_rounded,
            warning_frames: self.warning_frames,
            danger_frames: self.danger_frames,
            message,
            timestamp: Utc::now(),
        })
    }

    /// Advances the consecutive-violation counters for one lifting frame.
    fn accumulate(&mut self, smoothed: f64) {
        if smoothed > self.config.danger_deg {
            self.danger_frames += 1;
            self.warning_frames += 1;
        } else if smoothed > self.config.safe_deg {
            self.danger_frames = 0;
            self.warning_frames += 1;
        } else {
            self.danger_frames = 0;
            self.warning_frames = 0;
        }
    }

    /// Tier the smoothed curvature falls in, ignoring confirmation.
    fn band(&self, smoothed: f64) -> RiskTier {
        if smoothed > self.config.critical_deg {
            RiskTier::Critical
        } else if smoothed > self.config.danger_deg {
            RiskTier::Danger
        } else if smoothed > self.config.warning_deg {
            RiskTier::Warning
        } else if smoothed > self.config.safe_deg {
            RiskTier::Monitoring
        } else {
            RiskTier::Safe
        }
    }

    /// Confirmed tier decision, first match wins.
    fn confirm(&self, smoothed: f64) -> (RiskTier, bool) {
        let c = &self.config;
        if smoothed > c.critical_deg {
            // Hard override: no confirmation above the critical limit
            (RiskTier::Critical, true)
        } else if self.danger_frames >= c.confirm_frames && smoothed > c.danger_deg {
            (RiskTier::Danger, true)
        } else if self.warning_frames >= c.confirm_frames && smoothed > c.warning_deg {
            (RiskTier::Warning, false)
        } else if smoothed > c.safe_deg {
            (RiskTier::Monitoring, false)
        } else {
            (RiskTier::Safe, false)
        }
    }

    /// Clears smoothing and counter state.
    pub fn reset(&mut self) {
        self.curvature.reset();
        self.warning_frames = 0;
        self.danger_frames = 0;
    }

    /// Monitor configuration.
    #[must_use]
    pub fn config(&self) -> &SpineMonitorConfig {
        &self.config
    }
}

/// Angle in degrees between the upper spine (shoulder→nose) and lower spine
/// (hip→shoulder) vectors. Zero when either vector has no length.
fn curvature_between(nose: Point, shoulder: Point, hip: Point) -> f64 {
    let (ux, uy) = (nose.x - shoulder.x, nose.y - shoulder.y);
    let (vx, vy) = (shoulder.x - hip.x, shoulder.y - hip.y);

    let norm_u = (ux * ux + uy * uy).sqrt();
    let norm_v = (vx * vx + vy * vy).sqrt();
    if norm_u == 0.0 || norm_v == 0.0 {
        return 0.0;
    }

    let cosine = (ux * vx + uy * vy) / (norm_u * norm_v);
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::frame_with;

    /// Builds a hinged (lifting) frame whose raw curvature is `curve_deg`.
    ///
    /// Shoulder center sits directly above the hip center, the knee center
    /// is horizontal from the hip (hip angle 90°), and the nose is rotated
    /// off the spine axis by the requested curvature.
    fn lifting_frame(curve_deg: f64) -> PoseFrame {
        let theta = curve_deg.to_radians();
        let nose = Point::new(0.5 + 0.1 * theta.sin(), 0.3 - 0.1 * theta.cos());
        frame_with(&[
            (BodyJoint::Nose, nose),
            (BodyJoint::LeftShoulder, Point::new(0.45, 0.3)),
            (BodyJoint::RightShoulder, Point::new(0.55, 0.3)),
            (BodyJoint::LeftHip, Point::new(0.45, 0.7)),
            (BodyJoint::RightHip, Point::new(0.55, 0.7)),
            (BodyJoint::LeftKnee, Point::new(0.7, 0.7)),
            (BodyJoint::RightKnee, Point::new(0.7, 0.7)),
        ])
    }

    /// Upright frame: knees below hips, hip angle ~180°, gate closed.
    fn standing_frame(curve_deg: f64) -> PoseFrame {
        let theta = curve_deg.to_radians();
        let nose = Point::new(0.5 + 0.1 * theta.sin(), 0.3 - 0.1 * theta.cos());
        frame_with(&[
            (BodyJoint::Nose, nose),
            (BodyJoint::LeftShoulder, Point::new(0.45, 0.3)),
            (BodyJoint::RightShoulder, Point::new(0.55, 0.3)),
            (BodyJoint::LeftHip, Point::new(0.45, 0.7)),
            (BodyJoint::RightHip, Point::new(0.55, 0.7)),
            (BodyJoint::LeftKnee, Point::new(0.5, 0.95)),
            (BodyJoint::RightKnee, Point::new(0.5, 0.95)),
        ])
    }

    #[test]
    fn test_frame_builder_hits_requested_curvature() {
        let mut monitor = SpineRiskMonitor::with_defaults();
        let report = monitor.observe(&lifting_frame(35.0)).unwrap();
        assert!((report.raw_curvature - 35.0).abs() < 0.2);
        assert!(report.is_lifting);
    }

    #[test]
    fn test_gate_closed_holds_counters_at_zero() {
        let mut monitor = SpineRiskMonitor::with_defaults();
        for _ in 0..20 {
            let report = monitor.observe(&standing_frame(35.0)).unwrap();
            assert!(!report.is_lifting);
            assert_eq!(report.confirmed_tier, RiskTier::Safe);
            assert_eq!(report.warning_frames, 0);
            assert_eq!(report.danger_frames, 0);
            assert!(!report.is_rounded);
        }
    }

    #[test]
    fn test_sustained_danger_confirms_on_tenth_frame() {
        let mut monitor = SpineRiskMonitor::with_defaults();

        // Constant 35° input: the EMA equals 35 from the first frame
        for frame_no in 1..=9 {
            let report = monitor.observe(&lifting_frame(35.0)).unwrap();
            assert_eq!(
                report.confirmed_tier,
                RiskTier::Monitoring,
                "frame {frame_no} must not be confirmed yet"
            );
            assert!(!report.is_rounded);
            assert_eq!(report.danger_frames, frame_no);
        }

        let tenth = monitor.observe(&lifting_frame(35.0)).unwrap();
        assert_eq!(tenth.confirmed_tier, RiskTier::Danger);
        assert!(tenth.is_rounded);
        assert_eq!(tenth.danger_frames, 10);
        assert_eq!(tenth.current_tier, RiskTier::Danger);
    }

    #[test]
    fn test_critical_overrides_confirmation() {
        let mut monitor = SpineRiskMonitor::with_defaults();
        let report = monitor.observe(&lifting_frame(50.0)).unwrap();
        assert_eq!(report.confirmed_tier, RiskTier::Critical);
        assert!(report.is_rounded);
    }

    #[test]
    fn test_warning_band_confirms_without_rounding_flag() {
        let mut monitor = SpineRiskMonitor::with_defaults();
        for _ in 0..10 {
            monitor.observe(&lifting_frame(25.0)).unwrap();
        }
        let report = monitor.observe(&lifting_frame(25.0)).unwrap();
        assert_eq!(report.confirmed_tier, RiskTier::Warning);
        assert!(!report.is_rounded);
        assert_eq!(report.danger_frames, 0);
    }

    #[test]
    fn test_safe_band_resets_both_counters() {
        let mut monitor = SpineRiskMonitor::with_defaults();
        for _ in 0..5 {
            monitor.observe(&lifting_frame(35.0)).unwrap();
        }
        // Curvature drops; EMA needs a few frames to fall under 10°
        let mut last = None;
        for _ in 0..20 {
            last = Some(monitor.observe(&lifting_frame(0.0)).unwrap());
        }
        let report = last.unwrap();
        assert_eq!(report.confirmed_tier, RiskTier::Safe);
        assert_eq!(report.warning_frames, 0);
        assert_eq!(report.danger_frames, 0);
    }

    #[test]
    fn test_standing_between_lifts_resets_escalation() {
        let mut monitor = SpineRiskMonitor::with_defaults();
        for _ in 0..9 {
            monitor.observe(&lifting_frame(35.0)).unwrap();
        }
        // One upright frame wipes the accumulated streak
        monitor.observe(&standing_frame(35.0)).unwrap();

        let next = monitor.observe(&lifting_frame(35.0)).unwrap();
        assert_eq!(next.danger_frames, 1);
        assert_ne!(next.confirmed_tier, RiskTier::Danger);
    }

    #[test]
    fn test_degenerate_spine_reads_zero_curvature() {
        // Nose coincides with the shoulder center: upper spine has no length
        let frame = frame_with(&[
            (BodyJoint::Nose, Point::new(0.5, 0.3)),
            (BodyJoint::LeftShoulder, Point::new(0.45, 0.3)),
            (BodyJoint::RightShoulder, Point::new(0.55, 0.3)),
            (BodyJoint::LeftHip, Point::new(0.45, 0.7)),
            (BodyJoint::RightHip, Point::new(0.55, 0.7)),
            (BodyJoint::LeftKnee, Point::new(0.7, 0.7)),
            (BodyJoint::RightKnee, Point::new(0.7, 0.7)),
        ]);
        let mut monitor = SpineRiskMonitor::with_defaults();
        let report = monitor.observe(&frame).unwrap();
        assert_eq!(report.raw_curvature, 0.0);
    }

    #[test]
    fn test_missing_joint_leaves_state_untouched() {
        let mut monitor = SpineRiskMonitor::with_defaults();
        for _ in 0..5 {
            monitor.observe(&lifting_frame(35.0)).unwrap();
        }

        let mut short = lifting_frame(35.0);
        short.landmarks.truncate(10);
        assert!(monitor.observe(&short).is_err());

        let next = monitor.observe(&lifting_frame(35.0)).unwrap();
        assert_eq!(next.danger_frames, 6);
    }

    #[test]
    fn test_report_angles_are_display_rounded() {
        let mut monitor = SpineRiskMonitor::with_defaults();
        let report = monitor.observe(&lifting_frame(33.33)).unwrap();
        let rescaled = report.smoothed_curvature * 10.0;
        assert!((rescaled - rescaled.round()).abs() < 1e-9);
    }
}
