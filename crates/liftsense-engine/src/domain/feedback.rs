//! Live coaching feedback derived from smoothed joint angles.
//!
//! The rule table matches the thresholds the live overlay was tuned
//! against: back angle through the synthesized spine point, hip vs. knee
//! extension timing, and knee depth.

use serde::{Deserialize, Serialize};

/// Back angle below which the back is considered rounding, degrees.
pub const BACK_ROUNDING_DEG: f64 = 140.0;

/// Lead the hip angle may have over the knee angle before the hips are
/// considered to be rising early, degrees.
pub const HIP_LEAD_DEG: f64 = 15.0;

/// Knee angle below which the knees are considered over-bent, degrees.
pub const KNEE_MIN_DEG: f64 = 80.0;

/// Severity of a live feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    /// Form within tolerance
    Ok,
    /// Form fault worth correcting
    Warn,
}

/// One live feedback message/level pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Coaching message
    pub text: String,
    /// Severity
    pub level: FeedbackLevel,
}

impl Feedback {
    fn warn(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            level: FeedbackLevel::Warn,
        }
    }

    fn ok(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            level: FeedbackLevel::Ok,
        }
    }

    /// Evaluates the rule table against smoothed knee/hip/back angles.
    ///
    /// Rules are checked in severity order; the first match wins.
    #[must_use]
    pub fn evaluate(knee: f64, hip: f64, back: f64) -> Self {
        if back < BACK_ROUNDING_DEG {
            return Self::warn("Back is rounding, straighten your spine");
        }
        if hip + HIP_LEAD_DEG < knee {
            return Self::warn("Hips rising too early, lift your chest with your hips");
        }
        if knee < KNEE_MIN_DEG {
            return Self::warn("Knees over-bent, set your hips lower");
        }
        Self::ok("Good form, keep a steady tempo")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_form() {
        let fb = Feedback::evaluate(170.0, 165.0, 175.0);
        assert_eq!(fb.level, FeedbackLevel::Ok);
    }

    #[test]
    fn test_back_rounding_wins_over_other_faults() {
        // Back below threshold and knees over-bent: back rule fires first
        let fb = Feedback::evaluate(70.0, 160.0, 120.0);
        assert_eq!(fb.level, FeedbackLevel::Warn);
        assert!(fb.text.contains("Back"));
    }

    #[test]
    fn test_early_hip_rise() {
        let fb = Feedback::evaluate(140.0, 120.0, 160.0);
        assert_eq!(fb.level, FeedbackLevel::Warn);
        assert!(fb.text.contains("Hips"));
    }

    #[test]
    fn test_knee_over_bend() {
        let fb = Feedback::evaluate(70.0, 75.0, 160.0);
        assert_eq!(fb.level, FeedbackLevel::Warn);
        assert!(fb.text.contains("Knees"));
    }

    #[test]
    fn test_hip_lead_boundary_is_exclusive() {
        // hip + 15 == knee is not an early rise
        let fb = Feedback::evaluate(165.0, 150.0, 170.0);
        assert_eq!(fb.level, FeedbackLevel::Ok);
    }
}
