//! Spinal-curvature risk tiers and the per-frame risk report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Safety tier for spinal curvature during a lift.
///
/// Tiers escalate with sustained curvature violation; only `Critical` and a
/// confirmed `Danger` warrant interrupting the lifter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Curvature within the safe band; nothing to report.
    Safe,
    /// Curvature slightly elevated; informational only.
    Monitoring,
    /// Sustained moderate curvature; coach attention suggested.
    Warning,
    /// Sustained severe curvature; stop signal justified.
    Danger,
    /// Curvature beyond the hard limit; immediate stop, no confirmation.
    Critical,
}

impl RiskTier {
    /// Priority level (1 = most urgent).
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            RiskTier::Critical => 1,
            RiskTier::Danger => 2,
            RiskTier::Warning => 3,
            RiskTier::Monitoring => 4,
            RiskTier::Safe => 5,
        }
    }

    /// Human-readable description of the tier.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            RiskTier::Safe => "Spine neutral",
            RiskTier::Monitoring => "Slight spinal flexion, keep chest up",
            RiskTier::Warning => "Back is rounding, brace your core",
            RiskTier::Danger => "Sustained back rounding, lower the weight",
            RiskTier::Critical => "Severe back rounding, stop the lift now",
        }
    }

    /// Whether this tier should interrupt the lifter.
    #[must_use]
    pub const fn is_alert(&self) -> bool {
        matches!(self, RiskTier::Danger | RiskTier::Critical)
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskTier::Safe => "safe",
            RiskTier::Monitoring => "monitoring",
            RiskTier::Warning => "warning",
            RiskTier::Danger => "danger",
            RiskTier::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Per-frame output of the spinal risk monitor.
///
/// Angle and counter fields are rounded to one decimal for display; the
/// monitor itself keeps full precision internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SpineRiskReport {
    /// Curvature computed from this frame alone, degrees
    pub raw_curvature: f64,
    /// Smoothed curvature the tier decision is based on, degrees
    pub smoothed_curvature: f64,
    /// Hip hinge angle used by the lifting gate, degrees
    pub hip_angle: f64,
    /// Whether the lifting gate is open this frame
    pub is_lifting: bool,
    /// Tier the smoothed curvature falls in this frame, before confirmation
    pub current_tier: RiskTier,
    /// Tier after consecutive-frame confirmation and the critical override
    pub confirmed_tier: RiskTier,
    /// Whether the confirmed tier warrants a hard stop signal
    pub is_rounded: bool,
    /// Consecutive frames above the warning threshold
    pub warning_frames: u32,
    /// Consecutive frames above the danger threshold
    pub danger_frames: u32,
    /// Human-readable status message
    pub message: String,
    /// When the frame was evaluated
    pub timestamp: DateTime<Utc>,
}
