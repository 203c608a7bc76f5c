//! Domain value objects for deadlift analysis.
//!
//! - **Risk**: the spinal-curvature safety tiers and the per-frame risk
//!   report emitted by the monitor.
//! - **Feedback**: the live coaching message derived from smoothed joint
//!   angles.

pub mod feedback;
pub mod risk;

pub use feedback::{Feedback, FeedbackLevel};
pub use risk::{RiskTier, SpineRiskReport};
