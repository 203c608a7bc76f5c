//! Per-frame detectors.
//!
//! - [`LiveFormAnalyzer`]: smoothed joint angles, annotated keypoints, and
//!   a coaching message for the live overlay.
//! - [`SpineRiskMonitor`]: the per-session hysteresis state machine that
//!   escalates spinal-curvature risk tiers only after sustained violation.

pub mod live;
pub mod spine;

pub use live::{AnnotatedKeypoint, LiveAngles, LiveFormAnalysis, LiveFormAnalyzer};
pub use spine::{SpineMonitorConfig, SpineRiskMonitor};
