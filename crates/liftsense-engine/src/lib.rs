//! # LiftSense Engine
//!
//! Stateful per-session analysis engine for deadlift technique.
//!
//! The engine ingests one 2-D landmark frame at a time per user session and
//! produces three independent judgments:
//!
//! - **Live feedback**: smoothed knee/hip/back angles, an annotated
//!   keypoint set for overlay rendering, and a coaching message.
//! - **Fault classification**: a 14-dimension feature vector per frame,
//!   aggregated over a 30-frame sliding window into the 56-dimension
//!   statistic a pretrained multi-label classifier consumes.
//! - **Spinal risk**: a hysteresis state machine that escalates through
//!   safety tiers only after sustained curvature violation, with an
//!   immediate override above the critical limit.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    AnalysisPipeline                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────────┐  ┌─────────────────┐  ┌───────────────┐  │
//! │  │ Live Form  │  │ Feature Window  │  │  Spine Risk   │  │
//! │  │ Analyzer   │  │   Aggregator    │  │   Monitor     │  │
//! │  └─────┬──────┘  └────────┬────────┘  └───────┬───────┘  │
//! │        │                  │                   │          │
//! │   process-wide      per-session          per-session     │
//! │   EMA (α = 0.4)    ring buffer (30)     EMA (α = 0.3)    │
//! │                           │                              │
//! │                  ┌────────▼────────┐                     │
//! │                  │ FaultClassifier │                     │
//! │                  └─────────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The three branches run on the same frame without blocking each other.
//! Per-frame errors are local: a frame missing a landmark is dropped
//! without corrupting the session's window or risk counters, and a missing
//! classifier degrades only the label channel.
//!
//! ## Example
//!
//! ```rust
//! use liftsense_core::{Landmark, PoseFrame, SessionId};
//! use liftsense_engine::{AnalysisPipeline, PoseObservation};
//!
//! let pipeline = AnalysisPipeline::with_defaults();
//! let frame = PoseFrame::new(vec![Landmark::at(0.5, 0.5); 33]);
//!
//! let live = pipeline.live_feedback(&PoseObservation::Frame(frame.clone()));
//! assert!(live.success);
//!
//! let predict = pipeline.predict(&SessionId::from("athlete-1"), &frame);
//! assert!(!predict.ml_ready); // window still filling
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod detection;
pub mod domain;
pub mod error;
pub mod features;
pub mod ml;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod smoothing;
pub mod window;

// Re-export main types
pub use detection::{
    live::{AnnotatedKeypoint, LiveAngles, LiveFormAnalysis, LiveFormAnalyzer},
    spine::{SpineMonitorConfig, SpineRiskMonitor},
};
pub use domain::{Feedback, FeedbackLevel, RiskTier, SpineRiskReport};
pub use error::{EngineError, EngineResult};
pub use features::{
    ExtractorKind, FeatureVector, FrameFeatureExtractor, NormalizedFeatureExtractor,
    RawFeatureExtractor, FEATURE_DIM,
};
pub use ml::{FaultClassifier, MlError, MlResult, RuleBasedFaultClassifier, UnavailableClassifier};
pub use pipeline::{AnalysisPipeline, PipelineConfig, PoseObservation};
pub use report::{ErrorCode, LivePoseResponse, PredictResponse};
pub use session::{RegistryConfig, SessionRegistry, SessionState};
pub use smoothing::{Ema, EmaFilter, LIVE_ALPHA, SPINE_ALPHA};
pub use window::{AggregateVector, SessionWindow, AGGREGATE_DIM, WINDOW_CAPACITY};
