//! The per-session analysis pipeline.
//!
//! Orchestrates the three independent branches every frame feeds: the live
//! feedback path (smoothed angles + coaching message), the windowed fault
//! classification path, and the spinal risk monitor. None of the branches
//! blocks another, and a failure in one frame never corrupts the session
//! state accumulated by earlier frames.

use crate::detection::live::LiveFormAnalyzer;
use crate::detection::spine::SpineMonitorConfig;
use crate::features::{ExtractorKind, FrameFeatureExtractor};
use crate::ml::{FaultClassifier, RuleBasedFaultClassifier};
use crate::report::{ErrorCode, LivePoseResponse, PredictResponse};
use crate::session::{RegistryConfig, SessionRegistry};
use liftsense_core::{PoseFrame, SessionId};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// What the pose source produced for one frame.
#[derive(Debug, Clone)]
pub enum PoseObservation {
    /// A person was detected and a landmark frame is available
    Frame(PoseFrame),
    /// No person in view; the frame is skipped without touching state
    NoPerson,
}

/// Configuration for the full analysis pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Which feature layout feeds the classifier
    pub extractor: ExtractorKind,
    /// Session retention policy
    pub registry: RegistryConfig,
    /// Spinal risk thresholds
    pub spine: SpineMonitorConfig,
}

/// Stateful analysis pipeline serving every session of one process.
pub struct AnalysisPipeline {
    extractor: Box<dyn FrameFeatureExtractor>,
    classifier: Box<dyn FaultClassifier>,
    registry: SessionRegistry,
    // Process-wide by design: the live path serves one camera stream
    live: Mutex<LiveFormAnalyzer>,
}

impl AnalysisPipeline {
    /// Creates a pipeline with the given configuration and classifier.
    #[must_use]
    pub fn new(config: PipelineConfig, classifier: Box<dyn FaultClassifier>) -> Self {
        Self {
            extractor: config.extractor.build(),
            classifier,
            registry: SessionRegistry::new(config.registry, config.spine),
            live: Mutex::new(LiveFormAnalyzer::new()),
        }
    }

    /// Creates a pipeline with default configuration and the rule-based
    /// fallback classifier.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            PipelineConfig::default(),
            Box::new(RuleBasedFaultClassifier::with_defaults()),
        )
    }

    /// Live feedback branch: smoothed angles, keypoints, coaching message.
    ///
    /// Frames are validated against the full 33-landmark contract at this
    /// boundary. A no-person observation or an invalid frame is a skip; the
    /// process-wide smoothing state is only advanced by analyzable frames.
    pub fn live_feedback(&self, observation: &PoseObservation) -> LivePoseResponse {
        let frame = match observation {
            PoseObservation::NoPerson => return LivePoseResponse::no_person(),
            PoseObservation::Frame(frame) => frame,
        };

        if let Err(err) = frame.validate() {
            debug!(%err, "live frame skipped");
            return LivePoseResponse::skipped(err.to_string());
        }

        match self.live.lock().analyze(frame) {
            Ok(analysis) => LivePoseResponse::from_analysis(analysis),
            Err(err) => {
                debug!(%err, "live frame skipped");
                LivePoseResponse::skipped(err.to_string())
            }
        }
    }

    /// Predict branch: window accumulation, spinal risk, fault labels.
    ///
    /// Frames are validated against the full 33-landmark contract at this
    /// boundary; a wrong-length frame is rejected before any session state
    /// is touched.
    pub fn predict(&self, session_id: &SessionId, frame: &PoseFrame) -> PredictResponse {
        if let Err(err) = frame.validate() {
            debug!(session = %session_id, %err, "predict frame rejected");
            return PredictResponse::rejected(ErrorCode::LandmarkMissing);
        }

        // Extract before touching any state so a bad frame is a pure reject
        let features = match self.extractor.extract(frame) {
            Ok(features) => features,
            Err(err) => {
                debug!(session = %session_id, %err, "predict frame rejected");
                return PredictResponse::rejected(ErrorCode::LandmarkMissing);
            }
        };

        let handle = self.registry.get_or_create(session_id);
        let mut state = handle.lock();

        let spine_report = match state.spine.observe(frame) {
            Ok(report) => report,
            Err(err) => {
                debug!(session = %session_id, %err, "predict frame rejected");
                return PredictResponse::rejected(ErrorCode::LandmarkMissing);
            }
        };

        state.window.push(features);

        let aggregate = match state.window.aggregate() {
            Ok(aggregate) => aggregate,
            Err(_) => return PredictResponse::accumulating(spine_report),
        };

        match self.classifier.predict(&aggregate) {
            Ok(labels) => PredictResponse::classified(labels, spine_report),
            Err(err) => {
                warn!(session = %session_id, %err, "fault classifier unavailable");
                PredictResponse::degraded(spine_report)
            }
        }
    }

    /// Disposes one session's accumulated state.
    pub fn end_session(&self, session_id: &SessionId) -> bool {
        self.registry.remove(session_id)
    }

    /// The session registry (sizing, inspection).
    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Whether the fault classifier behind this pipeline is loaded.
    #[must_use]
    pub fn classifier_loaded(&self) -> bool {
        self.classifier.is_loaded()
    }
}
