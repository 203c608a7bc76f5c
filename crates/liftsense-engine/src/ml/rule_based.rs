//! Rule-based fault classification fallback.
//!
//! When no trained model artifact ships with a deployment, this adapter
//! derives fault labels directly from the aggregate's mean block using the
//! same joint-angle heuristics the live feedback path applies per frame.
//! Far coarser than the trained multi-label model, but it keeps the predict
//! channel alive instead of degrading it.

use super::{labels, FaultClassifier, MlResult};
use crate::domain::feedback::{HIP_LEAD_DEG, KNEE_MIN_DEG};
use crate::window::AggregateVector;
use tracing::instrument;

/// Angle thresholds for the rule-based fallback.
#[derive(Debug, Clone)]
pub struct RuleBasedThresholds {
    /// Mean spine angle below which the back counts as rounded, degrees
    pub rounded_back_max_spine_deg: f64,
    /// Hip lead over the knee marking an early hip rise, degrees
    pub hip_lead_deg: f64,
    /// Mean knee angle below which the knees are over-bent, degrees
    pub knee_min_deg: f64,
}

impl Default for RuleBasedThresholds {
    fn default() -> Self {
        Self {
            rounded_back_max_spine_deg: 150.0,
            hip_lead_deg: HIP_LEAD_DEG,
            knee_min_deg: KNEE_MIN_DEG,
        }
    }
}

/// Rule-based [`FaultClassifier`] over the aggregate mean block.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedFaultClassifier {
    thresholds: RuleBasedThresholds,
}

impl RuleBasedFaultClassifier {
    /// Creates a classifier with the given thresholds.
    #[must_use]
    pub fn new(thresholds: RuleBasedThresholds) -> Self {
        Self { thresholds }
    }

    /// Creates a classifier with default thresholds.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }
}

impl FaultClassifier for RuleBasedFaultClassifier {
    #[instrument(skip(self, aggregate))]
    fn predict(&self, aggregate: &AggregateVector) -> MlResult<Vec<String>> {
        let means = aggregate.means();
        let (spine, hip, knee) = (means[0], means[1], means[2]);

        let mut faults = Vec::new();
        if spine < self.thresholds.rounded_back_max_spine_deg {
            faults.push(labels::ROUNDED_BACK.to_owned());
        }
        if hip + self.thresholds.hip_lead_deg < knee {
            faults.push(labels::EARLY_HIP_RISE.to_owned());
        }
        if knee < self.thresholds.knee_min_deg {
            faults.push(labels::EXCESSIVE_KNEE_BEND.to_owned());
        }

        if faults.is_empty() {
            faults.push(labels::CORRECT_FORM.to_owned());
        }
        Ok(faults)
    }

    fn is_loaded(&self) -> bool {
        true
    }
}
