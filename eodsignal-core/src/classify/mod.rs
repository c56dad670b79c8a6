//! Heuristic classifiers over a [`FeatureBundle`].
//!
//! The three classifiers are stateless and independent. [`classify`] runs
//! them together and applies the window-sufficiency gate: a decision is never
//! allowed to look strong when any window-derived feature is missing.

pub mod decision;
pub mod features;
pub mod pattern;
pub mod volume;

pub use decision::classify_decision;
pub use features::FeatureBundle;
pub use pattern::classify_pattern;
pub use volume::classify_volume;

use crate::config::SignalConfig;
use crate::domain::{DecisionCode, PatternCode, VolumeLabel};

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub pattern: PatternCode,
    pub decision: DecisionCode,
    pub volume_label: VolumeLabel,
    /// Window-derived fields that were absent. Non-empty means the decision
    /// went through the sufficiency gate.
    pub missing: Vec<&'static str>,
}

impl Classification {
    pub fn window_sufficient(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn classify(features: &FeatureBundle, config: &SignalConfig) -> Classification {
    let volume_label = classify_volume(features.volume_ratio, &config.volume_labels);
    let pattern = classify_pattern(features, &config.pattern);
    let decision = classify_decision(features, pattern, volume_label, &config.decision);
    let missing = features.missing_window_fields();
    let decision = gate_decision(decision, &missing);
    Classification {
        pattern,
        decision,
        volume_label,
        missing,
    }
}

/// Downgrade a strong decision to Avoid when history is incomplete.
pub fn gate_decision(decision: DecisionCode, missing: &[&'static str]) -> DecisionCode {
    if !missing.is_empty() && decision.is_strong() {
        DecisionCode::Avoid
    } else {
        decision
    }
}
