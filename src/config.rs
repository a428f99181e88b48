// src/config.rs
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::utils::error::ConfigError;

// Category names the scoring formulas reference. A taxonomy that lacks any
// of these must be rejected at startup, otherwise every document would
// silently score zero.
pub const CATEGORY_USAGE: &str = "usage";
pub const CATEGORY_GOVERNANCE: &str = "governance";
pub const CATEGORY_ACTION: &str = "action";

/// Normalized section key feeding the risk score when the config doesn't
/// override it. Kept as a constant so it tracks the segmenter's
/// normalization in one place.
pub const DEFAULT_RISK_SECTION_KEY: &str = "item 1a. risk factors";

/// Weights for the composite score. Supplied as-is; no normalization is
/// applied, the config author is responsible for an interpretable sum.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreWeights {
    pub transparency: f64,
    pub risk: f64,
    pub action: f64,
}

/// Analysis configuration loaded once at startup and passed explicitly into
/// each pipeline stage (no ambient/global state).
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Term taxonomy: category name -> ordered list of literal terms.
    pub terms: BTreeMap<String, Vec<String>>,

    /// Ordered section header patterns, each an un-anchored regex fragment
    /// matching a section title at the start of a line.
    pub sections: Vec<String>,

    pub weights: ScoreWeights,

    /// Normalized section key whose matches feed the risk score.
    #[serde(default = "default_risk_section_key")]
    pub risk_section_key: String,
}

fn default_risk_section_key() -> String {
    DEFAULT_RISK_SECTION_KEY.to_string()
}

impl AnalysisConfig {
    /// Loads and validates the YAML config file. Any validation failure is
    /// fatal to the run — processing must not start with a broken taxonomy.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: AnalysisConfig = serde_yaml::from_str(&raw)?;
        config.validate()?;

        tracing::debug!(
            "Loaded config: {} categories, {} section patterns",
            config.terms.len(),
            config.sections.len()
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for category in [CATEGORY_USAGE, CATEGORY_GOVERNANCE, CATEGORY_ACTION] {
            match self.terms.get(category) {
                Some(terms) if !terms.is_empty() => {}
                _ => return Err(ConfigError::MissingCategory(category)),
            }
        }

        if self.sections.is_empty() {
            return Err(ConfigError::NoSectionPatterns);
        }

        // Surface broken header regexes now rather than mid-run.
        for pattern in &self.sections {
            regex::Regex::new(pattern.trim())
                .map_err(|e| ConfigError::BadPattern(e.to_string()))?;
        }

        let w = &self.weights;
        if !(w.transparency.is_finite() && w.risk.is_finite() && w.action.is_finite()) {
            return Err(ConfigError::BadWeights);
        }

        Ok(())
    }

    /// Terms for a category, or an empty slice if the category is absent.
    /// Required categories are guaranteed present by `validate`.
    pub fn category(&self, name: &str) -> &[String] {
        self.terms.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
