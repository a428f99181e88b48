// src/analysis/scores.rs

use std::collections::HashSet;

use serde::Serialize;

use crate::analysis::terms::TermCount;
use crate::config::{AnalysisConfig, CATEGORY_ACTION, CATEGORY_GOVERNANCE, CATEGORY_USAGE};

/// The four scores derived for one accepted document. All rates are
/// matches-per-1000-words.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentScores {
    pub word_count: usize,
    pub transparency_score: f64,
    pub risk_score: f64,
    pub action_score: f64,
    pub composite_score: f64,
}

/// Aggregates term counts into the document's scores.
///
/// - transparency: usage-category matches across all sections
/// - risk: usage + governance matches in the configured risk section only
/// - action: action-category matches across all sections
/// - composite: weighted sum of the three, weights taken as supplied
///
/// A document that passed the word-count gate but matched nothing scores
/// zero everywhere, not "absent".
pub fn compute_scores(
    counts: &[TermCount],
    word_count: usize,
    config: &AnalysisConfig,
) -> DocumentScores {
    let usage: HashSet<&str> = config
        .category(CATEGORY_USAGE)
        .iter()
        .map(String::as_str)
        .collect();
    let governance: HashSet<&str> = config
        .category(CATEGORY_GOVERNANCE)
        .iter()
        .map(String::as_str)
        .collect();
    let action: HashSet<&str> = config
        .category(CATEGORY_ACTION)
        .iter()
        .map(String::as_str)
        .collect();

    let usage_mentions: usize = counts
        .iter()
        .filter(|c| usage.contains(c.term.as_str()))
        .map(|c| c.frequency)
        .sum();

    let risk_mentions: usize = counts
        .iter()
        .filter(|c| {
            c.section == config.risk_section_key
                && (usage.contains(c.term.as_str()) || governance.contains(c.term.as_str()))
        })
        .map(|c| c.frequency)
        .sum();

    let action_mentions: usize = counts
        .iter()
        .filter(|c| action.contains(c.term.as_str()))
        .map(|c| c.frequency)
        .sum();

    let rate = |mentions: usize| (mentions as f64 / word_count as f64) * 1000.0;
    let transparency_score = rate(usage_mentions);
    let risk_score = rate(risk_mentions);
    let action_score = rate(action_mentions);

    let w = &config.weights;
    let composite_score =
        w.transparency * transparency_score + w.risk * risk_score + w.action * action_score;

    DocumentScores {
        word_count,
        transparency_score,
        risk_score,
        action_score,
        composite_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(risk_key: &str) -> AnalysisConfig {
        let yaml = format!(
            r#"
terms:
  usage: ["usage", "AI"]
  governance: ["oversight"]
  action: ["audit"]
sections: ['item 1a\.? risk factors']
weights: {{ transparency: 1.0, risk: 0.5, action: 2.0 }}
risk_section_key: "{risk_key}"
"#
        );
        serde_yaml::from_str(&yaml).expect("test yaml")
    }

    fn count(term: &str, section: &str, frequency: usize) -> TermCount {
        TermCount {
            term: term.to_string(),
            section: section.to_string(),
            frequency,
        }
    }

    #[test]
    fn usage_matches_outside_risk_section_score_transparency_only() {
        let cfg = config("item 1a. risk factors");
        let counts = vec![count("usage", "item 7. management discussion", 2)];

        let scores = compute_scores(&counts, 1000, &cfg);
        assert_eq!(scores.transparency_score, 2.0);
        assert_eq!(scores.risk_score, 0.0);
        assert_eq!(scores.action_score, 0.0);
        // composite = 1.0 * 2.0 + 0.5 * 0.0 + 2.0 * 0.0
        assert_eq!(scores.composite_score, 2.0);
    }

    #[test]
    fn risk_score_restricted_to_configured_section() {
        let cfg = config("item 1a. risk factors");
        let counts = vec![
            count("usage", "item 1a. risk factors", 3),
            count("oversight", "item 1a. risk factors", 1),
            count("oversight", "header", 5),
        ];

        let scores = compute_scores(&counts, 2000, &cfg);
        // usage + governance in the risk section: 3 + 1 = 4 per 2000 words
        assert_eq!(scores.risk_score, 2.0);
        // transparency sees usage everywhere: 3 per 2000 words
        assert_eq!(scores.transparency_score, 1.5);
    }

    #[test]
    fn risk_section_key_override_is_honored() {
        let cfg = config("risk disclosures");
        let counts = vec![count("AI", "risk disclosures", 2)];

        let scores = compute_scores(&counts, 1000, &cfg);
        assert_eq!(scores.risk_score, 2.0);
    }

    #[test]
    fn no_matches_score_zero_not_absent() {
        let cfg = config("item 1a. risk factors");
        let scores = compute_scores(&[], 1500, &cfg);

        assert_eq!(scores.word_count, 1500);
        assert_eq!(scores.transparency_score, 0.0);
        assert_eq!(scores.risk_score, 0.0);
        assert_eq!(scores.action_score, 0.0);
        assert_eq!(scores.composite_score, 0.0);
    }

    #[test]
    fn composite_applies_weights_without_normalization() {
        let cfg = config("item 1a. risk factors");
        let counts = vec![
            count("usage", "item 1a. risk factors", 1),
            count("audit", "header", 1),
        ];

        let scores = compute_scores(&counts, 1000, &cfg);
        assert_eq!(scores.transparency_score, 1.0);
        assert_eq!(scores.risk_score, 1.0);
        assert_eq!(scores.action_score, 1.0);
        // 1.0 * 1.0 + 0.5 * 1.0 + 2.0 * 1.0
        assert_eq!(scores.composite_score, 3.5);
    }
}
