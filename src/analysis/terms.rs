// src/analysis/terms.rs

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::extractors::section::SectionMap;
use crate::utils::error::ConfigError;

/// Characters of context kept on each side of a matched term.
const SNIPPET_WINDOW: usize = 250;

/// Aggregated matches for one (term, section) pair. Only emitted when the
/// frequency is at least one.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TermCount {
    pub term: String,
    pub section: String,
    pub frequency: usize,
}

/// Supporting evidence for a single match occurrence.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Snippet {
    pub term: String,
    pub context: String,
}

/// Whole-word, case-insensitive matcher for the configured taxonomy.
///
/// Terms are literal: each is escaped before compilation, so regex
/// metacharacters in the config are matched verbatim rather than honored.
/// Patterns are compiled once per run and reused for every document.
pub struct TermMatcher {
    // (term, compiled pattern), in taxonomy order
    patterns: Vec<(String, Regex)>,
}

impl TermMatcher {
    pub fn new(config: &AnalysisConfig) -> Result<Self, ConfigError> {
        let mut patterns = Vec::new();
        for terms in config.terms.values() {
            for term in terms {
                let pattern = format!(r"\b{}\b", regex::escape(term));
                let re = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::BadPattern(e.to_string()))?;
                patterns.push((term.clone(), re));
            }
        }
        Ok(Self { patterns })
    }

    /// Scans every section for every term. Matching is non-overlapping and
    /// per-section: a section's counts are never influenced by its
    /// neighbors. Each count's frequency equals the number of snippets
    /// emitted for the same (term, section) pair.
    pub fn scan(&self, sections: &SectionMap) -> (Vec<TermCount>, Vec<Snippet>) {
        let mut counts = Vec::new();
        let mut snippets = Vec::new();

        for (term, re) in &self.patterns {
            for (section, text) in sections {
                let mut frequency = 0;
                for m in re.find_iter(text) {
                    frequency += 1;
                    snippets.push(Snippet {
                        term: term.clone(),
                        context: clip_context(text, m.start(), m.end()),
                    });
                }
                if frequency > 0 {
                    counts.push(TermCount {
                        term: term.clone(),
                        section: section.clone(),
                        frequency,
                    });
                }
            }
        }

        (counts, snippets)
    }
}

/// Builds the `...window...` context string for one match. The window is
/// `SNIPPET_WINDOW` characters on each side, clipped to the section bounds —
/// it never reads outside the owning section's text.
fn clip_context(text: &str, start: usize, end: usize) -> String {
    let lo = back_n_chars(text, start, SNIPPET_WINDOW);
    let hi = forward_n_chars(text, end, SNIPPET_WINDOW);
    format!("...{}...", &text[lo..hi])
}

fn back_n_chars(text: &str, pos: usize, n: usize) -> usize {
    let mut idx = pos;
    for _ in 0..n {
        match text[..idx].chars().next_back() {
            Some(c) => idx -= c.len_utf8(),
            None => break,
        }
    }
    idx
}

fn forward_n_chars(text: &str, pos: usize, n: usize) -> usize {
    let mut idx = pos;
    for c in text[pos..].chars().take(n) {
        idx += c.len_utf8();
    }
    idx
}
