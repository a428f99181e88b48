// src/pipeline.rs

use crate::analysis::scores::{self, DocumentScores};
use crate::analysis::terms::{Snippet, TermCount, TermMatcher};
use crate::config::AnalysisConfig;
use crate::extractors::section::SectionSegmenter;
use crate::extractors::text;
use crate::utils::error::{ConfigError, ExtractError};

/// Default word-count floor. Documents shorter than this are treated as
/// data-quality failures, not scored.
pub const DEFAULT_MIN_WORD_COUNT: usize = 1000;

/// Everything the pipeline derives from one accepted document.
#[derive(Debug)]
pub struct DocumentAnalysis {
    pub scores: DocumentScores,
    pub counts: Vec<TermCount>,
    pub snippets: Vec<Snippet>,
}

/// The document-to-score pipeline: extract text, gate on word count,
/// segment into sections, match taxonomy terms, compute scores.
///
/// Built once per run; each `analyze` call is independent, so documents can
/// be processed in any order with no shared mutable state.
pub struct Pipeline<'a> {
    config: &'a AnalysisConfig,
    segmenter: SectionSegmenter,
    matcher: TermMatcher,
    min_word_count: usize,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a AnalysisConfig, min_word_count: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            config,
            segmenter: SectionSegmenter::new(&config.sections)?,
            matcher: TermMatcher::new(config)?,
            min_word_count,
        })
    }

    /// Runs one raw document through the full pipeline. A skip (empty
    /// extraction, short document) is returned as a typed error so the
    /// caller can log the reason and continue with the next document.
    pub fn analyze(&self, raw: &str) -> Result<DocumentAnalysis, ExtractError> {
        let text = text::extract_text(raw);
        if text.is_empty() {
            return Err(ExtractError::EmptyText);
        }

        // word_count comes from the full extracted text, once; sections are
        // never re-counted.
        let word_count = text::word_count(&text);
        if word_count < self.min_word_count {
            return Err(ExtractError::BelowWordFloor {
                words: word_count,
                floor: self.min_word_count,
            });
        }

        let sections = self.segmenter.segment(&text);
        let (counts, snippets) = self.matcher.scan(&sections);
        let scores = scores::compute_scores(&counts, word_count, self.config);

        Ok(DocumentAnalysis {
            scores,
            counts,
            snippets,
        })
    }
}
