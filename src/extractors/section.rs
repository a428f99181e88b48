// src/extractors/section.rs

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};

use crate::utils::error::ConfigError;

/// Reserved key for text preceding the first recognized header.
pub const HEADER_KEY: &str = "header";
/// Reserved key used when no header pattern matches anywhere.
pub const FULL_DOCUMENT_KEY: &str = "full_document";

/// Map from normalized section title to section content. A BTreeMap keeps
/// iteration order stable so re-runs emit records in the same order.
pub type SectionMap = BTreeMap<String, String>;

/// Splits filing text into named sections at configured header lines.
///
/// All header patterns are compiled into a single alternation anchored at
/// line starts, so segmentation is one scan over the text regardless of how
/// many patterns are configured.
pub struct SectionSegmenter {
    splitter: Regex,
}

impl SectionSegmenter {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::NoSectionPatterns);
        }

        let joined = patterns
            .iter()
            .map(|p| p.trim())
            .collect::<Vec<_>>()
            .join("|");
        let splitter = RegexBuilder::new(&format!("^(?:{joined})"))
            .case_insensitive(true)
            .multi_line(true)
            .build()
            .map_err(|e| ConfigError::BadPattern(e.to_string()))?;

        Ok(Self { splitter })
    }

    /// Splits `text` at every line start where a header pattern matches.
    ///
    /// The regex crate has no zero-width lookahead, so match start offsets
    /// are collected first and the text is cut at those offsets, which
    /// keeps each header line inside its own chunk.
    pub fn segment(&self, text: &str) -> SectionMap {
        let starts: Vec<usize> = self.splitter.find_iter(text).map(|m| m.start()).collect();

        let mut sections = SectionMap::new();
        if starts.is_empty() {
            sections.insert(FULL_DOCUMENT_KEY.to_string(), text.trim().to_string());
            return sections;
        }

        // Everything before the first header is the filing preamble.
        sections.insert(HEADER_KEY.to_string(), text[..starts[0]].trim().to_string());

        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            let chunk = text[start..end].trim();
            if chunk.is_empty() {
                continue;
            }

            // First line of the chunk is the section title; the rest is the
            // content. Duplicate normalized titles overwrite (last wins) —
            // filing section headers are expected to appear once.
            let (title, content) = match chunk.find('\n') {
                Some(pos) => (&chunk[..pos], &chunk[pos + 1..]),
                None => (chunk, ""),
            };
            sections.insert(normalize_title(title), content.trim().to_string());
        }

        sections
    }
}

/// Lower-cases a header line and collapses internal whitespace so the same
/// section always maps to the same key.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter(patterns: &[&str]) -> SectionSegmenter {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        SectionSegmenter::new(&patterns).expect("test patterns should compile")
    }

    #[test]
    fn splits_risk_factors_section() {
        let seg = segmenter(&[r"item 1a\. risk factors"]);
        let text = "Filing preamble text.\nItem 1A. Risk Factors\nWe disclose AI usage risks here. Usage is monitored.\n";
        let sections = seg.segment(text);

        assert_eq!(sections[HEADER_KEY], "Filing preamble text.");
        assert_eq!(
            sections["item 1a. risk factors"],
            "We disclose AI usage risks here. Usage is monitored."
        );
    }

    #[test]
    fn no_header_match_yields_full_document() {
        let seg = segmenter(&[r"item 1a\. risk factors"]);
        let text = "  Nothing here looks like a section header.  ";
        let sections = seg.segment(text);

        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[FULL_DOCUMENT_KEY],
            "Nothing here looks like a section header."
        );
    }

    #[test]
    fn headers_only_match_at_line_start() {
        let seg = segmenter(&[r"item 1a\. risk factors"]);
        let text = "This filing discusses item 1a. risk factors in passing.\nItem 1A. Risk Factors\nActual content.\n";
        let sections = seg.segment(text);

        // Only the line-start occurrence splits; the inline mention stays in
        // the preamble.
        assert!(sections[HEADER_KEY].contains("in passing"));
        assert_eq!(sections["item 1a. risk factors"], "Actual content.");
    }

    #[test]
    fn titles_are_normalized() {
        let seg = segmenter(&[r"item\s+1a\.\s+risk\s+factors"]);
        let text = "intro\nITEM   1A.\tRISK FACTORS\ncontent\n";
        let sections = seg.segment(text);
        assert_eq!(sections["item 1a. risk factors"], "content");
    }

    #[test]
    fn duplicate_section_titles_last_write_wins() {
        let seg = segmenter(&[r"item 2\. properties"]);
        let text = "intro\nItem 2. Properties\nfirst occurrence\nItem 2. Properties\nsecond occurrence\n";
        let sections = seg.segment(text);
        assert_eq!(sections["item 2. properties"], "second occurrence");
    }

    #[test]
    fn multiple_patterns_split_in_document_order() {
        let seg = segmenter(&[r"item 1\. business", r"item 1a\. risk factors"]);
        let text = "preamble\nItem 1. Business\nwe sell things\nItem 1A. Risk Factors\nthings are risky\n";
        let sections = seg.segment(text);

        assert_eq!(sections["item 1. business"], "we sell things");
        assert_eq!(sections["item 1a. risk factors"], "things are risky");
        assert_eq!(sections[HEADER_KEY], "preamble");
    }

    #[test]
    fn header_at_end_of_text_has_empty_content() {
        let seg = segmenter(&[r"item 3\. legal proceedings"]);
        let text = "intro\nItem 3. Legal Proceedings";
        let sections = seg.segment(text);
        assert_eq!(sections["item 3. legal proceedings"], "");
    }
}
