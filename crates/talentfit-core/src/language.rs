//! Lexical language-proficiency estimate.
//!
//! Estimates a CEFR band from the lexical diversity of a transcript. The
//! analyzer is an ordinary value that callers construct and inject; it holds
//! no process-wide model state.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::CefrLevel;
use crate::traits::LanguageAnalyzer;

/// Lexical metrics of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub word_count: usize,
    pub unique_words: usize,
    /// Unique words over total words.
    pub lexical_diversity: f64,
    pub estimated_cefr: CefrLevel,
}

/// Heuristic analyzer based on type/token ratio and transcript length.
#[derive(Debug, Clone)]
pub struct LexicalAnalyzer {
    /// Minimum word count before a transcript can be rated C2.
    min_words_for_c2: usize,
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self {
            min_words_for_c2: 50,
        }
    }
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_words_for_c2(mut self, words: usize) -> Self {
        self.min_words_for_c2 = words;
        self
    }

    /// Analyze a transcript synchronously.
    pub fn analyze(&self, text: &str) -> TextAnalysis {
        // "don't" counts as "don" and "t", "well-known" as two words.
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphabetic())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();

        if words.is_empty() {
            return TextAnalysis {
                word_count: 0,
                unique_words: 0,
                lexical_diversity: 0.0,
                estimated_cefr: CefrLevel::A1,
            };
        }

        let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
        let diversity = unique.len() as f64 / words.len() as f64;

        TextAnalysis {
            word_count: words.len(),
            unique_words: unique.len(),
            lexical_diversity: diversity,
            estimated_cefr: self.level_for(diversity, words.len()),
        }
    }

    fn level_for(&self, diversity: f64, word_count: usize) -> CefrLevel {
        if diversity > 0.8 && word_count > self.min_words_for_c2 {
            CefrLevel::C2
        } else if diversity > 0.7 {
            CefrLevel::C1
        } else if diversity > 0.6 {
            CefrLevel::B2
        } else if diversity > 0.5 {
            CefrLevel::B1
        } else {
            CefrLevel::A2
        }
    }
}

#[async_trait]
impl LanguageAnalyzer for LexicalAnalyzer {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn analyze_text(&self, text: &str) -> anyhow::Result<TextAnalysis> {
        Ok(self.analyze(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transcript_is_a1() {
        let analysis = LexicalAnalyzer::new().analyze("  ... 123 ");
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.lexical_diversity, 0.0);
        assert_eq!(analysis.estimated_cefr, CefrLevel::A1);
    }

    #[test]
    fn repetitive_text_is_a2() {
        let analysis = LexicalAnalyzer::new().analyze("yes yes yes no no no yes no");
        assert_eq!(analysis.word_count, 8);
        assert_eq!(analysis.unique_words, 2);
        assert_eq!(analysis.estimated_cefr, CefrLevel::A2);
    }

    #[test]
    fn short_diverse_text_caps_at_c1() {
        let analysis =
            LexicalAnalyzer::new().analyze("I enjoy solving difficult problems quickly.");
        assert_eq!(analysis.word_count, 6);
        assert_eq!(analysis.lexical_diversity, 1.0);
        assert_eq!(analysis.estimated_cefr, CefrLevel::C1);
    }

    #[test]
    fn long_diverse_text_reaches_c2() {
        let words: Vec<String> = (0..60).map(|i| format!("w{}", "x".repeat(i))).collect();
        let analysis = LexicalAnalyzer::new().analyze(&words.join(" "));
        assert_eq!(analysis.word_count, 60);
        assert_eq!(analysis.estimated_cefr, CefrLevel::C2);
    }

    #[test]
    fn case_and_punctuation_are_normalized() {
        let analysis = LexicalAnalyzer::new().analyze("Hello, hello! HELLO?");
        assert_eq!(analysis.word_count, 3);
        assert_eq!(analysis.unique_words, 1);
    }

    #[test]
    fn contractions_and_hyphens_keep_their_words() {
        let analysis = LexicalAnalyzer::new().analyze("I don't like well-known tools.");
        assert_eq!(analysis.word_count, 7);
        assert_eq!(analysis.unique_words, 7);
    }

    #[test]
    fn digits_split_words() {
        let analysis = LexicalAnalyzer::new().analyze("route66 and 2024");
        assert_eq!(analysis.word_count, 2);
    }

    #[tokio::test]
    async fn analyzer_trait_delegates() {
        let analyzer = LexicalAnalyzer::new().with_min_words_for_c2(3);
        let analysis = analyzer
            .analyze_text("alpha beta gamma delta epsilon")
            .await
            .unwrap();
        assert_eq!(analyzer.name(), "lexical");
        assert_eq!(analysis.estimated_cefr, CefrLevel::C2);
    }
}
