//! Extractive summarization
//!
//! Ranks sentences by the frequency of the words they contain, then emits
//! the best ones in document order within a fixed word budget.

use crate::text::{split_sentences, tokenize, word_frequencies};
use tracing::debug;

/// Summarizer configuration
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Maximum summary length in words
    pub max_words: usize,
    /// Inputs below this many characters are returned as-is
    pub min_input_chars: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            max_words: 150,
            min_input_chars: 100,
        }
    }
}

/// Extractive document summarizer
pub struct Summarizer {
    config: SummarizerConfig,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self { config }
    }

    /// Generate a summary no longer than `max_words` words.
    pub fn summarize(&self, text: &str) -> String {
        let text = text.trim();

        if text.chars().count() < self.config.min_input_chars {
            return text.to_string();
        }

        if count_words(text) <= self.config.max_words {
            return text.to_string();
        }

        let sentences = split_sentences(text);
        if sentences.len() <= 3 {
            return self.postprocess(truncate_words(text, self.config.max_words));
        }

        let summary = self.select_sentences(text, &sentences);
        self.postprocess(summary)
    }

    /// Score every sentence, then take the best ones in document order
    /// until the word budget is spent.
    fn select_sentences(&self, text: &str, sentences: &[String]) -> String {
        let freq = word_frequencies(text);

        let mut ranked: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| {
                let tokens = tokenize(sentence);
                let total: usize = tokens
                    .iter()
                    .filter(|w| w.len() > 2)
                    .map(|w| freq.get(w).copied().unwrap_or(0))
                    .sum();
                let score = if tokens.is_empty() {
                    0.0
                } else {
                    total as f64 / tokens.len() as f64
                };
                (index, score)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut selected: Vec<usize> = Vec::new();
        let mut budget = self.config.max_words;
        for (index, _) in &ranked {
            let words = count_words(&sentences[*index]);
            if words <= budget {
                selected.push(*index);
                budget -= words;
            }
            if budget == 0 {
                break;
            }
        }

        if selected.is_empty() {
            // Every sentence is longer than the budget; cut the best one
            let best = ranked[0].0;
            return truncate_words(&sentences[best], self.config.max_words);
        }

        selected.sort_unstable();

        debug!(
            input_sentences = sentences.len(),
            selected = selected.len(),
            "Summary sentences selected"
        );

        selected
            .iter()
            .map(|&i| sentences[i].as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Enforce the word budget and terminal punctuation.
    fn postprocess(&self, summary: String) -> String {
        let mut summary = if count_words(&summary) > self.config.max_words {
            truncate_words(&summary, self.config.max_words)
        } else {
            summary
        };

        summary = summary.trim().to_string();
        if !summary.is_empty() && !summary.ends_with(['.', '!', '?']) {
            summary.push('.');
        }
        summary
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    let mut truncated = words[..max_words].join(" ");
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_document() -> String {
        let mut doc = String::new();
        doc.push_str("Photosynthesis converts sunlight into chemical energy. ");
        doc.push_str("Photosynthesis occurs in the chloroplasts of plant cells. ");
        doc.push_str("Chlorophyll absorbs light most strongly in the blue portion. ");
        for i in 0..60 {
            doc.push_str(&format!(
                "Filler sentence number {} mentions energy and plant cells repeatedly. ",
                i
            ));
        }
        doc
    }

    #[test]
    fn test_short_input_passthrough() {
        let summarizer = Summarizer::new(SummarizerConfig::default());
        let text = "A very short note.";
        assert_eq!(summarizer.summarize(text), text);
    }

    #[test]
    fn test_summary_respects_word_budget() {
        let summarizer = Summarizer::new(SummarizerConfig::default());
        let summary = summarizer.summarize(&long_document());
        assert!(summary.split_whitespace().count() <= 150);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_summary_ends_with_punctuation() {
        let summarizer = Summarizer::new(SummarizerConfig::default());
        let summary = summarizer.summarize(&long_document());
        assert!(summary.ends_with(['.', '!', '?']));
    }

    #[test]
    fn test_small_budget() {
        let summarizer = Summarizer::new(SummarizerConfig {
            max_words: 12,
            min_input_chars: 10,
        });
        let summary = summarizer.summarize(&long_document());
        assert!(summary.split_whitespace().count() <= 12);
    }
}
