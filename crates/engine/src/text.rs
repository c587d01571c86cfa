//! Shared text analysis helpers
//!
//! Tokenization, sentence splitting, stop words, and frequency counting
//! used by the summarizer, QA engine, challenge generator, and evaluator.

use regex_lite::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Minimum sentence length (characters) to be considered meaningful
const MIN_SENTENCE_CHARS: usize = 10;

/// Stop words filtered out of keyword matching and concept extraction
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "in", "on", "at", "to",
    "for", "of", "with", "by", "from", "and", "or", "but", "not", "this", "that", "these",
    "those", "it", "its", "as", "do", "does", "did", "has", "have", "had", "can", "could",
    "will", "would", "should", "may", "might", "must", "shall", "about", "above", "after",
    "again", "all", "also", "any", "because", "before", "between", "both", "each", "few",
    "here", "how", "into", "more", "most", "other", "out", "over", "own", "same", "some",
    "such", "than", "then", "there", "they", "their", "them", "through", "under", "until",
    "very", "what", "when", "where", "which", "while", "who", "whom", "why", "you", "your",
];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z0-9]+").expect("static pattern"))
}

/// Lowercased word tokens of a text
pub fn tokenize(text: &str) -> Vec<String> {
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Distinct meaningful words of a text (longer than 3 chars, non-stop)
pub fn content_words(text: &str) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|w| w.len() > 3 && !is_stop_word(w))
        .collect()
}

/// Word frequency over tokens longer than 2 chars
pub fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for word in tokenize(text) {
        if word.len() > 2 {
            *freq.entry(word).or_insert(0) += 1;
        }
    }
    freq
}

/// Split text into sentences, keeping terminal punctuation.
///
/// A sentence ends at `.`, `!`, or `?` followed by whitespace (or end of
/// input). Fragments shorter than a few words are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, ch)) = iter.next() {
        if matches!(ch, '.' | '!' | '?') {
            let end = i + ch.len_utf8();
            let boundary = iter.peek().map_or(true, |(_, next)| next.is_whitespace());
            if boundary {
                push_sentence(&mut sentences, &text[start..end]);
                start = end;
            }
        }
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.chars().count() > MIN_SENTENCE_CHARS {
        sentences.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Hello, World! It's 2024."),
            vec!["hello", "world", "it", "s", "2024"]
        );
    }

    #[test]
    fn test_content_words_filters_stops_and_short() {
        let words = content_words("The photosynthesis process is what plants do");
        assert!(words.contains("photosynthesis"));
        assert!(words.contains("process"));
        assert!(words.contains("plants"));
        assert!(!words.contains("the"));
        assert!(!words.contains("is"));
    }

    #[test]
    fn test_split_sentences() {
        let sentences =
            split_sentences("Plants convert sunlight into energy. This happens in leaves! Why?");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Plants convert sunlight into energy.");
        assert_eq!(sentences[1], "This happens in leaves!");
    }

    #[test]
    fn test_split_ignores_decimal_points() {
        let sentences = split_sentences("The rate grew by 3.5 percent last year. Growth continued.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("3.5 percent"));
    }

    #[test]
    fn test_word_frequencies() {
        let freq = word_frequencies("energy flows and energy transforms");
        assert_eq!(freq.get("energy"), Some(&2));
        assert_eq!(freq.get("flows"), Some(&1));
        assert_eq!(freq.get("and"), Some(&1));
    }
}
