//! Challenge question generation
//!
//! Builds comprehension questions by filling templates with the key
//! concepts of the document. When concept extraction finds too little to
//! work with, a fixed set of document-independent questions is used.

use crate::text::{is_stop_word, word_frequencies};
use docsage_common::session::{ChallengeQuestion, Difficulty, QuestionKind};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::debug;

/// Templates filled with extracted concepts
const QUESTION_TEMPLATES: &[&str] = &[
    "What is the main argument presented about {topic}?",
    "How does the document explain the relationship between {concept1} and {concept2}?",
    "What evidence does the author provide to support the claim about {topic}?",
    "According to the document, what are the key factors that influence {concept}?",
    "What conclusion can be drawn about {topic} based on the information provided?",
    "How does the document define or describe {concept}?",
    "What are the implications of {concept} as discussed in the document?",
    "Based on the document, what is the significance of {topic}?",
    "What are the main differences between {concept1} and {concept2} as described?",
    "How does the author justify their position on {topic}?",
];

/// Challenge generator configuration
#[derive(Debug, Clone)]
pub struct ChallengeConfig {
    /// Questions per challenge set
    pub question_count: usize,
    /// Concepts considered from the document
    pub max_concepts: usize,
    /// Minimum occurrences for a word to count as a concept
    pub min_concept_freq: usize,
    /// Documents below this many characters get fallback questions
    pub min_document_chars: usize,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            question_count: 3,
            max_concepts: 20,
            min_concept_freq: 3,
            min_document_chars: 100,
        }
    }
}

/// Generates comprehension questions from document text
pub struct ChallengeGenerator {
    config: ChallengeConfig,
}

impl ChallengeGenerator {
    pub fn new(config: ChallengeConfig) -> Self {
        Self { config }
    }

    /// Generate a full challenge set. Always returns exactly
    /// `question_count` questions.
    pub fn generate(&self, document_text: &str) -> Vec<ChallengeQuestion> {
        let text = document_text.trim();
        if text.chars().count() < self.config.min_document_chars {
            return self.fallback_questions();
        }

        let concepts = self.key_concepts(text);
        debug!(concept_count = concepts.len(), "Key concepts extracted");

        if concepts.len() < 2 {
            return self.fallback_questions();
        }

        let mut rng = rand::thread_rng();
        let mut used: HashSet<String> = HashSet::new();
        let mut questions = Vec::with_capacity(self.config.question_count);

        for _ in 0..self.config.question_count {
            if let Some(question) = self.generate_one(&concepts, &mut used, &mut rng) {
                questions.push(question);
            }
        }

        // Top up with fallbacks if concept-based generation came up short
        for fallback in self.fallback_questions() {
            if questions.len() >= self.config.question_count {
                break;
            }
            questions.push(fallback);
        }

        questions.truncate(self.config.question_count);
        questions
    }

    /// Most frequent meaningful words of the document, most frequent first.
    fn key_concepts(&self, text: &str) -> Vec<String> {
        let mut ranked: Vec<(String, usize)> = word_frequencies(text)
            .into_iter()
            .filter(|(word, freq)| {
                word.len() > 3 && !is_stop_word(word) && *freq >= self.config.min_concept_freq
            })
            .collect();

        // Frequency first, then alphabetical for a stable order
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .take(self.config.max_concepts)
            .map(|(word, _)| word)
            .collect()
    }

    fn generate_one(
        &self,
        concepts: &[String],
        used: &mut HashSet<String>,
        rng: &mut impl rand::Rng,
    ) -> Option<ChallengeQuestion> {
        let available: Vec<&String> = concepts.iter().filter(|c| !used.contains(*c)).collect();

        // Reuse concepts when the fresh ones run out
        let pool: Vec<&String> = if available.len() >= 2 {
            available
        } else {
            concepts.iter().take(2).collect()
        };

        let picked: Vec<String> = pool
            .choose_multiple(rng, 2.min(pool.len()))
            .map(|c| (*c).clone())
            .collect();
        let first = picked.first()?;
        let second = picked.get(1).unwrap_or(first);

        let template = QUESTION_TEMPLATES.choose(rng)?;
        let question = fill_template(template, first, second);

        used.extend(picked.iter().cloned());

        Some(ChallengeQuestion {
            question,
            concepts: picked,
            kind: QuestionKind::Logic,
            difficulty: Difficulty::Medium,
        })
    }

    /// Document-independent questions used when extraction fails.
    fn fallback_questions(&self) -> Vec<ChallengeQuestion> {
        vec![
            ChallengeQuestion {
                question: "What is the main topic discussed in this document?".to_string(),
                concepts: vec!["main topic".to_string(), "document content".to_string()],
                kind: QuestionKind::Comprehension,
                difficulty: Difficulty::Easy,
            },
            ChallengeQuestion {
                question: "What are the key points or arguments presented in the document?"
                    .to_string(),
                concepts: vec!["key points".to_string(), "arguments".to_string()],
                kind: QuestionKind::Analysis,
                difficulty: Difficulty::Medium,
            },
            ChallengeQuestion {
                question:
                    "What conclusions or implications can be drawn from the information provided?"
                        .to_string(),
                concepts: vec!["conclusions".to_string(), "implications".to_string()],
                kind: QuestionKind::Synthesis,
                difficulty: Difficulty::Hard,
            },
        ]
    }
}

fn fill_template(template: &str, first: &str, second: &str) -> String {
    template
        .replace("{topic}", first)
        .replace("{concept1}", first)
        .replace("{concept2}", second)
        .replace("{concept}", first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept_rich_document() -> String {
        let mut doc = String::new();
        for _ in 0..5 {
            doc.push_str(
                "Renewable energy sources such as solar panels reduce carbon emissions. \
                 Wind turbines complement solar generation when sunlight is scarce. \
                 Battery storage smooths the output of renewable generation. ",
            );
        }
        doc
    }

    #[test]
    fn test_generates_exactly_three_questions() {
        let generator = ChallengeGenerator::new(ChallengeConfig::default());
        let questions = generator.generate(&concept_rich_document());
        assert_eq!(questions.len(), 3);
        for q in &questions {
            assert!(!q.question.is_empty());
            assert!(!q.question.contains('{'), "unfilled template: {}", q.question);
            assert!(!q.concepts.is_empty());
        }
    }

    #[test]
    fn test_questions_use_document_concepts() {
        let generator = ChallengeGenerator::new(ChallengeConfig::default());
        let questions = generator.generate(&concept_rich_document());

        let document_vocabulary = concept_rich_document().to_ascii_lowercase();
        for q in &questions {
            for concept in &q.concepts {
                assert!(document_vocabulary.contains(concept.as_str()));
            }
        }
    }

    #[test]
    fn test_short_document_gets_fallbacks() {
        let generator = ChallengeGenerator::new(ChallengeConfig::default());
        let questions = generator.generate("Too short.");
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].kind, QuestionKind::Comprehension);
        assert_eq!(questions[2].difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_key_concepts_ranked_by_frequency() {
        let generator = ChallengeGenerator::new(ChallengeConfig {
            min_concept_freq: 2,
            ..ChallengeConfig::default()
        });
        let concepts =
            generator.key_concepts("solar solar solar panels panels wind wind grid grid");
        assert_eq!(concepts[0], "solar");
        assert!(concepts.contains(&"panels".to_string()));
        assert!(concepts.contains(&"grid".to_string()));
    }
}
