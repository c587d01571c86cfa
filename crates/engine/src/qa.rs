//! Grounded question answering
//!
//! Answers are assembled only from sentences of the uploaded document:
//! the most relevant chunks are retrieved by embedding similarity, then
//! sentences are scored by keyword overlap with the question. Every
//! answer carries its source sentences and a citation for each.

use crate::embeddings::Embedder;
use crate::retrieval::rank_chunks;
use crate::text::{content_words, split_sentences};
use docsage_common::errors::Result;
use docsage_common::session::DocumentState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// QA engine configuration
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Chunks retrieved per question
    pub top_chunks: usize,
    /// Minimum chunk similarity to count as relevant
    pub min_chunk_score: f32,
    /// Minimum fraction of question keywords a sentence must cover
    pub min_sentence_overlap: f32,
    /// Maximum answer length in characters
    pub max_answer_chars: usize,
    /// Sentences quoted per answer
    pub max_source_sentences: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            top_chunks: 3,
            min_chunk_score: 0.3,
            min_sentence_overlap: 0.2,
            max_answer_chars: 300,
            max_source_sentences: 2,
        }
    }
}

/// An answer restricted to spans found in the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedAnswer {
    pub answer: String,
    pub references: Vec<String>,
    pub source_sentences: Vec<String>,
}

impl GroundedAnswer {
    fn unanswered(message: &str) -> Self {
        Self {
            answer: message.to_string(),
            references: Vec::new(),
            source_sentences: Vec::new(),
        }
    }

    /// Whether the answer quotes the document
    pub fn is_grounded(&self) -> bool {
        !self.source_sentences.is_empty()
    }
}

/// Document-grounded question answering engine
pub struct QaEngine {
    embedder: Arc<dyn Embedder>,
    config: QaConfig,
}

impl QaEngine {
    pub fn new(embedder: Arc<dyn Embedder>, config: QaConfig) -> Self {
        Self { embedder, config }
    }

    /// Answer a question from the session's document.
    pub async fn answer(&self, question: &str, document: &DocumentState) -> Result<GroundedAnswer> {
        if document.chunks.is_empty() {
            return Ok(GroundedAnswer::unanswered(
                "The document appears to be empty or could not be processed.",
            ));
        }

        let question_words = content_words(question);
        if question_words.is_empty() {
            return Ok(GroundedAnswer::unanswered(
                "I couldn't find a specific answer to your question in the document.",
            ));
        }

        let query = self.embedder.embed(question).await?;
        let relevant = rank_chunks(
            &query,
            &document.chunks,
            self.config.top_chunks,
            self.config.min_chunk_score,
        );

        let sources = self.best_sentences(&question_words, &relevant);

        debug!(
            relevant_chunks = relevant.len(),
            source_sentences = sources.len(),
            "Question processed"
        );

        if sources.is_empty() {
            return Ok(GroundedAnswer::unanswered(
                "I couldn't find a specific answer to your question in the document.",
            ));
        }

        let mut answer = sources.join(" ");
        if answer.chars().count() > self.config.max_answer_chars {
            answer = answer
                .chars()
                .take(self.config.max_answer_chars)
                .collect::<String>();
            answer.push_str("...");
        }

        let references = sources
            .iter()
            .map(|sentence| locate_reference(sentence, &document.text))
            .collect();

        Ok(GroundedAnswer {
            answer,
            references,
            source_sentences: sources,
        })
    }

    /// Score sentences of the relevant chunks by keyword overlap with the
    /// question and keep the best ones.
    fn best_sentences(
        &self,
        question_words: &HashSet<String>,
        chunks: &[crate::retrieval::ScoredChunk],
    ) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut scored: Vec<(f32, String)> = Vec::new();

        for chunk in chunks {
            for sentence in split_sentences(&chunk.content) {
                if !seen.insert(sentence.clone()) {
                    continue;
                }
                let sentence_words = content_words(&sentence);
                let overlap = question_words.intersection(&sentence_words).count();
                if overlap == 0 {
                    continue;
                }
                let score = overlap as f32 / question_words.len() as f32;
                scored.push((score, sentence));
            }
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .filter(|(score, _)| *score > self.config.min_sentence_overlap)
            .take(self.config.max_source_sentences)
            .map(|(_, sentence)| sentence)
            .collect()
    }
}

/// Cite a source sentence by its position in the document.
fn locate_reference(sentence: &str, document_text: &str) -> String {
    match document_text.find(sentence) {
        Some(position) => {
            let before = &document_text[..position];
            let paragraph_number = before.matches("\n\n").count() + 1;
            let paragraph_start = before.rfind("\n\n").map(|p| p + 2).unwrap_or(0);
            let sentence_number = split_sentences(&document_text[paragraph_start..position]).len() + 1;
            format!(
                "Based on paragraph {}, sentence {}",
                paragraph_number, sentence_number
            )
        }
        None => "Based on document content".to_string(),
    }
}
