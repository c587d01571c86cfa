//! Challenge answer evaluation
//!
//! Scores a free-text answer against the document using three components:
//! semantic similarity to the most relevant document sentences, keyword
//! overlap with the question's grounding concepts, and content relevance
//! to the document itself. The combined score maps to a letter grade.

use crate::embeddings::{cosine_similarity, Embedder};
use crate::retrieval::rank_embeddings;
use crate::text::{content_words, split_sentences};
use docsage_common::errors::Result;
use docsage_common::session::ChallengeQuestion;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Evaluator configuration
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Weight of semantic similarity in the combined score
    pub semantic_weight: f32,
    /// Weight of concept keyword overlap
    pub keyword_weight: f32,
    /// Weight of content relevance
    pub content_weight: f32,
    /// Document sentences compared against the answer
    pub top_sentences: usize,
    /// Minimum similarity for a sentence to count as relevant
    pub min_sentence_score: f32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.4,
            keyword_weight: 0.3,
            content_weight: 0.3,
            top_sentences: 5,
            min_sentence_score: 0.3,
        }
    }
}

/// Result of scoring one answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Combined score in [0, 1]
    pub score: f32,
    /// Score as a percentage
    pub percentage: f32,
    /// Letter grade
    pub grade: String,
    pub feedback: String,
    pub analysis: String,
}

/// Scores user answers against the document
pub struct AnswerEvaluator {
    embedder: Arc<dyn Embedder>,
    config: EvaluatorConfig,
}

impl AnswerEvaluator {
    pub fn new(embedder: Arc<dyn Embedder>, config: EvaluatorConfig) -> Self {
        Self { embedder, config }
    }

    /// Evaluate an answer to a challenge question.
    pub async fn evaluate(
        &self,
        question: &ChallengeQuestion,
        user_answer: &str,
        document_text: &str,
    ) -> Result<Evaluation> {
        let user_answer = user_answer.trim();
        if user_answer.is_empty() {
            return Ok(build_evaluation(
                0.0,
                "No answer provided".to_string(),
                "Please provide a detailed answer.".to_string(),
            ));
        }

        let relevant = self
            .relevant_sentences(&question.question, document_text)
            .await?;

        if relevant.is_empty() {
            return Ok(build_evaluation(
                0.5,
                "Limited context available".to_string(),
                "I couldn't find specific information to evaluate your answer against."
                    .to_string(),
            ));
        }

        let semantic = self.semantic_similarity(user_answer, &relevant).await?;
        let keyword = keyword_score(user_answer, &question.concepts);
        let content = content_relevance(user_answer, &relevant);

        let combined = (semantic * self.config.semantic_weight
            + keyword * self.config.keyword_weight
            + content * self.config.content_weight)
            .clamp(0.0, 1.0);

        debug!(
            semantic,
            keyword, content, combined, "Answer scored"
        );

        let feedback = feedback_for(combined);
        let analysis = analysis_for(question, user_answer, combined);

        Ok(build_evaluation(combined, feedback, analysis))
    }

    /// Document sentences most relevant to the question.
    async fn relevant_sentences(
        &self,
        question: &str,
        document_text: &str,
    ) -> Result<Vec<String>> {
        let sentences = split_sentences(document_text);
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(question).await?;
        let embeddings = self.embedder.embed_batch(&sentences).await?;

        let ranked = rank_embeddings(
            &query,
            &embeddings,
            self.config.top_sentences,
            self.config.min_sentence_score,
        );

        if ranked.is_empty() {
            // Nothing cleared the threshold; evaluate against the opening
            return Ok(sentences.into_iter().take(3).collect());
        }

        Ok(ranked
            .into_iter()
            .map(|(index, _)| sentences[index].clone())
            .collect())
    }

    /// Mean cosine similarity between the answer and the relevant sentences.
    async fn semantic_similarity(&self, answer: &str, sentences: &[String]) -> Result<f32> {
        if sentences.is_empty() {
            return Ok(0.5);
        }

        let answer_embedding = self.embedder.embed(answer).await?;
        let sentence_embeddings = self.embedder.embed_batch(sentences).await?;

        let total: f32 = sentence_embeddings
            .iter()
            .map(|e| cosine_similarity(&answer_embedding, e).unwrap_or(0.0))
            .sum();

        Ok(total / sentence_embeddings.len() as f32)
    }
}

/// Fraction of the question's grounding concepts covered by the answer.
fn keyword_score(answer: &str, concepts: &[String]) -> f32 {
    if concepts.is_empty() {
        return 0.5;
    }

    let concept_words: HashSet<String> = concepts
        .iter()
        .flat_map(|c| crate::text::tokenize(c))
        .collect();
    if concept_words.is_empty() {
        return 0.5;
    }

    let answer_words = content_words(answer);
    let overlap = answer_words.intersection(&concept_words).count();

    (overlap as f32 / concept_words.len() as f32).min(1.0)
}

/// Fraction of the answer's words that appear in the relevant sentences.
fn content_relevance(answer: &str, sentences: &[String]) -> f32 {
    let answer_words = content_words(answer);
    if answer_words.is_empty() {
        return 0.0;
    }

    let mut sentence_words: HashSet<String> = HashSet::new();
    for sentence in sentences {
        sentence_words.extend(content_words(sentence));
    }
    if sentence_words.is_empty() {
        return 0.5;
    }

    let overlap = answer_words.intersection(&sentence_words).count();
    (overlap as f32 / answer_words.len() as f32).min(1.0)
}

fn build_evaluation(score: f32, feedback: String, analysis: String) -> Evaluation {
    Evaluation {
        score: round_to(score, 2),
        percentage: round_to(score * 100.0, 1),
        grade: grade_for(score).to_string(),
        feedback,
        analysis,
    }
}

fn round_to(value: f32, decimals: u32) -> f32 {
    let factor = 10f32.powi(decimals as i32);
    (value * factor).round() / factor
}

fn grade_for(score: f32) -> &'static str {
    if score >= 0.9 {
        "A+"
    } else if score >= 0.8 {
        "A"
    } else if score >= 0.7 {
        "B+"
    } else if score >= 0.6 {
        "B"
    } else if score >= 0.5 {
        "C+"
    } else if score >= 0.4 {
        "C"
    } else if score >= 0.3 {
        "D"
    } else {
        "F"
    }
}

fn feedback_for(score: f32) -> String {
    if score >= 0.8 {
        "Excellent answer! Your response demonstrates strong understanding of the document content."
    } else if score >= 0.6 {
        "Good answer! You've captured the main points, but could provide more specific details."
    } else if score >= 0.4 {
        "Fair answer. Consider including more relevant concepts and specific information from the document."
    } else if score >= 0.2 {
        "Your answer needs improvement. Try to focus more on the specific concepts mentioned in the question."
    } else {
        "Your answer doesn't seem to address the question effectively. Please review the document content."
    }
    .to_string()
}

fn analysis_for(question: &ChallengeQuestion, answer: &str, score: f32) -> String {
    let mut parts: Vec<String> = Vec::new();

    let answer_length = answer.split_whitespace().count();
    if answer_length < 10 {
        parts.push("Your answer is quite brief. Consider providing more detailed explanations.".to_string());
    } else if answer_length > 100 {
        parts.push(
            "Your answer is comprehensive, which is good for demonstrating understanding."
                .to_string(),
        );
    } else {
        parts.push("Your answer has an appropriate length for this type of question.".to_string());
    }

    if !question.concepts.is_empty() {
        let answer_lower = answer.to_lowercase();
        let covered: Vec<&str> = question
            .concepts
            .iter()
            .filter(|c| answer_lower.contains(&c.to_lowercase()))
            .map(|c| c.as_str())
            .collect();

        if covered.is_empty() {
            parts.push(
                "Consider including more of the key concepts mentioned in the question."
                    .to_string(),
            );
        } else {
            parts.push(format!(
                "You covered these key concepts: {}.",
                covered.join(", ")
            ));
        }
    }

    if score >= 0.7 {
        parts.push(
            "Overall, this is a strong response that demonstrates good comprehension.".to_string(),
        );
    } else if score >= 0.5 {
        parts.push("This response shows some understanding but could be more specific.".to_string());
    } else {
        parts.push(
            "This response needs significant improvement to demonstrate understanding."
                .to_string(),
        );
    }

    parts.join(" ")
}
