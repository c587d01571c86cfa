//! Per-session document and conversation state
//!
//! A `Session` holds everything derived from one uploaded document: the
//! cleaned text, its summary, the chunk/embedding index, the conversation
//! history, and the active challenge set. Sessions live in process memory
//! only and are destroyed by an explicit reset or process exit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// State bound to one client-supplied session identifier.
///
/// Never serialized: sessions are in-memory only and die with the process.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque client-supplied identifier
    pub id: String,

    /// Uploaded document and its derived artifacts, if any
    pub document: Option<Arc<DocumentState>>,

    /// Ordered question/answer history
    pub history: Vec<ConversationTurn>,

    /// Currently active challenge set
    pub challenge: Option<Challenge>,

    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            document: None,
            history: Vec::new(),
            challenge: None,
            created_at: Utc::now(),
        }
    }

    /// The session's document, or `None` when nothing has been uploaded
    pub fn document(&self) -> Option<&Arc<DocumentState>> {
        self.document.as_ref()
    }

    /// Replace the document and discard everything derived from the old one
    pub fn set_document(&mut self, document: DocumentState) {
        self.document = Some(Arc::new(document));
        self.history.clear();
        self.challenge = None;
    }
}

/// An uploaded document and its derived artifacts.
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub document_id: Uuid,

    /// Original (sanitized) filename
    pub filename: String,

    /// Word count of the cleaned text
    pub word_count: usize,

    /// Full cleaned document text
    pub text: String,

    /// Generated summary
    pub summary: String,

    /// Chunk index used for retrieval; embeddings are owned by the session
    pub chunks: Vec<DocumentChunk>,

    pub uploaded_at: DateTime<Utc>,
}

/// A retrievable slice of the document with its embedding vector.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    pub index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// One entry in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub kind: TurnKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_sentences: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Question,
    Answer,
}

impl ConversationTurn {
    pub fn question(content: impl Into<String>) -> Self {
        Self {
            kind: TurnKind::Question,
            content: content.into(),
            references: Vec::new(),
            source_sentences: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn answer(
        content: impl Into<String>,
        references: Vec<String>,
        source_sentences: Vec<String>,
    ) -> Self {
        Self {
            kind: TurnKind::Answer,
            content: content.into(),
            references,
            source_sentences,
            timestamp: Utc::now(),
        }
    }
}

/// An active set of generated comprehension questions.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub questions: Vec<ChallengeQuestion>,
    pub generated_at: DateTime<Utc>,
}

impl Challenge {
    pub fn new(questions: Vec<ChallengeQuestion>) -> Self {
        Self {
            questions,
            generated_at: Utc::now(),
        }
    }
}

/// A generated comprehension question with its grounding concepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeQuestion {
    pub question: String,

    /// Concepts an answer is expected to cover; used for scoring
    pub concepts: Vec<String>,

    #[serde(rename = "type")]
    pub kind: QuestionKind,

    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Logic,
    Comprehension,
    Analysis,
    Synthesis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// In-memory session store keyed by the client-supplied identifier.
///
/// Concurrent requests for the same session are not serialized beyond the
/// map lock: two overlapping mutations are last-write-wins. There is no
/// eviction or expiry; sessions disappear on reset or process exit.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a snapshot of a session, if it exists
    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Fetch a snapshot, creating an empty session if none exists
    pub async fn get_or_create(&self, id: &str) -> Session {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id))
            .clone()
    }

    /// Mutate a session in place, creating it first if absent.
    ///
    /// Returns a snapshot of the session after the mutation.
    pub async fn update<F>(&self, id: &str, f: F) -> Session
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id));
        f(session);
        session.clone()
    }

    /// Remove a session entirely. Returns whether one existed.
    pub async fn reset(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
