//! Session state machine and session storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::{Answer, GroundingSource};

/// One past question/answer/sources triple. Immutable once created, never
/// removed for the lifetime of the session.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    /// Opaque random identifier.
    pub id: String,
    pub question: String,
    pub answer: String,
    pub sources: Vec<GroundingSource>,
    pub timestamp: DateTime<Utc>,
}

/// The query currently on display.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentQuery {
    pub question: String,
    /// `None` while the question is in flight.
    pub answer: Option<Answer>,
}

/// Display phase derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Answered,
    Failed,
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The trimmed question was admitted; the session is now loading.
    Started(String),
    /// Empty or whitespace-only input; nothing changed.
    Rejected,
    /// A question is already in flight; nothing changed.
    Busy,
}

#[derive(Debug, Default)]
struct State {
    /// Newest first.
    history: Vec<HistoryItem>,
    current: Option<CurrentQuery>,
    loading: bool,
    error: Option<String>,
}

/// State controller for a single session.
///
/// All mutable state lives behind one lock and changes only through the
/// transition methods. After any transition settles, `loading` and `error`
/// are never both set.
#[derive(Debug)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    id: String,
    state: RwLock<State>,
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id,
                state: RwLock::new(State::default()),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Admit a question and enter the loading state.
    ///
    /// The question is trimmed first. Empty input and submissions made while
    /// a question is already in flight are declined without side effects;
    /// the single-slot guard here is what keeps at most one upstream request
    /// outstanding per session.
    pub fn begin(&self, question: &str) -> Submission {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            return Submission::Rejected;
        }

        let mut state = self.inner.state.write().unwrap();
        if state.loading {
            return Submission::Busy;
        }

        state.loading = true;
        state.error = None;
        state.current = Some(CurrentQuery {
            question: trimmed.to_string(),
            answer: None,
        });
        Submission::Started(trimmed.to_string())
    }

    /// Record a successful answer and prepend the history entry.
    pub fn complete(&self, question: &str, answer: Answer) {
        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            question: question.to_string(),
            answer: answer.text.clone(),
            sources: answer.sources.clone(),
            timestamp: Utc::now(),
        };

        let mut state = self.inner.state.write().unwrap();
        state.current = Some(CurrentQuery {
            question: question.to_string(),
            answer: Some(answer),
        });
        state.history.insert(0, item);
        state.loading = false;
        state.error = None;
    }

    /// Record an upstream failure. The question stays on display for
    /// context; recovery is a manual resubmit.
    pub fn fail(&self, message: impl Into<String>) {
        let mut state = self.inner.state.write().unwrap();
        state.loading = false;
        state.error = Some(message.into());
    }

    /// Re-display a history entry without contacting the engine.
    ///
    /// Clears any error and leaves history order untouched. Returns `false`
    /// when no entry has the given id.
    pub fn select(&self, item_id: &str) -> bool {
        let mut state = self.inner.state.write().unwrap();
        let Some(item) = state.history.iter().find(|item| item.id == item_id).cloned() else {
            return false;
        };

        state.current = Some(CurrentQuery {
            question: item.question,
            answer: Some(Answer {
                text: item.answer,
                sources: item.sources,
            }),
        });
        state.error = None;
        true
    }

    /// Clear the displayed query and any error. History is untouched.
    pub fn reset(&self) {
        let mut state = self.inner.state.write().unwrap();
        state.current = None;
        state.error = None;
    }

    /// Get the number of history entries.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.inner.state.read().unwrap().history.len()
    }

    /// Take an immutable copy of the session state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.read().unwrap();
        SessionSnapshot {
            id: self.inner.id.clone(),
            history: state.history.clone(),
            current: state.current.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }
}

/// Point-in-time copy of a session, consumed by renderers and the JSON API.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: String,
    /// Newest first.
    pub history: Vec<HistoryItem>,
    pub current: Option<CurrentQuery>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// Derive the display phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else if self
            .current
            .as_ref()
            .is_some_and(|current| current.answer.is_some())
        {
            Phase::Answered
        } else {
            Phase::Idle
        }
    }
}

/// Thread-safe store for sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Create a new session and return it.
    #[must_use]
    pub fn create(&self) -> Session {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone());
        let mut guard = self.inner.sessions.write().unwrap();
        guard.insert(id, session.clone());
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        let guard = self.inner.sessions.read().unwrap();
        guard.get(id).cloned()
    }

    /// Get a session by ID, creating a fresh one if it doesn't exist.
    ///
    /// Unknown ids arrive after a server restart; a fresh session (empty
    /// history) is the correct lifecycle answer.
    #[must_use]
    pub fn get_or_create(&self, id: &str) -> Session {
        {
            let guard = self.inner.sessions.read().unwrap();
            if let Some(session) = guard.get(id) {
                return session.clone();
            }
        }

        let session = Session::new(id.to_string());
        let mut guard = self.inner.sessions.write().unwrap();
        guard
            .entry(id.to_string())
            .or_insert_with(|| session)
            .clone()
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.sessions.read().unwrap().len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> Answer {
        Answer {
            text: text.to_string(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn empty_and_whitespace_questions_are_rejected() {
        let session = Session::new("test".to_string());

        assert_eq!(session.begin(""), Submission::Rejected);
        assert_eq!(session.begin("   \n\t"), Submission::Rejected);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase(), Phase::Idle);
        assert!(snapshot.current.is_none());
        assert!(!snapshot.loading);
    }

    #[test]
    fn begin_trims_and_enters_loading() {
        let session = Session::new("test".to_string());

        let Submission::Started(question) = session.begin("  What is Rust?  ") else {
            panic!("expected submission to start");
        };
        assert_eq!(question, "What is Rust?");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase(), Phase::Loading);
        assert_eq!(
            snapshot.current.as_ref().unwrap().question,
            "What is Rust?"
        );
        assert!(snapshot.current.unwrap().answer.is_none());
    }

    #[test]
    fn second_submission_while_loading_is_declined() {
        let session = Session::new("test".to_string());

        assert!(matches!(session.begin("Q1"), Submission::Started(_)));
        assert_eq!(session.begin("Q2"), Submission::Busy);

        // The in-flight question is untouched.
        assert_eq!(session.snapshot().current.unwrap().question, "Q1");
    }

    #[test]
    fn complete_prepends_history_newest_first() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        session.complete("Q1", answer("A1"));
        session.begin("Q2");
        session.complete("Q2", answer("A2"));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase(), Phase::Answered);
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[0].question, "Q2");
        assert_eq!(snapshot.history[1].question, "Q1");
    }

    #[test]
    fn fail_keeps_question_and_clears_loading() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        session.fail("Failed to get an answer from the NLP engine.");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase(), Phase::Failed);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.current.unwrap().question, "Q1");
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn resubmit_after_failure_clears_error() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        session.fail("engine down");
        assert!(matches!(session.begin("Q1"), Submission::Started(_)));

        let snapshot = session.snapshot();
        assert!(snapshot.error.is_none());
        assert!(snapshot.loading);
    }

    #[test]
    fn select_redisplays_without_reordering() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        session.complete("Q1", answer("A1"));
        session.begin("Q2");
        session.complete("Q2", answer("A2"));

        let first_id = session.snapshot().history[1].id.clone();
        assert!(session.select(&first_id));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase(), Phase::Answered);
        assert_eq!(snapshot.current.unwrap().question, "Q1");
        assert_eq!(snapshot.history[0].question, "Q2");
        assert_eq!(snapshot.history[1].question, "Q1");
    }

    #[test]
    fn select_is_idempotent() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        session.complete("Q1", answer("A1"));
        let id = session.snapshot().history[0].id.clone();

        assert!(session.select(&id));
        let first = session.snapshot();
        assert!(session.select(&id));
        let second = session.snapshot();

        assert_eq!(
            first.current.unwrap().question,
            second.current.unwrap().question
        );
        assert_eq!(first.history.len(), second.history.len());
    }

    #[test]
    fn select_clears_error() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        session.complete("Q1", answer("A1"));
        let id = session.snapshot().history[0].id.clone();

        session.begin("Q2");
        session.fail("engine down");
        assert!(session.select(&id));

        let snapshot = session.snapshot();
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.current.unwrap().question, "Q1");
    }

    #[test]
    fn select_unknown_id_is_a_noop() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        session.complete("Q1", answer("A1"));
        assert!(!session.select("missing"));
        assert_eq!(session.snapshot().current.unwrap().question, "Q1");
    }

    #[test]
    fn reset_clears_display_but_not_history() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        session.complete("Q1", answer("A1"));
        session.reset();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase(), Phase::Idle);
        assert!(snapshot.current.is_none());
        assert_eq!(snapshot.history.len(), 1);
    }

    #[test]
    fn loading_and_error_never_both_set() {
        let session = Session::new("test".to_string());

        session.begin("Q1");
        let snapshot = session.snapshot();
        assert!(snapshot.loading && snapshot.error.is_none());

        session.fail("engine down");
        let snapshot = session.snapshot();
        assert!(!snapshot.loading && snapshot.error.is_some());

        session.begin("Q2");
        let snapshot = session.snapshot();
        assert!(snapshot.loading && snapshot.error.is_none());
    }

    #[test]
    fn store_creates_and_finds_sessions() {
        let store = SessionStore::new();
        assert!(store.is_empty());

        let session = store.create();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(session.id()).unwrap().id(), session.id());

        let recreated = store.get_or_create("stale-id");
        assert_eq!(recreated.id(), "stale-id");
        assert_eq!(store.len(), 2);
    }
}
