//! Session state and history management.
//!
//! This module provides the in-memory state controller for one client
//! session (current query, loading flag, error, append-only history) and a
//! thread-safe store mapping session ids to sessions.
//!
//! # Architecture
//!
//! - [`Session`]: state machine for a single session
//! - [`SessionStore`]: thread-safe store for all active sessions
//!
//! # Example
//!
//! ```rust
//! use nexus_qa::session::{SessionStore, Submission};
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! assert!(matches!(session.begin("What is Rust?"), Submission::Started(_)));
//! ```

mod state;

pub use state::{
    CurrentQuery, HistoryItem, Phase, Session, SessionSnapshot, SessionStore, Submission,
};
