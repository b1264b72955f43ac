//! Core data structures for the svgnotes application.
//!
//! This module contains the primary types used throughout the application,
//! including the Note structure.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for the note, assigned by the store
    pub id: u64,
    /// Note title
    pub title: String,
    /// Note content as plain text
    pub content: String,
    /// When the note was created
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note with the given id, title and content, stamped now.
    pub fn new(id: u64, title: String, content: String) -> Self {
        Note {
            id,
            title,
            content,
            created_at: Utc::now(),
        }
    }
}
