//! Note records supplied by the notes store
//!
//! The search engine only ever reads these; it never mutates or persists them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage format of a note body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteFormat {
    #[default]
    Markdown,
    Plain,
    Html,
}

/// A note as handed over by the notes store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub format: NoteFormat,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Create a plain markdown note with just an id and body
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            title: None,
            nickname: None,
            format: NoteFormat::default(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Text shown as the note's heading: the nickname when set, else the title
    pub fn display_title(&self) -> Option<&str> {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.title.as_deref())
    }
}
