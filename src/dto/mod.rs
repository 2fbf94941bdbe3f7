use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Note;

pub const TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// ISO-8601 UTC timestamp when created
    pub created_at: DateTime<Utc>,
    /// ISO-8601 UTC timestamp when last updated
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note title, 1 to 200 characters
    pub title: String,
    /// Note content, at least 1 character
    pub content: String,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// Updated note title, 1 to 200 characters
    #[serde(default)]
    pub title: Option<String>,
    /// Updated note content, at least 1 character
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub message: String,
}

/// Body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must be between 1 and 200 characters, got {0}")]
    TitleLength(usize),

    #[error("content must not be empty")]
    EmptyContent,
}

impl CreateNoteRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

impl UpdateNoteRequest {
    /// Checks the rules of the fields that are present. An empty update is valid here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }

        Ok(())
    }

    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if (1..=TITLE_MAX_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::TitleLength(len))
    }
}

fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.is_empty() {
        Err(ValidationError::EmptyContent)
    } else {
        Ok(())
    }
}
