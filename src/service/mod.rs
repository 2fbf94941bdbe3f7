use chrono::{DateTime, SubsecRound, Utc};

use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest, ValidationError},
    repository::{Repository, StorageError},
};

#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    #[error("Invalid note payload: {0}")]
    Validation(#[from] ValidationError),

    #[error("No fields provided to update")]
    EmptyUpdate,

    #[error("Note {0} not found")]
    NotFound(i64),

    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("Note {0} missing right after it was written")]
    Invariant(i64),

    #[error("Storage task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// CRUD operations over notes.
///
/// Holds no state besides the repository handle, which opens a fresh
/// connection per call, so concurrent requests only contend on SQLite's own locks.
#[derive(Debug, Clone)]
pub struct NoteService {
    repo: Repository,
}

impl NoteService {
    pub const fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, NoteServiceError> {
        let notes = self.blocking(|repo| repo.select_all()).await?;

        Ok(notes.into_iter().map(NoteResponse::from).collect())
    }

    pub async fn get_one_note(&self, id: i64) -> Result<NoteResponse, NoteServiceError> {
        self.blocking(move |repo| repo.select_one(id))
            .await?
            .map(NoteResponse::from)
            .ok_or(NoteServiceError::NotFound(id))
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        request.validate()?;

        let now = now();
        let (id, note) = self
            .blocking(move |repo| {
                let id = repo.insert(&request.title, &request.content, now)?;
                Ok((id, repo.select_one(id)?))
            })
            .await?;

        let note = note.ok_or(NoteServiceError::Invariant(id))?;
        tracing::info!("Created note {}", note.id);

        Ok(note.into())
    }

    /// Applies a partial update.
    ///
    /// Field rules are checked first, then existence, then that at least one
    /// field is present, so a missing id always yields `NotFound`.
    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        request.validate()?;

        let existing = self
            .blocking(move |repo| repo.select_one(id))
            .await?
            .ok_or(NoteServiceError::NotFound(id))?;

        if request.is_empty() {
            return Err(NoteServiceError::EmptyUpdate);
        }

        let title = request.title.unwrap_or(existing.title);
        let content = request.content.unwrap_or(existing.content);
        let now = now();

        let note = self
            .blocking(move |repo| {
                repo.update(id, &title, &content, now)?;
                repo.select_one(id)
            })
            .await?
            .ok_or(NoteServiceError::Invariant(id))?;

        tracing::info!("Updated note {}", note.id);

        Ok(note.into())
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), NoteServiceError> {
        self.blocking(move |repo| repo.select_one(id))
            .await?
            .ok_or(NoteServiceError::NotFound(id))?;

        self.blocking(move |repo| repo.delete(id)).await?;
        tracing::info!("Deleted note {}", id);

        Ok(())
    }

    /// Runs a repository call on the blocking pool; rusqlite is synchronous.
    async fn blocking<T, F>(&self, f: F) -> Result<T, NoteServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&Repository) -> Result<T, StorageError> + Send + 'static,
    {
        let repo = self.repo.clone();

        Ok(tokio::task::spawn_blocking(move || f(&repo)).await??)
    }
}

/// Current time truncated to whole seconds, the precision timestamps are stored with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
