//! Joke service.

use sqlx::PgPool;

use nighthawk_core::JokeId;

use crate::db::{JokeRepository, Reaction, RepositoryError};
use crate::models::Joke;

/// Joke service.
pub struct JokeService<'a> {
    jokes: JokeRepository<'a>,
}

impl<'a> JokeService<'a> {
    /// Create a new joke service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            jokes: JokeRepository::new(pool),
        }
    }

    /// Every joke.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Joke>, RepositoryError> {
        self.jokes.find_all().await
    }

    /// Record a reaction. Returns `None` if the joke does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn react(&self, id: JokeId, reaction: Reaction) -> Result<Option<Joke>, RepositoryError> {
        self.jokes.react(id, reaction).await
    }

    /// Insert `text` unless a joke with the same text exists, ignoring case.
    ///
    /// Returns `true` if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_if_absent(&self, text: &str) -> Result<bool, RepositoryError> {
        if !self.jokes.find_by_text_ignore_case(text).await?.is_empty() {
            return Ok(false);
        }

        match self.jokes.insert(text).await {
            Ok(_) => Ok(true),
            // Lost a race with a concurrent insert of the same text.
            Err(RepositoryError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
