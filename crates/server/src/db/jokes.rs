//! Joke repository for database operations.

use sqlx::PgPool;

use nighthawk_core::JokeId;

use super::RepositoryError;
use crate::models::Joke;

/// Which counter a reaction increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Like (`haha`).
    Haha,
    /// Dislike (`boohoo`).
    Boohoo,
}

/// Repository for joke database operations.
pub struct JokeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> JokeRepository<'a> {
    /// Create a new joke repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every joke, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Joke>, RepositoryError> {
        let jokes = sqlx::query_as::<_, Joke>("SELECT id, joke, haha, boohoo FROM joke ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(jokes)
    }

    /// Find jokes whose text matches ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_text_ignore_case(&self, text: &str) -> Result<Vec<Joke>, RepositoryError> {
        let jokes = sqlx::query_as::<_, Joke>(
            "SELECT id, joke, haha, boohoo FROM joke WHERE lower(joke) = lower($1) ORDER BY id",
        )
        .bind(text)
        .fetch_all(self.pool)
        .await?;

        Ok(jokes)
    }

    /// Insert a joke with both counters at zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the text already exists (ignoring case).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, text: &str) -> Result<Joke, RepositoryError> {
        sqlx::query_as::<_, Joke>(
            r"
            INSERT INTO joke (joke, haha, boohoo)
            VALUES ($1, 0, 0)
            RETURNING id, joke, haha, boohoo
            ",
        )
        .bind(text)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "joke"))
    }

    /// Atomically increment one counter and return the updated joke.
    ///
    /// Returns `None` if the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn react(&self, id: JokeId, reaction: Reaction) -> Result<Option<Joke>, RepositoryError> {
        let sql = match reaction {
            Reaction::Haha => {
                "UPDATE joke SET haha = haha + 1 WHERE id = $1 RETURNING id, joke, haha, boohoo"
            }
            Reaction::Boohoo => {
                "UPDATE joke SET boohoo = boohoo + 1 WHERE id = $1 RETURNING id, joke, haha, boohoo"
            }
        };

        let joke = sqlx::query_as::<_, Joke>(sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(joke)
    }
}
