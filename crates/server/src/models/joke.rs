//! Joke model.

use serde::Serialize;

use nighthawk_core::JokeId;

/// A joke with like (`haha`) and dislike (`boohoo`) counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Joke {
    pub id: JokeId,
    pub joke: String,
    pub haha: i32,
    pub boohoo: i32,
}
