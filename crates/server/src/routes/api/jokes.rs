//! Joke API routes.

use axum::{
    Json,
    extract::{Path, State},
};

use nighthawk_core::JokeId;

use crate::db::Reaction;
use crate::error::{AppError, Result};
use crate::models::Joke;
use crate::state::AppState;

/// List every joke.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Joke>>> {
    Ok(Json(state.jokes().list().await?))
}

/// Increment a joke's `haha` counter.
pub async fn like(State(state): State<AppState>, Path(id): Path<JokeId>) -> Result<Json<Joke>> {
    react(&state, id, Reaction::Haha).await
}

/// Increment a joke's `boohoo` counter.
pub async fn jeer(State(state): State<AppState>, Path(id): Path<JokeId>) -> Result<Json<Joke>> {
    react(&state, id, Reaction::Boohoo).await
}

async fn react(state: &AppState, id: JokeId, reaction: Reaction) -> Result<Json<Joke>> {
    state
        .jokes()
        .react(id, reaction)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::BadRequest(format!("joke {id} not found")))
}
