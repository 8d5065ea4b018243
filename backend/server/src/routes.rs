use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    database::StoreError,
    error::AppError,
    state::AppState,
    user::{self, User},
    utils::{Payload, take_count},
};

type Shared = State<Arc<AppState>>;

fn success() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

fn success_with<T: Into<Value>>(id: T) -> Json<Value> {
    Json(json!({ "status": "success", "id": id.into() }))
}

/// Stored users, seeding the store from the remote source when it is missing.
pub async fn list_users(State(state): Shared) -> Result<Json<Vec<User>>, AppError> {
    let _guard = state.store.lock().await;

    match state.store.load().await {
        Ok(users) => return Ok(Json(users)),
        Err(StoreError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    info!("User file missing, seeding from remote source");

    let users = state.seed.fetch_users().await?;
    state.store.replace(&users).await?;

    info!("Seeded {} users", users.len());

    Ok(Json(users))
}

/// First `number` users of the remote source, the store is not touched.
pub async fn take_users(
    State(state): Shared,
    Path(number): Path<String>,
) -> Result<Json<Vec<User>>, AppError> {
    let mut users = state.seed.fetch_users().await?;
    users.truncate(take_count(&number, users.len()));

    debug!("Took {} remote users for {number:?}", users.len());

    Ok(Json(users))
}

pub async fn create_user(
    State(state): Shared,
    Payload(body): Payload,
) -> Result<Json<Value>, AppError> {
    let _guard = state.store.lock().await;

    let mut users = state.store.load().await?;
    let id = user::next_id(&users)?;

    users.push(user::with_id(body, id));
    state.store.replace(&users).await?;

    info!("Created user {id}, {} stored", users.len());

    Ok(success_with(id))
}

/// Succeeds even when no user matches.
pub async fn update_user(
    State(state): Shared,
    Path(user_id): Path<String>,
    Payload(changes): Payload,
) -> Result<Json<Value>, AppError> {
    let _guard = state.store.lock().await;

    let users = user::update(state.store.load().await?, &user_id, &changes);
    state.store.replace(&users).await?;

    info!("Updated user {user_id}");

    Ok(success_with(user_id))
}

/// Succeeds even when no user matches.
pub async fn delete_user(
    State(state): Shared,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let _guard = state.store.lock().await;

    let users = user::without(state.store.load().await?, &user_id);
    state.store.replace(&users).await?;

    info!("Deleted user {user_id}, {} stored", users.len());

    Ok(success_with(user_id))
}

/// Drops the store file. Listing afterwards seeds it again.
pub async fn delete_users(State(state): Shared) -> Result<Json<Value>, AppError> {
    let _guard = state.store.lock().await;

    match state.store.remove().await {
        Ok(()) => info!("Removed user file"),
        Err(StoreError::NotFound(_)) => debug!("User file already absent"),
        Err(e) => return Err(e.into()),
    }

    Ok(success())
}

/// The matching user, or `null`.
pub async fn get_user(
    State(state): Shared,
    Path(user_id): Path<String>,
) -> Result<Json<Option<User>>, AppError> {
    let _guard = state.store.lock().await;

    let users = state.store.load().await?;

    Ok(Json(user::find(users, &user_id)))
}
