//! Store API endpoints

use api_types::store::{StoreNew, StoreUpdate, StoreView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

fn view(store: engine::Store) -> StoreView {
    StoreView {
        id: store.id,
        name: store.name,
        address: store.address,
        created_at: store.created_at.fixed_offset(),
        updated_at: store.updated_at.fixed_offset(),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<StoreNew>,
) -> Result<(StatusCode, Json<StoreView>), ServerError> {
    let store_id = state
        .engine
        .new_store(&payload.name, payload.address.as_deref(), &user.username)
        .await?;
    let store = state.engine.store(&store_id, &user.username).await?;

    Ok((StatusCode::CREATED, Json(view(store))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<StoreView>>, ServerError> {
    let stores = state.engine.stores(&user.username).await?;
    Ok(Json(stores.into_iter().map(view).collect()))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
) -> Result<Json<StoreView>, ServerError> {
    let store = state.engine.store(&store_id, &user.username).await?;
    Ok(Json(view(store)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
    Json(payload): Json<StoreUpdate>,
) -> Result<Json<StoreView>, ServerError> {
    let current = state.engine.store(&store_id, &user.username).await?;
    let name = payload.name.unwrap_or(current.name);
    let address = match payload.address {
        Some(address) => address,
        None => current.address,
    };

    let store = state
        .engine
        .update_store(&store_id, &user.username, &name, address.as_deref())
        .await?;
    Ok(Json(view(store)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_store(&store_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
