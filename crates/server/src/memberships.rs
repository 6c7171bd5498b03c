//! Membership management endpoints (owner-only for writes).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::membership::{MemberUpsert, MemberView, MembersResponse, StoreRole};

use crate::{ServerError, server::ServerState, user};

fn map_role(role: engine::StoreRole) -> StoreRole {
    match role {
        engine::StoreRole::Owner => StoreRole::Owner,
        engine::StoreRole::Manager => StoreRole::Manager,
        engine::StoreRole::Staff => StoreRole::Staff,
    }
}

fn unmap_role(role: StoreRole) -> engine::StoreRole {
    match role {
        StoreRole::Owner => engine::StoreRole::Owner,
        StoreRole::Manager => engine::StoreRole::Manager,
        StoreRole::Staff => engine::StoreRole::Staff,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .engine
        .store_members(&store_id, &user.username)
        .await?
        .into_iter()
        .map(|(username, role)| MemberView {
            username,
            role: map_role(role),
        })
        .collect();

    Ok(Json(MembersResponse { members }))
}

pub async fn upsert(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
    Json(payload): Json<MemberUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .upsert_store_member(
            &store_id,
            &user.username,
            &payload.username,
            unmap_role(payload.role),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, username)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_store_member(&store_id, &user.username, &username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
