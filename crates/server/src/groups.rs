//! Item-group API endpoints

use api_types::group::{GroupNew, GroupUpdate, GroupView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(group: engine::ItemGroup) -> GroupView {
    GroupView {
        id: group.id,
        name: group.name,
        parent_group_id: group.parent_group_id,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let group = state
        .engine
        .new_group(
            &store_id,
            &user.username,
            engine::GroupNew {
                name: payload.name,
                parent_group_id: payload.parent_group_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view(group))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<GroupView>>, ServerError> {
    let groups = state.engine.groups(&store_id, &user.username).await?;
    Ok(Json(groups.into_iter().map(view).collect()))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, group_id)): Path<(String, Uuid)>,
    Json(payload): Json<GroupUpdate>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state
        .engine
        .update_group(
            &store_id,
            group_id,
            &user.username,
            engine::GroupUpdate {
                name: payload.name,
                parent_group_id: payload.parent_group_id,
            },
        )
        .await?;
    Ok(Json(view(group)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, group_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_group(&store_id, group_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
