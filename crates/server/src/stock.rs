//! Stock item API endpoints

use api_types::stock::{
    ItemDeleteResponse, ItemImageResponse, ItemImageSet, StockItemNew, StockItemUpdate,
    StockItemView, StockItemsQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(item: engine::StockItem) -> StockItemView {
    StockItemView {
        id: item.id,
        store_id: item.store_id,
        group_id: item.group_id,
        name: item.name,
        quantity: item.quantity,
        properties: item.properties,
        image_filename: item.image_filename,
        created_at: item.created_at.fixed_offset(),
        updated_at: item.updated_at.fixed_offset(),
    }
}

fn scope_from_query(query: &StockItemsQuery) -> Result<engine::GroupScope, ServerError> {
    match query.group.as_deref() {
        None => Ok(engine::GroupScope::All),
        Some("none") => Ok(engine::GroupScope::Ungrouped),
        Some(raw) => raw
            .parse::<Uuid>()
            .map(engine::GroupScope::In)
            .map_err(|_| ServerError::Generic("invalid group filter".to_string())),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
    Json(payload): Json<StockItemNew>,
) -> Result<(StatusCode, Json<StockItemView>), ServerError> {
    let mut cmd = engine::StockItemNew::new(payload.name)
        .quantity(payload.quantity.unwrap_or(0.0))
        .properties(payload.properties.unwrap_or_default());
    if let Some(group_id) = payload.group_id {
        cmd = cmd.group(group_id);
    }

    let item = state
        .engine
        .new_stock_item(&store_id, &user.username, cmd)
        .await?;
    Ok((StatusCode::CREATED, Json(view(item))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
    Query(query): Query<StockItemsQuery>,
) -> Result<Json<Vec<StockItemView>>, ServerError> {
    let scope = scope_from_query(&query)?;
    let items = state
        .engine
        .stock_items(&store_id, &user.username, scope)
        .await?;
    Ok(Json(items.into_iter().map(view).collect()))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, item_id)): Path<(String, Uuid)>,
) -> Result<Json<StockItemView>, ServerError> {
    let item = state
        .engine
        .stock_item(&store_id, item_id, &user.username)
        .await?;
    Ok(Json(view(item)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, item_id)): Path<(String, Uuid)>,
    Json(payload): Json<StockItemUpdate>,
) -> Result<Json<StockItemView>, ServerError> {
    let item = state
        .engine
        .update_stock_item(
            &store_id,
            item_id,
            &user.username,
            engine::StockItemPatch {
                name: payload.name,
                group_id: payload.group_id,
                properties: payload.properties,
            },
        )
        .await?;
    Ok(Json(view(item)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, item_id)): Path<(String, Uuid)>,
) -> Result<Json<ItemDeleteResponse>, ServerError> {
    let released_image = state
        .engine
        .delete_stock_item(&store_id, item_id, &user.username)
        .await?;
    Ok(Json(ItemDeleteResponse { released_image }))
}

pub async fn set_image(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, item_id)): Path<(String, Uuid)>,
    Json(payload): Json<ItemImageSet>,
) -> Result<Json<ItemImageResponse>, ServerError> {
    let (item, replaced) = state
        .engine
        .set_stock_item_image(&store_id, item_id, &user.username, &payload.filename)
        .await?;
    Ok(Json(ItemImageResponse {
        item: view(item),
        replaced,
    }))
}
