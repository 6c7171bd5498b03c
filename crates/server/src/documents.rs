//! Document API endpoints

use api_types::document::{
    DocumentHeaderUpdate, DocumentKind as ApiKind, DocumentLineView, DocumentNew, DocumentStatus,
    DocumentView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: engine::DocumentKind) -> ApiKind {
    match kind {
        engine::DocumentKind::Sale => ApiKind::Sale,
        engine::DocumentKind::Purchase => ApiKind::Purchase,
        engine::DocumentKind::AdjustmentIn => ApiKind::AdjustmentIn,
        engine::DocumentKind::AdjustmentOut => ApiKind::AdjustmentOut,
    }
}

fn unmap_kind(kind: ApiKind) -> engine::DocumentKind {
    match kind {
        ApiKind::Sale => engine::DocumentKind::Sale,
        ApiKind::Purchase => engine::DocumentKind::Purchase,
        ApiKind::AdjustmentIn => engine::DocumentKind::AdjustmentIn,
        ApiKind::AdjustmentOut => engine::DocumentKind::AdjustmentOut,
    }
}

fn view(document: engine::Document) -> DocumentView {
    DocumentView {
        id: document.id,
        store_id: document.store_id,
        kind: map_kind(document.kind),
        document_date: document.document_date,
        customer_id: document.customer_id,
        supplier_id: document.supplier_id,
        status: match document.status {
            engine::DocumentStatus::Open => DocumentStatus::Open,
            engine::DocumentStatus::Cancelled => DocumentStatus::Cancelled,
        },
        notes: document.notes,
        total_amount: document.total_amount,
        created_by: document.created_by,
        created_at: document.created_at.fixed_offset(),
        updated_at: document.updated_at.fixed_offset(),
        cancelled_at: document.cancelled_at.map(|at| at.fixed_offset()),
        cancelled_by: document.cancelled_by,
        lines: document
            .lines
            .into_iter()
            .map(|line| DocumentLineView {
                id: line.id,
                item_id: line.item_id,
                line_no: line.line_no,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect(),
    }
}

pub async fn post_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
    Json(payload): Json<DocumentNew>,
) -> Result<(StatusCode, Json<DocumentView>), ServerError> {
    let mut cmd = engine::PostDocumentCmd::new(
        store_id,
        user.username,
        unmap_kind(payload.kind),
        payload.document_date,
    );
    cmd.customer_id = payload.customer_id;
    cmd.supplier_id = payload.supplier_id;
    cmd.notes = payload.notes;
    cmd.total_amount = payload.total_amount;
    for line in payload.lines {
        cmd = cmd.line(line.item_id, line.quantity, line.unit_price);
    }

    let document = state.engine.post_document(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(document))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<DocumentView>>, ServerError> {
    let documents = state.engine.documents(&store_id, &user.username).await?;
    Ok(Json(documents.into_iter().map(view).collect()))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, document_id)): Path<(String, Uuid)>,
) -> Result<Json<DocumentView>, ServerError> {
    let document = state
        .engine
        .document(&store_id, document_id, &user.username)
        .await?;
    Ok(Json(view(document)))
}

pub async fn update_header(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, document_id)): Path<(String, Uuid)>,
    Json(payload): Json<DocumentHeaderUpdate>,
) -> Result<Json<DocumentView>, ServerError> {
    let document = state
        .engine
        .update_document_header(
            &store_id,
            document_id,
            &user.username,
            engine::DocumentHeaderPatch {
                document_date: payload.document_date,
                customer_id: payload.customer_id,
                supplier_id: payload.supplier_id,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(view(document)))
}

pub async fn cancel(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((store_id, document_id)): Path<(String, Uuid)>,
) -> Result<Json<DocumentView>, ServerError> {
    let document = state
        .engine
        .cancel_document(&store_id, document_id, &user.username, Utc::now())
        .await?;
    Ok(Json(view(document)))
}
