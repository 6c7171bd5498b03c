use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod contacts;
mod documents;
mod groups;
mod memberships;
mod server;
mod stock;
mod stores;
mod user;

pub mod types {
    pub mod store {
        pub use api_types::store::{StoreNew, StoreUpdate, StoreView};
    }

    pub mod membership {
        pub use api_types::membership::{MemberUpsert, MemberView, MembersResponse, StoreRole};
    }

    pub mod group {
        pub use api_types::group::{GroupNew, GroupUpdate, GroupView};
    }

    pub mod stock {
        pub use api_types::stock::{
            ItemImageResponse, ItemImageSet, StockItemNew, StockItemUpdate, StockItemView,
            StockItemsQuery,
        };
    }

    pub mod contact {
        pub use api_types::contact::{ContactNew, ContactUpdate, ContactView};
    }

    pub mod document {
        pub use api_types::document::{
            DocumentHeaderUpdate, DocumentKind, DocumentLineNew, DocumentLineView, DocumentNew,
            DocumentStatus, DocumentView,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::AlreadyCancelled(_) | EngineError::ReferencedByDocuments(_) => {
            StatusCode::CONFLICT
        }
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
