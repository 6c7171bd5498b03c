//! Customer and supplier API endpoints.
//!
//! The two resources share the same shape; the handlers are generated once
//! and bound to the matching engine methods.

use api_types::contact::{ContactNew, ContactUpdate, ContactView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(contact: engine::Contact) -> ContactView {
    ContactView {
        id: contact.id,
        store_id: contact.store_id,
        name: contact.name,
        email: contact.email,
        phone: contact.phone,
        address: contact.address,
        notes: contact.notes,
        created_at: contact.created_at.fixed_offset(),
        updated_at: contact.updated_at.fixed_offset(),
    }
}

macro_rules! contact_handlers {
    ($create:ident, $list:ident, $get:ident, $update:ident, $remove:ident,
     $engine_new:ident, $engine_list:ident, $engine_get:ident,
     $engine_update:ident, $engine_delete:ident) => {
        pub async fn $create(
            Extension(user): Extension<user::Model>,
            State(state): State<ServerState>,
            Path(store_id): Path<String>,
            Json(payload): Json<ContactNew>,
        ) -> Result<(StatusCode, Json<ContactView>), ServerError> {
            let mut cmd = engine::ContactNew::new(payload.name);
            cmd.email = payload.email;
            cmd.phone = payload.phone;
            cmd.address = payload.address;
            cmd.notes = payload.notes;

            let contact = state
                .engine
                .$engine_new(&store_id, &user.username, cmd)
                .await?;
            Ok((StatusCode::CREATED, Json(view(contact))))
        }

        pub async fn $list(
            Extension(user): Extension<user::Model>,
            State(state): State<ServerState>,
            Path(store_id): Path<String>,
        ) -> Result<Json<Vec<ContactView>>, ServerError> {
            let contacts = state.engine.$engine_list(&store_id, &user.username).await?;
            Ok(Json(contacts.into_iter().map(view).collect()))
        }

        pub async fn $get(
            Extension(user): Extension<user::Model>,
            State(state): State<ServerState>,
            Path((store_id, contact_id)): Path<(String, Uuid)>,
        ) -> Result<Json<ContactView>, ServerError> {
            let contact = state
                .engine
                .$engine_get(&store_id, contact_id, &user.username)
                .await?;
            Ok(Json(view(contact)))
        }

        pub async fn $update(
            Extension(user): Extension<user::Model>,
            State(state): State<ServerState>,
            Path((store_id, contact_id)): Path<(String, Uuid)>,
            Json(payload): Json<ContactUpdate>,
        ) -> Result<Json<ContactView>, ServerError> {
            let contact = state
                .engine
                .$engine_update(
                    &store_id,
                    contact_id,
                    &user.username,
                    engine::ContactUpdate {
                        name: payload.name,
                        email: payload.email,
                        phone: payload.phone,
                        address: payload.address,
                        notes: payload.notes,
                    },
                )
                .await?;
            Ok(Json(view(contact)))
        }

        pub async fn $remove(
            Extension(user): Extension<user::Model>,
            State(state): State<ServerState>,
            Path((store_id, contact_id)): Path<(String, Uuid)>,
        ) -> Result<StatusCode, ServerError> {
            state
                .engine
                .$engine_delete(&store_id, contact_id, &user.username)
                .await?;
            Ok(StatusCode::NO_CONTENT)
        }
    };
}

contact_handlers!(
    customer_create,
    customer_list,
    customer_get,
    customer_update,
    customer_remove,
    new_customer,
    customers,
    customer,
    update_customer,
    delete_customer
);

contact_handlers!(
    supplier_create,
    supplier_list,
    supplier_get,
    supplier_update,
    supplier_remove,
    new_supplier,
    suppliers,
    supplier,
    update_supplier,
    delete_supplier
);
