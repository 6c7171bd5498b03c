//! Shared contact shape for customers and suppliers.
//!
//! Customers and suppliers live in separate tables but carry the same
//! attributes; the conversions are generated once for both entity modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub store_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub(crate) fn new(store_id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            store_id,
            name,
            email: None,
            phone: None,
            address: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Generates `Contact` conversions for a contact-shaped entity module.
macro_rules! impl_contact_conversions {
    ($module:ident, $err_msg:literal) => {
        impl From<&Contact> for crate::$module::ActiveModel {
            fn from(contact: &Contact) -> Self {
                use sea_orm::ActiveValue;
                Self {
                    id: ActiveValue::Set(contact.id.to_string()),
                    store_id: ActiveValue::Set(contact.store_id.clone()),
                    name: ActiveValue::Set(contact.name.clone()),
                    email: ActiveValue::Set(contact.email.clone()),
                    phone: ActiveValue::Set(contact.phone.clone()),
                    address: ActiveValue::Set(contact.address.clone()),
                    notes: ActiveValue::Set(contact.notes.clone()),
                    created_at: ActiveValue::Set(contact.created_at),
                    updated_at: ActiveValue::Set(contact.updated_at),
                }
            }
        }

        impl TryFrom<crate::$module::Model> for Contact {
            type Error = crate::EngineError;

            fn try_from(model: crate::$module::Model) -> Result<Self, Self::Error> {
                Ok(Self {
                    id: uuid::Uuid::parse_str(&model.id).map_err(|_| {
                        crate::EngineError::KeyNotFound($err_msg.to_string())
                    })?,
                    store_id: model.store_id,
                    name: model.name,
                    email: model.email,
                    phone: model.phone,
                    address: model.address,
                    notes: model.notes,
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                })
            }
        }
    };
}

impl_contact_conversions!(customers, "customer not exists");
impl_contact_conversions!(suppliers, "supplier not exists");
