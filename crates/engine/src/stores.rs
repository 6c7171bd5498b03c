//! Stores (tenants).
//!
//! A store is the unit of tenancy: every item, group, contact and document
//! belongs to exactly one store, and every query is scoped by store id.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub(crate) fn new(name: String, address: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            address,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_items::Entity")]
    StockItems,
}

impl Related<super::stock_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Store> for ActiveModel {
    fn from(store: &Store) -> Self {
        Self {
            id: ActiveValue::Set(store.id.clone()),
            name: ActiveValue::Set(store.name.clone()),
            address: ActiveValue::Set(store.address.clone()),
            created_at: ActiveValue::Set(store.created_at),
            updated_at: ActiveValue::Set(store.updated_at),
        }
    }
}

impl From<Model> for Store {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
