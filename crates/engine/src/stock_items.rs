//! Stock items.
//!
//! The `quantity` of a stock item is mutated only through the stock ledger's
//! delta application (see `ops::stock`), so every change is attributable to a
//! document. Direct edits cover name, group and the free-form property bag.
//!
//! Properties are persisted as a JSON text blob; a row whose blob fails to
//! decode is read back with an empty map instead of an error.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Uuid,
    pub store_id: String,
    pub group_id: Option<Uuid>,
    pub name: String,
    /// Signed running total; may be fractional and may go negative.
    pub quantity: f64,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub image_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    pub(crate) fn new(
        store_id: String,
        group_id: Option<Uuid>,
        name: String,
        quantity: f64,
        properties: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            store_id,
            group_id,
            name,
            quantity,
            properties,
            image_filename: None,
            created_at: now,
            updated_at: now,
        }
    }
}

pub(crate) fn encode_properties(
    properties: &serde_json::Map<String, serde_json::Value>,
) -> String {
    serde_json::to_string(properties).unwrap_or_else(|_| "{}".to_string())
}

/// Lossy-but-safe decode: a corrupt blob yields an empty map.
pub(crate) fn decode_properties(
    raw: Option<&str>,
) -> serde_json::Map<String, serde_json::Value> {
    raw.and_then(|text| serde_json::from_str(text).ok())
        .unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub store_id: String,
    pub group_id: Option<String>,
    pub name: String,
    pub quantity: f64,
    pub properties: Option<String>,
    pub image_filename: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stores::Entity",
        from = "Column::StoreId",
        to = "super::stores::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Stores,
}

impl Related<super::stores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&StockItem> for ActiveModel {
    fn from(item: &StockItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            store_id: ActiveValue::Set(item.store_id.clone()),
            group_id: ActiveValue::Set(item.group_id.map(|id| id.to_string())),
            name: ActiveValue::Set(item.name.clone()),
            quantity: ActiveValue::Set(item.quantity),
            properties: ActiveValue::Set(Some(encode_properties(&item.properties))),
            image_filename: ActiveValue::Set(item.image_filename.clone()),
            created_at: ActiveValue::Set(item.created_at),
            updated_at: ActiveValue::Set(item.updated_at),
        }
    }
}

impl TryFrom<Model> for StockItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("stock item not exists".to_string()))?,
            store_id: model.store_id,
            group_id: model.group_id.and_then(|s| Uuid::parse_str(&s).ok()),
            name: model.name,
            quantity: model.quantity,
            properties: decode_properties(model.properties.as_deref()),
            image_filename: model.image_filename,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_properties_decode_to_empty_map() {
        assert!(decode_properties(Some("not json")).is_empty());
        assert!(decode_properties(Some("[1,2]")).is_empty());
        assert!(decode_properties(None).is_empty());
    }

    #[test]
    fn properties_round_trip() {
        let mut map = serde_json::Map::new();
        map.insert("color".to_string(), serde_json::json!("red"));
        map.insert("size".to_string(), serde_json::json!(42));
        let decoded = decode_properties(Some(&encode_properties(&map)));
        assert_eq!(decoded, map);
    }
}
