//! Document line items.
//!
//! A [`DocumentItem`] is one entry within a [`Document`](crate::Document),
//! referencing a stock item and the quantity moved. The quantity is stored as
//! the positive magnitude entered by the user; the sign of the stock effect
//! is derived from the parent document's kind, never stored on the line.
//!
//! Lines are immutable after creation and survive cancellation for audit.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub id: Uuid,
    pub document_id: Uuid,
    pub item_id: Uuid,
    /// Position of the line within its document (input order).
    pub line_no: i32,
    /// Positive magnitude, may be fractional.
    pub quantity: f64,
    /// Unit price at transaction time.
    pub unit_price: f64,
}

impl DocumentItem {
    pub(crate) fn new(
        document_id: Uuid,
        item_id: Uuid,
        line_no: i32,
        quantity: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            item_id,
            line_no,
            quantity,
            unit_price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "document_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub document_id: String,
    pub item_id: String,
    pub line_no: i32,
    pub quantity: f64,
    pub unit_price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::documents::Entity",
        from = "Column::DocumentId",
        to = "super::documents::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Documents,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&DocumentItem> for ActiveModel {
    fn from(line: &DocumentItem) -> Self {
        Self {
            id: ActiveValue::Set(line.id.to_string()),
            document_id: ActiveValue::Set(line.document_id.to_string()),
            item_id: ActiveValue::Set(line.item_id.to_string()),
            line_no: ActiveValue::Set(line.line_no),
            quantity: ActiveValue::Set(line.quantity),
            unit_price: ActiveValue::Set(line.unit_price),
        }
    }
}

impl TryFrom<Model> for DocumentItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::Validation("invalid line id".to_string()))?,
            document_id: Uuid::parse_str(&model.document_id)
                .map_err(|_| EngineError::KeyNotFound("document not exists".to_string()))?,
            item_id: Uuid::parse_str(&model.item_id)
                .map_err(|_| EngineError::Validation("invalid line item id".to_string()))?,
            line_no: model.line_no,
            quantity: model.quantity,
            unit_price: model.unit_price,
        })
    }
}
