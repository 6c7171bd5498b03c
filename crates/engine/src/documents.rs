//! Document primitives.
//!
//! A `Document` is a transactional record (sale, purchase or adjustment) that
//! moves stock. Its stock effect is applied atomically with the header and
//! line writes; cancellation applies the exact algebraic inverse.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

use super::document_items::DocumentItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Sale,
    Purchase,
    AdjustmentIn,
    AdjustmentOut,
}

/// Whether a document kind adds stock or removes it.
///
/// The same mapping is consumed by posting and cancellation, so that a
/// cancel is always the exact inverse of the original posting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockDirection {
    Inbound,
    Outbound,
}

impl StockDirection {
    /// Signed stock delta for a positive line quantity.
    pub fn signed(self, quantity: f64) -> f64 {
        match self {
            Self::Inbound => quantity,
            Self::Outbound => -quantity,
        }
    }
}

impl DocumentKind {
    pub fn direction(self) -> StockDirection {
        match self {
            Self::Purchase | Self::AdjustmentIn => StockDirection::Inbound,
            Self::Sale | Self::AdjustmentOut => StockDirection::Outbound,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::AdjustmentIn => "adjustment_in",
            Self::AdjustmentOut => "adjustment_out",
        }
    }
}

impl TryFrom<&str> for DocumentKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sale" => Ok(Self::Sale),
            "purchase" => Ok(Self::Purchase),
            "adjustment_in" => Ok(Self::AdjustmentIn),
            "adjustment_out" => Ok(Self::AdjustmentOut),
            other => Err(EngineError::Validation(format!(
                "invalid document kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Open,
    Cancelled,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for DocumentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "open" => Ok(Self::Open),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid document status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub store_id: String,
    pub kind: DocumentKind,
    pub document_date: chrono::NaiveDate,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub status: DocumentStatus,
    pub notes: Option<String>,
    /// Advisory total as entered by the caller; never recomputed from lines.
    pub total_amount: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<String>,
    pub lines: Vec<DocumentItem>,
}

impl Document {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        store_id: String,
        kind: DocumentKind,
        document_date: chrono::NaiveDate,
        customer_id: Option<Uuid>,
        supplier_id: Option<Uuid>,
        notes: Option<String>,
        total_amount: f64,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            store_id,
            kind,
            document_date,
            customer_id,
            supplier_id,
            status: DocumentStatus::Open,
            notes,
            total_amount,
            created_by,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
            cancelled_by: None,
            lines: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub store_id: String,
    pub kind: String,
    pub document_date: Date,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub total_amount: f64,
    pub created_by: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub cancelled_at: Option<DateTimeUtc>,
    pub cancelled_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::document_items::Entity")]
    DocumentItems,
}

impl Related<super::document_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Document> for ActiveModel {
    fn from(doc: &Document) -> Self {
        Self {
            id: ActiveValue::Set(doc.id.to_string()),
            store_id: ActiveValue::Set(doc.store_id.clone()),
            kind: ActiveValue::Set(doc.kind.as_str().to_string()),
            document_date: ActiveValue::Set(doc.document_date),
            customer_id: ActiveValue::Set(doc.customer_id.map(|id| id.to_string())),
            supplier_id: ActiveValue::Set(doc.supplier_id.map(|id| id.to_string())),
            status: ActiveValue::Set(doc.status.as_str().to_string()),
            notes: ActiveValue::Set(doc.notes.clone()),
            total_amount: ActiveValue::Set(doc.total_amount),
            created_by: ActiveValue::Set(doc.created_by.clone()),
            created_at: ActiveValue::Set(doc.created_at),
            updated_at: ActiveValue::Set(doc.updated_at),
            cancelled_at: ActiveValue::Set(doc.cancelled_at),
            cancelled_by: ActiveValue::Set(doc.cancelled_by.clone()),
        }
    }
}

impl TryFrom<Model> for Document {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("document not exists".to_string()))?,
            store_id: model.store_id,
            kind: DocumentKind::try_from(model.kind.as_str())?,
            document_date: model.document_date,
            customer_id: model.customer_id.and_then(|s| Uuid::parse_str(&s).ok()),
            supplier_id: model.supplier_id.and_then(|s| Uuid::parse_str(&s).ok()),
            status: DocumentStatus::try_from(model.status.as_str())?,
            notes: model.notes,
            total_amount: model.total_amount,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            cancelled_at: model.cancelled_at,
            cancelled_by: model.cancelled_by,
            lines: Vec::new(),
        })
    }
}
