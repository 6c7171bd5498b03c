//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::DocumentKind;

/// One line of a document to be posted.
#[derive(Clone, Debug)]
pub struct NewDocumentLine {
    pub item_id: Uuid,
    /// Positive magnitude; the sign of the stock effect comes from the
    /// document kind.
    pub quantity: f64,
    pub unit_price: Option<f64>,
}

/// Post a new document: header, lines and stock deltas in one transaction.
#[derive(Clone, Debug)]
pub struct PostDocumentCmd {
    pub store_id: String,
    pub user_id: String,
    pub kind: DocumentKind,
    pub document_date: NaiveDate,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub notes: Option<String>,
    pub total_amount: Option<f64>,
    pub lines: Vec<NewDocumentLine>,
}

impl PostDocumentCmd {
    #[must_use]
    pub fn new(
        store_id: impl Into<String>,
        user_id: impl Into<String>,
        kind: DocumentKind,
        document_date: NaiveDate,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            user_id: user_id.into(),
            kind,
            document_date,
            customer_id: None,
            supplier_id: None,
            notes: None,
            total_amount: None,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn customer(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn supplier(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn total_amount(mut self, total_amount: f64) -> Self {
        self.total_amount = Some(total_amount);
        self
    }

    #[must_use]
    pub fn line(mut self, item_id: Uuid, quantity: f64, unit_price: Option<f64>) -> Self {
        self.lines.push(NewDocumentLine {
            item_id,
            quantity,
            unit_price,
        });
        self
    }
}

/// Partial header update. `None` keeps the previous value; for the nullable
/// references `Some(None)` clears them explicitly.
#[derive(Clone, Debug, Default)]
pub struct DocumentHeaderPatch {
    pub document_date: Option<NaiveDate>,
    pub customer_id: Option<Option<Uuid>>,
    pub supplier_id: Option<Option<Uuid>>,
    pub notes: Option<String>,
}

/// Create a stock item.
#[derive(Clone, Debug)]
pub struct StockItemNew {
    pub name: String,
    pub quantity: f64,
    pub group_id: Option<Uuid>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl StockItemNew {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 0.0,
            group_id: None,
            properties: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn group(mut self, group_id: Uuid) -> Self {
        self.group_id = Some(group_id);
        self
    }

    #[must_use]
    pub fn properties(mut self, properties: serde_json::Map<String, serde_json::Value>) -> Self {
        self.properties = properties;
        self
    }
}

/// Partial stock-item update. Quantity is deliberately absent: it only moves
/// through document posting and cancellation.
#[derive(Clone, Debug, Default)]
pub struct StockItemPatch {
    pub name: Option<String>,
    pub group_id: Option<Option<Uuid>>,
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Create a customer or supplier.
#[derive(Clone, Debug)]
pub struct ContactNew {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ContactNew {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        }
    }
}

/// Partial contact update.
#[derive(Clone, Debug, Default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

/// Create an item group.
#[derive(Clone, Debug)]
pub struct GroupNew {
    pub name: String,
    pub parent_group_id: Option<Uuid>,
}

/// Partial item-group update.
#[derive(Clone, Debug, Default)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub parent_group_id: Option<Option<Uuid>>,
}
