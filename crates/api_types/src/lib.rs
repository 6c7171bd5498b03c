use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserializes a field that distinguishes "absent" from "explicitly null".
///
/// Plain `Option<Option<T>>` collapses both cases to `None` under serde's
/// defaults. Combined with `#[serde(default)]`, this helper keeps an omitted
/// field as `None` and maps a JSON `null` to `Some(None)`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

pub mod store {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreNew {
        pub name: String,
        pub address: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "double_option")]
        pub address: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreView {
        pub id: String,
        pub name: String,
        pub address: Option<String>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }
}

pub mod membership {
    use super::*;

    /// Role of a user in a store.
    ///
    /// - `owner`: full access, can manage members and delete the store.
    /// - `manager`: reads and writes store data.
    /// - `staff`: reads and writes store data.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum StoreRole {
        Owner,
        Manager,
        Staff,
    }

    /// Request body for adding/updating a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberUpsert {
        pub username: String,
        pub role: StoreRole,
    }

    /// Response body for listing members.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }

    /// A member with their role.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub username: String,
        pub role: StoreRole,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub parent_group_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "double_option")]
        pub parent_group_id: Option<Option<Uuid>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub name: String,
        pub parent_group_id: Option<Uuid>,
    }
}

pub mod stock {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockItemNew {
        pub name: String,
        pub group_id: Option<Uuid>,
        /// Opening quantity, defaults to zero.
        pub quantity: Option<f64>,
        /// Free-form item attributes (color, size, barcode, ...).
        pub properties: Option<serde_json::Map<String, serde_json::Value>>,
    }

    /// Partial update of a stock item. Quantity is not editable here;
    /// it only moves through posted documents.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockItemUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "double_option")]
        pub group_id: Option<Option<Uuid>>,
        pub properties: Option<serde_json::Map<String, serde_json::Value>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockItemView {
        pub id: Uuid,
        pub store_id: String,
        pub group_id: Option<Uuid>,
        pub name: String,
        pub quantity: f64,
        pub properties: serde_json::Map<String, serde_json::Value>,
        pub image_filename: Option<String>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }

    /// Query string for listing stock items.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StockItemsQuery {
        /// Filter by group: a group id, or `none` for ungrouped items.
        pub group: Option<String>,
    }

    /// Records the filename of an uploaded item image. The file itself is
    /// stored outside this API.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemImageSet {
        pub filename: String,
    }

    /// Response to an image update: the updated item plus the filename that
    /// was replaced, if any, so the caller can drop the old asset.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemImageResponse {
        pub item: StockItemView,
        pub replaced: Option<String>,
    }

    /// Response to an item delete: the image filename the item was holding,
    /// if any.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemDeleteResponse {
        pub released_image: Option<String>,
    }
}

pub mod contact {
    use super::*;

    /// Request body shared by customers and suppliers.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContactNew {
        pub name: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ContactUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "double_option")]
        pub email: Option<Option<String>>,
        #[serde(default, deserialize_with = "double_option")]
        pub phone: Option<Option<String>>,
        #[serde(default, deserialize_with = "double_option")]
        pub address: Option<Option<String>>,
        #[serde(default, deserialize_with = "double_option")]
        pub notes: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContactView {
        pub id: Uuid,
        pub store_id: String,
        pub name: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
        pub notes: Option<String>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }
}

pub mod document {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DocumentKind {
        Sale,
        Purchase,
        AdjustmentIn,
        AdjustmentOut,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DocumentStatus {
        Open,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentLineNew {
        pub item_id: Uuid,
        pub quantity: f64,
        pub unit_price: Option<f64>,
    }

    /// Request body for posting a document with its lines.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentNew {
        pub kind: DocumentKind,
        pub document_date: NaiveDate,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub notes: Option<String>,
        pub total_amount: Option<f64>,
        pub lines: Vec<DocumentLineNew>,
    }

    /// Partial update of a document header. Lines and kind are immutable
    /// once the document is posted.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DocumentHeaderUpdate {
        pub document_date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "double_option")]
        pub customer_id: Option<Option<Uuid>>,
        #[serde(default, deserialize_with = "double_option")]
        pub supplier_id: Option<Option<Uuid>>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentLineView {
        pub id: Uuid,
        pub item_id: Uuid,
        pub line_no: i32,
        pub quantity: f64,
        pub unit_price: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentView {
        pub id: Uuid,
        pub store_id: String,
        pub kind: DocumentKind,
        pub document_date: NaiveDate,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub status: DocumentStatus,
        pub notes: Option<String>,
        pub total_amount: f64,
        pub created_by: String,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
        pub cancelled_at: Option<DateTime<FixedOffset>>,
        pub cancelled_by: Option<String>,
        pub lines: Vec<DocumentLineView>,
    }
}

#[cfg(test)]
mod tests {
    use super::contact::ContactUpdate;
    use super::document::DocumentHeaderUpdate;

    #[test]
    fn omitted_field_stays_unset() {
        let patch: ContactUpdate = serde_json::from_str(r#"{"name":"Rossi"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Rossi"));
        assert_eq!(patch.email, None);
    }

    #[test]
    fn explicit_null_clears_field() {
        let patch: ContactUpdate = serde_json::from_str(r#"{"email":null}"#).unwrap();
        assert_eq!(patch.email, Some(None));
    }

    #[test]
    fn header_update_distinguishes_null_customer() {
        let patch: DocumentHeaderUpdate =
            serde_json::from_str(r#"{"customer_id":null,"notes":"corrected"}"#).unwrap();
        assert_eq!(patch.customer_id, Some(None));
        assert_eq!(patch.supplier_id, None);
        assert_eq!(patch.notes.as_deref(), Some("corrected"));
    }
}
