use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Document, DocumentHeaderPatch, ResultEngine, documents};

use super::super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Partial update of a document header.
    ///
    /// Only date, customer, supplier and notes are reachable through this
    /// path; kind, lines and status require posting or cancellation. Omitted
    /// fields keep their previous value; the nullable references can be
    /// cleared explicitly with `Some(None)`.
    pub async fn update_document_header(
        &self,
        store_id: &str,
        document_id: Uuid,
        user_id: &str,
        patch: DocumentHeaderPatch,
    ) -> ResultEngine<Document> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let existing = self
                .find_document_in_store(&db_tx, store_id, document_id)
                .await?;

            let document_date = patch.document_date.unwrap_or(existing.document_date);
            let customer_id = match patch.customer_id {
                Some(value) => value.map(|id| id.to_string()),
                None => existing.customer_id.clone(),
            };
            let supplier_id = match patch.supplier_id {
                Some(value) => value.map(|id| id.to_string()),
                None => existing.supplier_id.clone(),
            };
            let notes = match patch.notes {
                Some(notes) => normalize_optional_text(Some(&notes)),
                None => existing.notes.clone(),
            };

            let update = documents::ActiveModel {
                id: ActiveValue::Set(document_id.to_string()),
                document_date: ActiveValue::Set(document_date),
                customer_id: ActiveValue::Set(customer_id),
                supplier_id: ActiveValue::Set(supplier_id),
                notes: ActiveValue::Set(notes),
                updated_at: ActiveValue::Set(chrono::Utc::now()),
                ..Default::default()
            };
            update.update(&db_tx).await?;

            self.load_document_with_lines(&db_tx, store_id, document_id)
                .await
        })
    }
}
