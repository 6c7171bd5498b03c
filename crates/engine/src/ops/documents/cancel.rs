use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Document, DocumentStatus, EngineError, ResultEngine, documents};

use super::super::{Engine, with_tx};

impl Engine {
    /// Cancel a document, reversing its stock effects.
    ///
    /// For every line the inverse of the original delta is applied, derived
    /// from the document's own kind (which never changes after creation), so
    /// cancel(post(d)) restores every affected quantity exactly. The status
    /// flips to cancelled; lines are kept for audit. The already-cancelled
    /// guard and the reversal run inside one transaction, so a concurrent
    /// second cancel cannot double-revert.
    pub async fn cancel_document(
        &self,
        store_id: &str,
        document_id: Uuid,
        user_id: &str,
        cancelled_at: DateTime<Utc>,
    ) -> ResultEngine<Document> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let model = self
                .find_document_in_store(&db_tx, store_id, document_id)
                .await?;
            let document = Document::try_from(model)?;
            if document.status == DocumentStatus::Cancelled {
                return Err(EngineError::AlreadyCancelled(document_id.to_string()));
            }

            let lines = self.load_lines(&db_tx, document_id).await?;
            let direction = document.kind.direction();
            for line in &lines {
                self.apply_stock_delta(
                    &db_tx,
                    store_id,
                    line.item_id,
                    -direction.signed(line.quantity),
                )
                .await?;
            }

            let update = documents::ActiveModel {
                id: ActiveValue::Set(document_id.to_string()),
                status: ActiveValue::Set(DocumentStatus::Cancelled.as_str().to_string()),
                cancelled_at: ActiveValue::Set(Some(cancelled_at)),
                cancelled_by: ActiveValue::Set(Some(user_id.to_string())),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            update.update(&db_tx).await?;

            tracing::debug!(
                store_id = %store_id,
                document_id = %document_id,
                lines = lines.len(),
                "cancelled document"
            );

            self.load_document_with_lines(&db_tx, store_id, document_id)
                .await
        })
    }
}
