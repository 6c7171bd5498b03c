use sea_orm::{TransactionTrait, prelude::*};

use crate::{
    Document, DocumentItem, EngineError, PostDocumentCmd, ResultEngine, document_items, documents,
};

use super::super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Post a document: header, lines and stock deltas as one atomic unit.
    ///
    /// Lines are written in input order; each line applies its signed delta
    /// (inbound kinds add, outbound kinds subtract) through the stock ledger.
    /// Any failure aborts the whole unit of work: no header, no lines and no
    /// stock change survive. On success the document is re-read inside the
    /// same transaction so the caller sees exactly what was persisted.
    pub async fn post_document(&self, cmd: PostDocumentCmd) -> ResultEngine<Document> {
        if cmd.lines.is_empty() {
            return Err(EngineError::Validation(
                "document must have at least one line".to_string(),
            ));
        }
        for line in &cmd.lines {
            if !line.quantity.is_finite() || line.quantity <= 0.0 {
                return Err(EngineError::Validation(
                    "line quantity must be > 0".to_string(),
                ));
            }
        }

        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, &cmd.store_id, &cmd.user_id)
                .await?;

            let document = Document::new(
                cmd.store_id.clone(),
                cmd.kind,
                cmd.document_date,
                cmd.customer_id,
                cmd.supplier_id,
                normalize_optional_text(cmd.notes.as_deref()),
                cmd.total_amount.unwrap_or(0.0),
                cmd.user_id.clone(),
            );
            documents::ActiveModel::from(&document).insert(&db_tx).await?;

            let direction = document.kind.direction();
            for (line_no, line) in cmd.lines.iter().enumerate() {
                // Delta first: an unknown item surfaces as KeyNotFound from
                // the store-scoped update, not as a raw FK failure on the
                // line insert.
                self.apply_stock_delta(
                    &db_tx,
                    &cmd.store_id,
                    line.item_id,
                    direction.signed(line.quantity),
                )
                .await?;

                let row = DocumentItem::new(
                    document.id,
                    line.item_id,
                    line_no as i32,
                    line.quantity,
                    line.unit_price.unwrap_or(0.0),
                );
                document_items::ActiveModel::from(&row).insert(&db_tx).await?;
            }

            tracing::debug!(
                store_id = %cmd.store_id,
                document_id = %document.id,
                kind = document.kind.as_str(),
                lines = cmd.lines.len(),
                "posted document"
            );

            self.load_document_with_lines(&db_tx, &cmd.store_id, document.id)
                .await
        })
    }
}
