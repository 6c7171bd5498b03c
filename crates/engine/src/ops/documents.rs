//! Document queries and the shared posting helpers.
//!
//! The write paths (post / cancel / header update) live in the submodules;
//! everything here is read-side or shared between them.

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Document, DocumentItem, EngineError, ResultEngine, document_items, documents};

use super::{Engine, with_tx};

mod cancel;
mod post;
mod update;

impl Engine {
    /// Fetch one document with its lines, scoped by store.
    pub async fn document(
        &self,
        store_id: &str,
        document_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Document> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;
            self.load_document_with_lines(&db_tx, store_id, document_id)
                .await
        })
    }

    /// List document headers, newest first.
    pub async fn documents(&self, store_id: &str, user_id: &str) -> ResultEngine<Vec<Document>> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let models = documents::Entity::find()
                .filter(documents::Column::StoreId.eq(store_id.to_string()))
                .order_by_desc(documents::Column::DocumentDate)
                .order_by_desc(documents::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Document::try_from).collect()
        })
    }

    /// Fetch the lines of a document in input order, scoped by store.
    pub async fn document_lines(
        &self,
        store_id: &str,
        document_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<DocumentItem>> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;
            self.find_document_in_store(&db_tx, store_id, document_id)
                .await?;
            self.load_lines(&db_tx, document_id).await
        })
    }

    pub(super) async fn find_document_in_store(
        &self,
        db_tx: &DatabaseTransaction,
        store_id: &str,
        document_id: Uuid,
    ) -> ResultEngine<documents::Model> {
        documents::Entity::find_by_id(document_id.to_string())
            .filter(documents::Column::StoreId.eq(store_id.to_string()))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("document not exists".to_string()))
    }

    pub(super) async fn load_lines(
        &self,
        db_tx: &DatabaseTransaction,
        document_id: Uuid,
    ) -> ResultEngine<Vec<DocumentItem>> {
        let models = document_items::Entity::find()
            .filter(document_items::Column::DocumentId.eq(document_id.to_string()))
            .order_by_asc(document_items::Column::LineNo)
            .all(db_tx)
            .await?;
        models.into_iter().map(DocumentItem::try_from).collect()
    }

    pub(super) async fn load_document_with_lines(
        &self,
        db_tx: &DatabaseTransaction,
        store_id: &str,
        document_id: Uuid,
    ) -> ResultEngine<Document> {
        let model = self
            .find_document_in_store(db_tx, store_id, document_id)
            .await?;
        let mut document = Document::try_from(model)?;
        document.lines = self.load_lines(db_tx, document_id).await?;
        Ok(document)
    }
}
