use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, StockItem, StockItemNew, StockItemPatch, document_items,
    stock_items,
};

use super::{Engine, normalize_required_name, with_tx};

/// Group filter for stock listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupScope {
    #[default]
    All,
    Ungrouped,
    In(Uuid),
}

impl Engine {
    /// Apply a signed quantity delta to a stock item, scoped by
    /// `(item_id, store_id)`.
    ///
    /// The update is a single `quantity = quantity + delta` statement, so two
    /// concurrent postings against the same item serialize in the database
    /// instead of losing updates. Must run inside the same transaction as the
    /// document write that caused it. Zero affected rows means the item does
    /// not exist in that store, which aborts the surrounding unit of work.
    ///
    /// No lower bound is enforced: negative stock is permitted.
    pub(super) async fn apply_stock_delta(
        &self,
        db_tx: &DatabaseTransaction,
        store_id: &str,
        item_id: Uuid,
        delta: f64,
    ) -> ResultEngine<()> {
        let result = stock_items::Entity::update_many()
            .col_expr(
                stock_items::Column::Quantity,
                Expr::col(stock_items::Column::Quantity).add(delta),
            )
            .col_expr(stock_items::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(stock_items::Column::Id.eq(item_id.to_string()))
            .filter(stock_items::Column::StoreId.eq(store_id.to_string()))
            .exec(db_tx)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("stock item not exists".to_string()));
        }
        Ok(())
    }

    pub async fn new_stock_item(
        &self,
        store_id: &str,
        user_id: &str,
        cmd: StockItemNew,
    ) -> ResultEngine<StockItem> {
        let name = normalize_required_name(&cmd.name, "stock item")?;
        if !cmd.quantity.is_finite() {
            return Err(EngineError::Validation(
                "quantity must be a finite number".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;
            if let Some(group_id) = cmd.group_id {
                self.require_group_in_store(&db_tx, store_id, group_id)
                    .await?;
            }

            let item = StockItem::new(
                store_id.to_string(),
                cmd.group_id,
                name,
                cmd.quantity,
                cmd.properties,
            );
            let model = stock_items::ActiveModel::from(&item).insert(&db_tx).await?;
            StockItem::try_from(model)
        })
    }

    pub async fn stock_item(
        &self,
        store_id: &str,
        item_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<StockItem> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;
            let model = self.find_item_in_store(&db_tx, store_id, item_id).await?;
            StockItem::try_from(model)
        })
    }

    /// List stock items, ordered by name.
    pub async fn stock_items(
        &self,
        store_id: &str,
        user_id: &str,
        scope: GroupScope,
    ) -> ResultEngine<Vec<StockItem>> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let mut query = stock_items::Entity::find()
                .filter(stock_items::Column::StoreId.eq(store_id.to_string()));
            query = match scope {
                GroupScope::All => query,
                GroupScope::Ungrouped => {
                    query.filter(stock_items::Column::GroupId.is_null())
                }
                GroupScope::In(group_id) => {
                    query.filter(stock_items::Column::GroupId.eq(group_id.to_string()))
                }
            };
            let models = query
                .order_by_asc(stock_items::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(StockItem::try_from).collect()
        })
    }

    /// Update name, group or properties. Quantity is not editable here: it
    /// only moves through document posting and cancellation.
    pub async fn update_stock_item(
        &self,
        store_id: &str,
        item_id: Uuid,
        user_id: &str,
        patch: StockItemPatch,
    ) -> ResultEngine<StockItem> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;
            let existing = self.find_item_in_store(&db_tx, store_id, item_id).await?;

            let name = match patch.name {
                Some(name) => normalize_required_name(&name, "stock item")?,
                None => existing.name.clone(),
            };
            let group_id = match patch.group_id {
                Some(Some(group_id)) => {
                    self.require_group_in_store(&db_tx, store_id, group_id)
                        .await?;
                    Some(group_id.to_string())
                }
                Some(None) => None,
                None => existing.group_id.clone(),
            };
            let properties = match patch.properties {
                Some(map) => Some(crate::stock_items::encode_properties(&map)),
                None => existing.properties.clone(),
            };

            let model = stock_items::ActiveModel {
                id: ActiveValue::Set(item_id.to_string()),
                name: ActiveValue::Set(name),
                group_id: ActiveValue::Set(group_id),
                properties: ActiveValue::Set(properties),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let updated = model.update(&db_tx).await?;
            StockItem::try_from(updated)
        })
    }

    /// Delete a stock item; rejected while any document line references it.
    ///
    /// Returns the released image filename (if any) so the caller can drop
    /// the stored asset.
    pub async fn delete_stock_item(
        &self,
        store_id: &str,
        item_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Option<String>> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;
            let existing = self.find_item_in_store(&db_tx, store_id, item_id).await?;

            let referenced = document_items::Entity::find()
                .filter(document_items::Column::ItemId.eq(item_id.to_string()))
                .count(&db_tx)
                .await?;
            if referenced > 0 {
                return Err(EngineError::ReferencedByDocuments(existing.name));
            }

            stock_items::Entity::delete_by_id(item_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(existing.image_filename)
        })
    }

    /// Record a new image filename; returns the replaced one (if any) so the
    /// caller can drop the old asset. File storage itself lives outside the
    /// engine.
    pub async fn set_stock_item_image(
        &self,
        store_id: &str,
        item_id: Uuid,
        user_id: &str,
        filename: &str,
    ) -> ResultEngine<(StockItem, Option<String>)> {
        let filename = normalize_required_name(filename, "image")?;
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;
            let existing = self.find_item_in_store(&db_tx, store_id, item_id).await?;
            let replaced = existing.image_filename.clone();

            let model = stock_items::ActiveModel {
                id: ActiveValue::Set(item_id.to_string()),
                image_filename: ActiveValue::Set(Some(filename)),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let updated = model.update(&db_tx).await?;
            Ok((StockItem::try_from(updated)?, replaced))
        })
    }

    async fn find_item_in_store(
        &self,
        db_tx: &DatabaseTransaction,
        store_id: &str,
        item_id: Uuid,
    ) -> ResultEngine<stock_items::Model> {
        stock_items::Entity::find_by_id(item_id.to_string())
            .filter(stock_items::Column::StoreId.eq(store_id.to_string()))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("stock item not exists".to_string()))
    }
}
