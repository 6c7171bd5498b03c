use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*,
};

use crate::{ResultEngine, Store, StoreRole, store_members, stores};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Create a store; the creator becomes its owner in the same transaction.
    pub async fn new_store(
        &self,
        name: &str,
        address: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<String> {
        let name = normalize_required_name(name, "store")?;
        let address = normalize_optional_text(address);
        with_tx!(self, |db_tx| {
            let store = Store::new(name, address);
            let store_id = store.id.clone();
            stores::ActiveModel::from(&store).insert(&db_tx).await?;

            let member = store_members::ActiveModel {
                store_id: ActiveValue::Set(store_id.clone()),
                user_id: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(StoreRole::Owner.as_str().to_string()),
            };
            member.insert(&db_tx).await?;

            Ok(store_id)
        })
    }

    /// List the stores the user is a member of, ordered by name.
    pub async fn stores(&self, user_id: &str) -> ResultEngine<Vec<Store>> {
        with_tx!(self, |db_tx| {
            let memberships = store_members::Entity::find()
                .filter(store_members::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;
            let ids: Vec<String> = memberships.into_iter().map(|m| m.store_id).collect();

            let models = stores::Entity::find()
                .filter(stores::Column::Id.is_in(ids))
                .order_by_asc(stores::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Store::from).collect())
        })
    }

    pub async fn store(&self, store_id: &str, user_id: &str) -> ResultEngine<Store> {
        with_tx!(self, |db_tx| {
            let model = self.require_store_member(&db_tx, store_id, user_id).await?;
            Ok(Store::from(model))
        })
    }

    pub async fn update_store(
        &self,
        store_id: &str,
        user_id: &str,
        name: &str,
        address: Option<&str>,
    ) -> ResultEngine<Store> {
        let name = normalize_required_name(name, "store")?;
        let address = normalize_optional_text(address);
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let model = stores::ActiveModel {
                id: ActiveValue::Set(store_id.to_string()),
                name: ActiveValue::Set(name),
                address: ActiveValue::Set(address),
                updated_at: ActiveValue::Set(chrono::Utc::now()),
                ..Default::default()
            };
            let updated = model.update(&db_tx).await?;
            Ok(Store::from(updated))
        })
    }

    /// Delete a store and everything it owns (owner-only).
    pub async fn delete_store(&self, store_id: &str, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_store_owner(&db_tx, store_id, user_id).await?;

            // Explicit cascade within one DB transaction: document lines first
            // (they restrict stock-item deletes), then everything store-scoped.
            let backend = self.database.get_database_backend();
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM document_items WHERE document_id IN (SELECT id FROM documents WHERE store_id = ?);",
                    vec![store_id.into()],
                ))
                .await?;

            for table in [
                "documents",
                "stock_items",
                "item_groups",
                "customers",
                "suppliers",
                "store_members",
            ] {
                db_tx
                    .execute(Statement::from_sql_and_values(
                        backend,
                        format!("DELETE FROM {table} WHERE store_id = ?;"),
                        vec![store_id.into()],
                    ))
                    .await?;
            }

            stores::Entity::delete_by_id(store_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
