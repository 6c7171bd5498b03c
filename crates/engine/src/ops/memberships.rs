use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::OnConflict};

use crate::{EngineError, ResultEngine, StoreRole, store_members, users};

use super::{Engine, with_tx};

impl Engine {
    /// Add a member or change their role (owner-only). Upserts on conflict.
    pub async fn upsert_store_member(
        &self,
        store_id: &str,
        acting_user: &str,
        username: &str,
        role: StoreRole,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_store_owner(&db_tx, store_id, acting_user)
                .await?;

            let user_exists = users::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?
                .is_some();
            if !user_exists {
                return Err(EngineError::KeyNotFound("user not exists".to_string()));
            }

            let member = store_members::ActiveModel {
                store_id: ActiveValue::Set(store_id.to_string()),
                user_id: ActiveValue::Set(username.to_string()),
                role: ActiveValue::Set(role.as_str().to_string()),
            };
            store_members::Entity::insert(member)
                .on_conflict(
                    OnConflict::columns([
                        store_members::Column::StoreId,
                        store_members::Column::UserId,
                    ])
                    .update_column(store_members::Column::Role)
                    .to_owned(),
                )
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// List members with their roles (any member may look).
    pub async fn store_members(
        &self,
        store_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<(String, StoreRole)>> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let rows = store_members::Entity::find()
                .filter(store_members::Column::StoreId.eq(store_id.to_string()))
                .order_by_asc(store_members::Column::UserId)
                .all(&db_tx)
                .await?;

            let mut members = Vec::with_capacity(rows.len());
            for row in rows {
                members.push((row.user_id, StoreRole::try_from(row.role.as_str())?));
            }
            Ok(members)
        })
    }

    /// Remove a member (owner-only).
    pub async fn remove_store_member(
        &self,
        store_id: &str,
        acting_user: &str,
        username: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_store_owner(&db_tx, store_id, acting_user)
                .await?;

            let result = store_members::Entity::delete_by_id((
                store_id.to_string(),
                username.to_string(),
            ))
            .exec(&db_tx)
            .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("member not exists".to_string()));
            }
            Ok(())
        })
    }
}
