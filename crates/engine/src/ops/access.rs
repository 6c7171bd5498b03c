use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, StoreRole, item_groups, store_members, stores};

use super::Engine;

impl Engine {
    pub(super) async fn store_role(
        &self,
        db: &DatabaseTransaction,
        store_id: &str,
        user_id: &str,
    ) -> ResultEngine<Option<StoreRole>> {
        let row = store_members::Entity::find_by_id((store_id.to_string(), user_id.to_string()))
            .one(db)
            .await?;
        row.as_ref()
            .map(|m| StoreRole::try_from(m.role.as_str()))
            .transpose()
    }

    /// Any member may read and write store data.
    pub(super) async fn require_store_member(
        &self,
        db: &DatabaseTransaction,
        store_id: &str,
        user_id: &str,
    ) -> ResultEngine<stores::Model> {
        let store = stores::Entity::find_by_id(store_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))?;
        if self.store_role(db, store_id, user_id).await?.is_none() {
            return Err(EngineError::Forbidden("no access to this store".to_string()));
        }
        Ok(store)
    }

    /// Store deletion and member management are owner-only.
    pub(super) async fn require_store_owner(
        &self,
        db: &DatabaseTransaction,
        store_id: &str,
        user_id: &str,
    ) -> ResultEngine<stores::Model> {
        let store = stores::Entity::find_by_id(store_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))?;
        match self.store_role(db, store_id, user_id).await? {
            Some(StoreRole::Owner) => Ok(store),
            Some(_) => Err(EngineError::Forbidden(
                "owner role required".to_string(),
            )),
            None => Err(EngineError::Forbidden("no access to this store".to_string())),
        }
    }

    pub(super) async fn require_group_in_store(
        &self,
        db: &DatabaseTransaction,
        store_id: &str,
        group_id: Uuid,
    ) -> ResultEngine<()> {
        let exists = item_groups::Entity::find_by_id(group_id.to_string())
            .filter(item_groups::Column::StoreId.eq(store_id.to_string()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("item group not exists".to_string()));
        }
        Ok(())
    }
}
