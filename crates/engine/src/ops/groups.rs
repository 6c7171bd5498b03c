use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, GroupNew, GroupUpdate, ItemGroup, ResultEngine, item_groups};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub async fn new_group(
        &self,
        store_id: &str,
        user_id: &str,
        cmd: GroupNew,
    ) -> ResultEngine<ItemGroup> {
        let name = normalize_required_name(&cmd.name, "group")?;
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;
            if let Some(parent_id) = cmd.parent_group_id {
                self.require_group_in_store(&db_tx, store_id, parent_id)
                    .await?;
            }

            let group = ItemGroup::new(store_id.to_string(), name, cmd.parent_group_id);
            let model = item_groups::ActiveModel::from(&group).insert(&db_tx).await?;
            ItemGroup::try_from(model)
        })
    }

    pub async fn groups(&self, store_id: &str, user_id: &str) -> ResultEngine<Vec<ItemGroup>> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let models = item_groups::Entity::find()
                .filter(item_groups::Column::StoreId.eq(store_id.to_string()))
                .order_by_asc(item_groups::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(ItemGroup::try_from).collect()
        })
    }

    pub async fn update_group(
        &self,
        store_id: &str,
        group_id: Uuid,
        user_id: &str,
        patch: GroupUpdate,
    ) -> ResultEngine<ItemGroup> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let existing = item_groups::Entity::find_by_id(group_id.to_string())
                .filter(item_groups::Column::StoreId.eq(store_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("item group not exists".to_string()))?;

            let name = match patch.name {
                Some(name) => normalize_required_name(&name, "group")?,
                None => existing.name.clone(),
            };
            let parent_group_id = match patch.parent_group_id {
                Some(Some(parent_id)) => {
                    if parent_id == group_id {
                        return Err(EngineError::Validation(
                            "group cannot be its own parent".to_string(),
                        ));
                    }
                    self.require_group_in_store(&db_tx, store_id, parent_id)
                        .await?;
                    Some(parent_id.to_string())
                }
                Some(None) => None,
                None => existing.parent_group_id.clone(),
            };

            let model = item_groups::ActiveModel {
                id: ActiveValue::Set(group_id.to_string()),
                name: ActiveValue::Set(name),
                parent_group_id: ActiveValue::Set(parent_group_id),
                updated_at: ActiveValue::Set(chrono::Utc::now()),
                ..Default::default()
            };
            let updated = model.update(&db_tx).await?;
            ItemGroup::try_from(updated)
        })
    }

    /// Delete a group; child groups and items are detached, never deleted.
    pub async fn delete_group(
        &self,
        store_id: &str,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_store_member(&db_tx, store_id, user_id).await?;

            let result = item_groups::Entity::delete_by_id(group_id.to_string())
                .filter(item_groups::Column::StoreId.eq(store_id.to_string()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("item group not exists".to_string()));
            }
            Ok(())
        })
    }
}
