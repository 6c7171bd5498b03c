//! Item groups (optional hierarchy for stock items).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGroup {
    pub id: Uuid,
    pub store_id: String,
    pub name: String,
    pub parent_group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemGroup {
    pub(crate) fn new(store_id: String, name: String, parent_group_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            store_id,
            name,
            parent_group_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "item_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub parent_group_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stores::Entity",
        from = "Column::StoreId",
        to = "super::stores::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Stores,
}

impl Related<super::stores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ItemGroup> for ActiveModel {
    fn from(group: &ItemGroup) -> Self {
        Self {
            id: ActiveValue::Set(group.id.to_string()),
            store_id: ActiveValue::Set(group.store_id.clone()),
            name: ActiveValue::Set(group.name.clone()),
            parent_group_id: ActiveValue::Set(group.parent_group_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(group.created_at),
            updated_at: ActiveValue::Set(group.updated_at),
        }
    }
}

impl TryFrom<Model> for ItemGroup {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("item group not exists".to_string()))?,
            store_id: model.store_id,
            name: model.name,
            parent_group_id: model.parent_group_id.and_then(|s| Uuid::parse_str(&s).ok()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
