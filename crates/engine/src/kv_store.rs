//! `kv_store` table and the [`KvStore`] implementation on top of it.

use async_trait::async_trait;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, entity::prelude::*, sea_query::OnConflict};

use crate::store::{KvStore, StoreError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "kv_store")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// [`KvStore`] backed by a relational database through `sea-orm`.
///
/// The schema is created by the `migration` crate.
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl KvStore for SqlStore {
    async fn get(&self, key: &str) -> Result<Option<Json>, StoreError> {
        let model = Entity::find_by_id(key.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(|model| model.value))
    }

    async fn set(&self, key: &str, value: Json) -> Result<(), StoreError> {
        let active = ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value),
        };
        Entity::insert(active)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_column(Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        Entity::delete_by_id(key.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<Json>, StoreError> {
        let models = Entity::find()
            .filter(Column::Key.starts_with(prefix))
            .order_by_asc(Column::Key)
            .all(&self.database)
            .await?;

        // LIKE treats `_` and `%` in the prefix as wildcards.
        Ok(models
            .into_iter()
            .filter(|model| model.key.starts_with(prefix))
            .map(|model| model.value)
            .collect())
    }
}
