use std::future::Future;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::entities::entry;
use crate::error::AppError;

/// Durable string storage addressed by key. No guarantees span more than one
/// key: each `set` replaces a single value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), AppError>> + Send;
}

pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let found = entry::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(found.map(|model| model.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        let active = entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(Utc::now()),
        };
        entry::Entity::insert(active)
            .on_conflict(
                OnConflict::column(entry::Column::Key)
                    .update_columns([entry::Column::Value, entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
