// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::repositories::record_repository::RecordRepository;
use crate::infrastructure::database::entities::record as record_entity;
use async_trait::async_trait;
use sea_orm::*;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// 记录仓库实现
pub struct RecordRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl RecordRepositoryImpl {
    /// 创建新的记录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的记录仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordRepository for RecordRepositoryImpl {
    async fn append(&self, collection: &str, document: Value) -> anyhow::Result<()> {
        let active_model = record_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            collection: Set(collection.to_string()),
            document: Set(document),
            created_at: Set(chrono::Utc::now().into()),
        };

        record_entity::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use serde_json::json;

    async fn connect_test_db() -> Arc<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Arc::new(db)
    }

    #[tokio::test]
    async fn test_append_inserts_one_record_per_call() {
        let db = connect_test_db().await;
        let repo = RecordRepositoryImpl::new(db.clone());

        repo.append("scraped_data", json!({"url": "https://example.com"}))
            .await
            .unwrap();
        repo.append("chat_history", json!({"user_message": "hi"}))
            .await
            .unwrap();

        let scraped = record_entity::Entity::find()
            .filter(record_entity::Column::Collection.eq("scraped_data"))
            .all(db.as_ref())
            .await
            .unwrap();
        assert_eq!(scraped.len(), 1);
        assert_eq!(scraped[0].document["url"], "https://example.com");

        let total = record_entity::Entity::find().all(db.as_ref()).await.unwrap();
        assert_eq!(total.len(), 2);
    }
}
