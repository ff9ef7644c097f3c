// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// 代码生成记录集合
pub const COLLECTION_CODE: &str = "generated_code";
/// 抓取记录集合
pub const COLLECTION_SCRAPING: &str = "scraped_data";
/// 会话历史集合
pub const COLLECTION_CHAT: &str = "chat_history";
/// 项目描述集合
pub const COLLECTION_PROJECTS: &str = "project_descriptions";

/// 记录仓库特质
///
/// 文档存储按集合名寻址，每次操作追加一条完整的JSON文档。
/// 存储是可选的协作者：没有连接时各调用点跳过持久化，
/// 存储结果从不影响流水线自身的成败。
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// 向指定集合追加一条记录
    async fn append(&self, collection: &str, document: Value) -> Result<()>;
}
