// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::domain::models::generation::GeneratedCode;
use crate::domain::repositories::record_repository::{
    RecordRepository, COLLECTION_CODE, COLLECTION_PROJECTS,
};
use crate::infrastructure::llm::perplexity_client::{ChatMessage, PerplexityClient, Purpose};
use crate::utils::text_processing::extract_code_block;

/// 代码生成任务的采样温度
const GENERATION_TEMPERATURE: f32 = 0.2;
/// 代码生成任务的最大输出令牌预算
const GENERATION_MAX_TOKENS: u32 = 4000;

/// 代码生成服务
///
/// 根据项目上下文、已有代码和任务描述构造提示词并调用代码模型。
pub struct CodeGenerator {
    llm: Arc<PerplexityClient>,
    store: Option<Arc<dyn RecordRepository>>,
}

impl CodeGenerator {
    /// 创建新的代码生成服务
    ///
    /// # 参数
    ///
    /// * `llm` - 语言模型端点客户端
    /// * `store` - 可选的记录仓库
    pub fn new(llm: Arc<PerplexityClient>, store: Option<Arc<dyn RecordRepository>>) -> Self {
        Self { llm, store }
    }

    /// 生成代码
    ///
    /// # 参数
    ///
    /// * `project_context` - 项目上下文描述
    /// * `existing_code` - 已有代码，可为空
    /// * `task` - 开发任务描述
    ///
    /// # 返回值
    ///
    /// * `Ok(GeneratedCode)` - 完整输出和解析出的代码块
    /// * `Err` - 模型调用失败
    pub async fn generate(
        &self,
        project_context: &str,
        existing_code: &str,
        task: &str,
    ) -> Result<GeneratedCode> {
        let prompt = build_generation_prompt(project_context, existing_code, task);
        let messages = [
            ChatMessage::system("You are a helpful AI coding assistant."),
            ChatMessage::user(prompt),
        ];

        let model = self.llm.model_for(Purpose::Code);
        let completion = self
            .llm
            .generate_completion(
                model,
                &messages,
                GENERATION_TEMPERATURE,
                GENERATION_MAX_TOKENS,
            )
            .await?;

        // An unfenced completion is used whole
        let code =
            extract_code_block(&completion.content).unwrap_or_else(|| completion.content.clone());

        let result = GeneratedCode {
            raw: completion.content,
            code,
            model: completion.model,
            usage: completion.usage,
        };

        self.persist(
            COLLECTION_CODE,
            json!({
                "project_context": project_context,
                "existing_code": existing_code,
                "task": task,
                "generated_code": result.code,
                "raw_output": result.raw,
                "model": result.model,
                "usage": result.usage,
                "timestamp": chrono::Utc::now(),
            }),
        )
        .await;

        if !project_context.trim().is_empty() {
            self.persist(
                COLLECTION_PROJECTS,
                json!({
                    "project_context": project_context,
                    "timestamp": chrono::Utc::now(),
                }),
            )
            .await;
        }

        Ok(result)
    }

    /// 尽力而为地持久化一条记录
    async fn persist(&self, collection: &str, document: serde_json::Value) {
        match &self.store {
            Some(store) => {
                if let Err(e) = store.append(collection, document).await {
                    warn!("Failed to persist record to {}: {}", collection, e);
                }
            }
            None => {
                warn!(
                    "No document store configured, skipping persistence to {}",
                    collection
                );
            }
        }
    }
}

/// 构造代码生成提示词
fn build_generation_prompt(project_context: &str, existing_code: &str, task: &str) -> String {
    format!(
        "Based on the following:\nProject Context: {}\nExisting Code: {}\nTask: {}\nGenerate code:",
        project_context, existing_code, task
    )
}
