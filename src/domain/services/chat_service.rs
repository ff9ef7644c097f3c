// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::domain::models::generation::ChatTurn;
use crate::domain::repositories::record_repository::{RecordRepository, COLLECTION_CHAT};
use crate::infrastructure::llm::perplexity_client::{ChatMessage, PerplexityClient, Purpose};

/// 会话任务的最大输出令牌预算
const CHAT_MAX_TOKENS: u32 = 2000;

/// 会话助手服务
///
/// 持有缓冲记忆：之前的轮次在每次调用时重放进消息列表。
/// 可选的上下文字符串被前置到用户消息中。
pub struct ChatAssistant {
    llm: Arc<PerplexityClient>,
    store: Option<Arc<dyn RecordRepository>>,
    temperature: f32,
    history: Vec<ChatMessage>,
}

impl ChatAssistant {
    /// 创建新的会话助手
    ///
    /// # 参数
    ///
    /// * `llm` - 语言模型端点客户端
    /// * `temperature` - 采样温度
    /// * `store` - 可选的记录仓库
    pub fn new(
        llm: Arc<PerplexityClient>,
        temperature: f32,
        store: Option<Arc<dyn RecordRepository>>,
    ) -> Self {
        Self {
            llm,
            store,
            temperature,
            history: Vec::new(),
        }
    }

    /// 处理一条用户消息并返回助手回复
    ///
    /// # 参数
    ///
    /// * `user_message` - 用户消息
    /// * `context` - 可选的上下文信息
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 助手回复
    /// * `Err` - 模型调用失败，失败的轮次不进入记忆
    pub async fn process_message(
        &mut self,
        user_message: &str,
        context: Option<&str>,
    ) -> Result<String> {
        let enhanced_message = match context {
            Some(context) => format!(
                "Context information: {}\n\nUser question: {}",
                context, user_message
            ),
            None => user_message.to_string(),
        };

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system("You are a helpful AI assistant."));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(enhanced_message.clone()));

        let model = self.llm.model_for(Purpose::Chat);
        let completion = self
            .llm
            .generate_completion(model, &messages, self.temperature, CHAT_MAX_TOKENS)
            .await?;

        self.history.push(ChatMessage::user(enhanced_message));
        self.history
            .push(ChatMessage::assistant(completion.content.clone()));

        let turn = ChatTurn {
            user_message: user_message.to_string(),
            context: context.map(str::to_string),
            ai_response: completion.content,
            model: completion.model,
            usage: completion.usage,
        };
        let mut document = serde_json::to_value(&turn)?;
        document["timestamp"] = json!(chrono::Utc::now());
        self.persist(document).await;

        Ok(turn.ai_response)
    }

    /// 当前记忆中的轮次消息
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// 尽力而为地持久化一条会话轮次
    async fn persist(&self, document: serde_json::Value) {
        match &self.store {
            Some(store) => {
                if let Err(e) = store.append(COLLECTION_CHAT, document).await {
                    warn!("Failed to persist record to {}: {}", COLLECTION_CHAT, e);
                }
            }
            None => {
                warn!(
                    "No document store configured, skipping persistence to {}",
                    COLLECTION_CHAT
                );
            }
        }
    }
}
