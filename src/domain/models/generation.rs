// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::perplexity_client::TokenUsage;

/// 代码生成结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// 完整的模型输出
    pub raw: String,
    /// 从输出中解析出的围栏代码块，没有围栏时等于完整输出
    pub code: String,
    /// 使用的模型
    pub model: String,
    /// 令牌使用情况
    pub usage: TokenUsage,
}

/// 会话轮次
///
/// 一次用户消息与助手回复的配对，持久化到会话历史集合。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// 用户消息
    pub user_message: String,
    /// 可选的上下文信息
    pub context: Option<String>,
    /// 助手回复
    pub ai_response: String,
    /// 使用的模型
    pub model: String,
    /// 令牌使用情况
    pub usage: TokenUsage,
}
