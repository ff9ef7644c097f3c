// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use crate::domain::services::extraction_service::MAX_SUMMARY_INPUT_CHARS;
use crate::infrastructure::llm::perplexity_client::{
    ChatMessage, LlmError, PerplexityClient, Purpose, TokenUsage,
};
use crate::utils::text_processing::truncate_chars;

/// 短于此字符数的文本直通，不消耗模型调用
pub const SUMMARY_THRESHOLD_CHARS: usize = 500;

/// 摘要任务的最大输出令牌预算
const SUMMARY_MAX_TOKENS: u32 = 2000;

/// 摘要结果
///
/// 直通时模型为空且令牌计数为零。
#[derive(Debug, Clone)]
pub struct Summary {
    /// 摘要文本
    pub text: String,
    /// 生成摘要的模型
    pub model: Option<String>,
    /// 令牌使用情况
    pub usage: TokenUsage,
}

/// 摘要服务
///
/// 把提取出的正文交给会话模型生成简洁摘要。
pub struct Summarizer {
    llm: Arc<PerplexityClient>,
    temperature: f32,
}

impl Summarizer {
    /// 创建新的摘要服务
    ///
    /// # 参数
    ///
    /// * `llm` - 语言模型端点客户端
    /// * `temperature` - 采样温度
    pub fn new(llm: Arc<PerplexityClient>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    /// 构造摘要提示词
    ///
    /// 正文先被截断到固定的输入上限再代入模板。
    pub fn build_prompt(content: &str) -> String {
        let input = truncate_chars(content, MAX_SUMMARY_INPUT_CHARS);
        format!(
            "Summarize the following content scraped from a website:\n\n{}\n\nPlease provide a concise summary:",
            input
        )
    }

    /// 生成摘要
    ///
    /// 短输入原样返回，不发出模型调用。
    ///
    /// # 参数
    ///
    /// * `content` - 提取出的正文文本
    ///
    /// # 返回值
    ///
    /// * `Ok(Summary)` - 摘要文本和令牌使用情况
    /// * `Err(LlmError)` - 模型调用失败
    pub async fn summarize(&self, content: &str) -> Result<Summary, LlmError> {
        if content.chars().count() < SUMMARY_THRESHOLD_CHARS {
            return Ok(Summary {
                text: content.to_string(),
                model: None,
                usage: TokenUsage::default(),
            });
        }

        let prompt = Self::build_prompt(content);
        let model = self.llm.model_for(Purpose::Chat);
        let completion = self
            .llm
            .generate_completion(
                model,
                &[ChatMessage::user(prompt)],
                self.temperature,
                SUMMARY_MAX_TOKENS,
            )
            .await?;

        Ok(Summary {
            text: completion.content,
            model: Some(completion.model),
            usage: completion.usage,
        })
    }
}
