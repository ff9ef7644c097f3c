// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::config::settings::{LlmSettings, ModelSettings};

/// 完成调用的固定超时
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// 令牌使用情况
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 角色标注的消息
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// 完成结果
///
/// 生成文本以及端点返回的模型和令牌计数。
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

/// 模型用途
///
/// 选择模型表中对应的模型标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// 代码生成
    Code,
    /// 网络研究
    Web,
    /// 会话助手
    Chat,
}

/// 语言模型端点错误类型
#[derive(Error, Debug)]
pub enum LlmError {
    /// API密钥未配置
    #[error("Perplexity API key is not set in environment variables")]
    MissingApiKey,
    /// API密钥被拒绝
    #[error("Perplexity API key rejected (HTTP 401): {0}")]
    Unauthorized(String),
    /// 请求失败
    #[error("Request to LLM API failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// 端点返回的载荷缺少预期字段
    #[error("Invalid response format from LLM API: {0}")]
    MalformedResponse(String),
    /// 端点返回其他错误
    #[error("LLM API returned error: {0}")]
    Api(String),
}

/// Perplexity端点客户端
///
/// 通过OpenAI兼容的completion接口与Perplexity交互。客户端由组合根
/// 显式构造并注入各流水线阶段，密钥缺失时构造立即失败。
pub struct PerplexityClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    models: ModelSettings,
}

impl PerplexityClient {
    /// 从配置创建客户端
    ///
    /// # 参数
    ///
    /// * `settings` - 语言模型端点配置
    ///
    /// # 返回值
    ///
    /// * `Ok(PerplexityClient)` - 客户端实例
    /// * `Err(LlmError)` - 密钥未配置或HTTP客户端构建失败
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        Self::new_with_config(
            api_key.to_string(),
            settings.base_url.clone(),
            settings.models.clone(),
        )
    }

    /// 使用显式参数创建客户端
    pub fn new_with_config(
        api_key: String,
        base_url: String,
        models: ModelSettings,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
            models,
        })
    }

    /// 获取指定用途的模型标识
    pub fn model_for(&self, purpose: Purpose) -> &str {
        match purpose {
            Purpose::Code => &self.models.code,
            Purpose::Web => &self.models.web,
            Purpose::Chat => &self.models.chat,
        }
    }

    /// 生成会话完成
    ///
    /// # 参数
    ///
    /// * `model` - 模型标识
    /// * `messages` - 角色标注的消息列表
    /// * `temperature` - 采样温度
    /// * `max_tokens` - 最大输出令牌预算
    ///
    /// # 返回值
    ///
    /// * `Ok(Completion)` - 生成文本和令牌使用情况
    /// * `Err(LlmError)` - 调用过程中出现的错误
    pub async fn generate_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        let request_body = json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Unauthorized(error_text));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("{} - {}", status, error_text)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let usage = if let Some(usage_val) = body.get("usage") {
            TokenUsage {
                prompt_tokens: usage_val["prompt_tokens"].as_u64().unwrap_or(0) as u32,
                completion_tokens: usage_val["completion_tokens"].as_u64().unwrap_or(0) as u32,
                total_tokens: usage_val["total_tokens"].as_u64().unwrap_or(0) as u32,
            }
        } else {
            TokenUsage::default()
        };

        match body["choices"][0]["message"]["content"].as_str() {
            Some(content) => Ok(Completion {
                content: content.to_string(),
                model: body["model"].as_str().unwrap_or(model).to_string(),
                usage,
            }),
            None => Err(LlmError::MalformedResponse(
                "missing choices[0].message.content".to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[path = "perplexity_client_test.rs"]
mod tests;
