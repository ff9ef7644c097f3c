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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含应用环境、服务器、数据库和语言模型端点等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 应用配置
    pub app: AppSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 语言模型端点配置
    pub llm: LlmSettings,
}

/// 应用配置设置
#[derive(Debug, Deserialize)]
pub struct AppSettings {
    /// 运行环境 (development, production)
    pub environment: String,
}

impl AppSettings {
    /// 调试开关由运行环境决定
    pub fn debug(&self) -> bool {
        self.environment == "development"
    }
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
///
/// 连接URL缺失时持久化被禁用，流水线本身不受影响。
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: Option<String>,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 语言模型端点配置设置
#[derive(Debug, Deserialize)]
pub struct LlmSettings {
    /// API密钥
    pub api_key: Option<String>,
    /// 端点基础URL
    pub base_url: String,
    /// 会话和摘要任务使用的采样温度
    pub temperature: f32,
    /// 按用途划分的模型表
    pub models: ModelSettings,
}

/// 按用途划分的模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// 代码生成模型
    pub code: String,
    /// 网络研究模型
    pub web: String,
    /// 会话助手模型
    pub chat: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("app.environment", "development")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default LLM endpoint settings
            .set_default("llm.base_url", "https://api.perplexity.ai")?
            .set_default("llm.temperature", 0.7)?
            .set_default("llm.models.code", "sonar-pro")?
            .set_default("llm.models.web", "sonar-deep-research")?
            .set_default("llm.models.chat", "sonar")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("MCLG").separator("__"));

        builder.build()?.try_deserialize()
    }
}
