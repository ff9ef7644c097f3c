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

use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::utils::url_utils;

/// 浏览器风格的固定用户代理
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// 抓取请求的固定超时
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// URL无法解析
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),
    /// 目标站点要求认证
    #[error("Site requires authentication: {url} returned HTTP {status}")]
    AuthRequired { url: String, status: u16 },
    /// 请求失败
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// 内容抓取器
///
/// 每次调用对目标URL发出一次GET请求。没有重试，没有取消路径，
/// 调用方只能等待超时。
pub struct ContentFetcher {
    client: reqwest::Client,
}

impl ContentFetcher {
    /// 创建新的抓取器
    ///
    /// # 返回值
    ///
    /// * `Ok(ContentFetcher)` - 抓取器实例
    /// * `Err(FetchError)` - HTTP客户端构建失败
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// 抓取目标URL的原始响应体
    ///
    /// 缺失方案的URL被补全为 `https://`。HTTP 401/403 作为独立的
    /// 认证错误返回，其余非成功状态的响应体原样交给提取器。
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 原始响应体
    /// * `Err(FetchError)` - 抓取过程中出现的错误
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let normalized = url_utils::ensure_scheme(url);
        let target = Url::parse(&normalized)
            .map_err(|e| FetchError::InvalidUrl(normalized.clone(), e))?;

        let response = self.client.get(target).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FetchError::AuthRequired {
                url: normalized,
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "fetch_service_test.rs"]
mod tests;
