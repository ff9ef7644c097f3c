// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::domain::models::scrape_result::{ResearchResult, ScrapeResult};
use crate::domain::repositories::record_repository::{RecordRepository, COLLECTION_SCRAPING};
use crate::domain::services::citation_service::CitationService;
use crate::domain::services::extraction_service::{
    ExtractionService, PageMetadata, MAX_STORED_CONTENT_CHARS, MAX_SUMMARY_INPUT_CHARS,
};
use crate::domain::services::fetch_service::ContentFetcher;
use crate::domain::services::summary_service::Summarizer;
use crate::infrastructure::llm::perplexity_client::{ChatMessage, PerplexityClient, Purpose};
use crate::utils::text_processing::truncate_chars;
use crate::utils::url_utils::ensure_scheme;

/// 研究任务的采样温度
const RESEARCH_TEMPERATURE: f32 = 0.2;
/// 研究任务的最大输出令牌预算
const RESEARCH_MAX_TOKENS: u32 = 4000;

/// 抓取流水线服务
///
/// 每次运行是严格的线性序列：抓取、提取、摘要、（研究变体再提取
/// 引用）、持久化、返回。任何阶段失败即短路，跳过所有后续阶段。
/// 协作者由组合根显式构造并注入，存储是可选的。
pub struct WebScraper {
    fetcher: ContentFetcher,
    llm: Arc<PerplexityClient>,
    summarizer: Summarizer,
    store: Option<Arc<dyn RecordRepository>>,
}

impl WebScraper {
    /// 创建新的抓取流水线
    ///
    /// # 参数
    ///
    /// * `fetcher` - 内容抓取器
    /// * `llm` - 语言模型端点客户端
    /// * `temperature` - 摘要任务的采样温度
    /// * `store` - 可选的记录仓库
    pub fn new(
        fetcher: ContentFetcher,
        llm: Arc<PerplexityClient>,
        temperature: f32,
        store: Option<Arc<dyn RecordRepository>>,
    ) -> Self {
        let summarizer = Summarizer::new(llm.clone(), temperature);
        Self {
            fetcher,
            llm,
            summarizer,
            store,
        }
    }

    /// 抓取网页并生成摘要
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL，缺失方案时补全 `https://`
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeResult)` - 提取的正文、链接和摘要
    /// * `Err` - 第一个失败阶段的错误，后续阶段（包括持久化）被跳过
    pub async fn scrape(&self, url: &str) -> Result<ScrapeResult> {
        let url = ensure_scheme(url);

        let html = self.fetcher.fetch(&url).await?;
        let page = ExtractionService::extract_page(&html);
        let summary = self.summarizer.summarize(&page.text).await?;

        let result = ScrapeResult {
            url: url.clone(),
            content: truncate_chars(&page.text, MAX_SUMMARY_INPUT_CHARS).to_string(),
            links: page.links,
            summary: summary.text,
            model: summary.model,
            usage: summary.usage,
        };

        self.persist(
            COLLECTION_SCRAPING,
            json!({
                "url": result.url,
                "content": truncate_chars(&page.text, MAX_STORED_CONTENT_CHARS),
                "links": result.links,
                "summary": result.summary,
                "model": result.model,
                "usage": result.usage,
                "timestamp": chrono::Utc::now(),
            }),
        )
        .await;

        Ok(result)
    }

    /// 对网页执行深度研究
    ///
    /// 研究变体把URL本身交给研究模型，页面元数据单独抓取用于
    /// 提示词；生成文本随后经过引用提取。
    ///
    /// # 参数
    ///
    /// * `url` - 研究目标URL
    ///
    /// # 返回值
    ///
    /// * `Ok(ResearchResult)` - 研究文本和提取的引用
    /// * `Err` - 第一个失败阶段的错误
    pub async fn deep_research(&self, url: &str) -> Result<ResearchResult> {
        let url = ensure_scheme(url);

        let html = self.fetcher.fetch(&url).await?;
        let metadata = ExtractionService::extract_metadata(&html);

        let messages = [
            ChatMessage::system(
                "You are a web research assistant. Cite sources with bracketed \
                 numeric markers like [1], followed by the citation details.",
            ),
            ChatMessage::user(build_research_prompt(&url, &metadata)),
        ];

        let model = self.llm.model_for(Purpose::Web);
        let completion = self
            .llm
            .generate_completion(model, &messages, RESEARCH_TEMPERATURE, RESEARCH_MAX_TOKENS)
            .await?;

        let citations = CitationService::extract_citations(&completion.content);

        let result = ResearchResult {
            url: url.clone(),
            title: metadata.title.clone(),
            analysis: completion.content,
            citations,
            model: completion.model,
            usage: completion.usage,
        };

        self.persist(
            COLLECTION_SCRAPING,
            json!({
                "url": result.url,
                "kind": "research",
                "title": result.title,
                "description": metadata.description,
                "analysis": result.analysis,
                "citations": result.citations,
                "model": result.model,
                "usage": result.usage,
                "timestamp": chrono::Utc::now(),
            }),
        )
        .await;

        Ok(result)
    }

    /// 尽力而为地持久化一条记录
    ///
    /// 没有存储连接时跳过并记录警告；存储失败从不影响流水线结果。
    async fn persist(&self, collection: &str, document: Value) {
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

/// 构造研究提示词
fn build_research_prompt(url: &str, metadata: &PageMetadata) -> String {
    let mut prompt = format!(
        "Research the following web page and provide a detailed analysis \
         with numbered citations:\n\nURL: {}",
        url
    );
    if let Some(title) = &metadata.title {
        prompt.push_str(&format!("\nTitle: {}", title));
    }
    if let Some(description) = &metadata.description {
        prompt.push_str(&format!("\nDescription: {}", description));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_prompt_includes_url_and_metadata() {
        let metadata = PageMetadata {
            title: Some("Example Domain".to_string()),
            description: Some("An illustrative page.".to_string()),
        };

        let prompt = build_research_prompt("https://example.com", &metadata);

        assert!(prompt.contains("URL: https://example.com"));
        assert!(prompt.contains("Title: Example Domain"));
        assert!(prompt.contains("Description: An illustrative page."));
    }

    #[test]
    fn test_research_prompt_without_metadata() {
        let prompt = build_research_prompt("https://example.com", &PageMetadata::default());

        assert!(prompt.contains("URL: https://example.com"));
        assert!(!prompt.contains("Title:"));
        assert!(!prompt.contains("Description:"));
    }
}
