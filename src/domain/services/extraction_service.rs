// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{Html, Selector};

use crate::domain::models::scrape_result::Link;
use crate::utils::text_processing::collapse_whitespace;
use crate::utils::url_utils::is_absolute_http;

/// 摘要输入的最大字符数
pub const MAX_SUMMARY_INPUT_CHARS: usize = 5000;
/// 持久化正文的最大字符数
pub const MAX_STORED_CONTENT_CHARS: usize = 10_000;
/// 链接列表的最大数量
pub const MAX_LINKS: usize = 20;

/// 提取出的页面内容
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// 正文可见文本，元素间空白折叠为单个空格
    pub text: String,
    /// 出站链接，按文档顺序，截断到上限
    pub links: Vec<Link>,
}

/// 页面元数据
#[derive(Debug, Clone, Default)]
pub struct PageMetadata {
    /// 页面标题
    pub title: Option<String>,
    /// meta描述
    pub description: Option<String>,
}

/// 提取服务
///
/// 负责从原始HTML内容中提取正文文本、出站链接和页面元数据。
/// 文本和链接数量的上限在这里施加，保护下游的令牌预算和存储大小，
/// 顺序保留使结果可确定、可测试。
pub struct ExtractionService;

impl ExtractionService {
    /// 提取页面正文和链接
    ///
    /// # 参数
    ///
    /// * `html` - 原始HTML内容
    ///
    /// # 返回值
    ///
    /// 提取出的页面内容，畸形输入产生空文本而不是错误
    pub fn extract_page(html: &str) -> ExtractedPage {
        // Html is not Send; parse and drop inside this scope, never
        // held across an await point
        let document = Html::parse_document(html);

        let body_selector = Selector::parse("body").unwrap();
        let text = match document.select(&body_selector).next() {
            Some(body) => collapse_whitespace(&body.text().collect::<Vec<_>>().join(" ")),
            None => String::new(),
        };

        let link_selector = Selector::parse("a[href]").unwrap();
        let links = document
            .select(&link_selector)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                if !is_absolute_http(href) {
                    return None;
                }
                Some(Link {
                    url: href.to_string(),
                    text: collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")),
                })
            })
            .take(MAX_LINKS)
            .collect();

        ExtractedPage { text, links }
    }

    /// 提取页面元数据
    ///
    /// # 参数
    ///
    /// * `html` - 原始HTML内容
    ///
    /// # 返回值
    ///
    /// 页面标题和meta描述，缺失的字段为None
    pub fn extract_metadata(html: &str) -> PageMetadata {
        let document = Html::parse_document(html);

        let title_selector = Selector::parse("title").unwrap();
        let title = document
            .select(&title_selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
            .filter(|title| !title.is_empty());

        let description_selector = Selector::parse("meta[name=\"description\"]").unwrap();
        let description = document
            .select(&description_selector)
            .next()
            .and_then(|element| element.value().attr("content"))
            .map(|content| collapse_whitespace(content))
            .filter(|description| !description.is_empty());

        PageMetadata { title, description }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_and_links() {
        let html = r#"
            <html>
                <head><title>Test Page</title></head>
                <body>
                    <p>Test content</p>
                    <a href="https://example.com">Link</a>
                </body>
            </html>
        "#;

        let page = ExtractionService::extract_page(html);

        assert_eq!(page.text, "Test content Link");
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].url, "https://example.com");
        assert_eq!(page.links[0].text, "Link");
    }

    #[test]
    fn test_extract_links_filters_non_absolute() {
        let html = r#"
            <body>
                <a href="https://a.example/1">first</a>
                <a href="/relative">skip</a>
                <a href="mailto:x@y.z">skip</a>
                <a href="ftp://files.example">skip</a>
                <a href="http://b.example/2">second</a>
            </body>
        "#;

        let page = ExtractionService::extract_page(html);

        assert_eq!(
            page.links,
            vec![
                Link {
                    url: "https://a.example/1".to_string(),
                    text: "first".to_string()
                },
                Link {
                    url: "http://b.example/2".to_string(),
                    text: "second".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_extract_links_preserves_document_order_and_cap() {
        let anchors: String = (0..30)
            .map(|i| format!("<a href=\"https://example.com/{i}\">l{i}</a>"))
            .collect();
        let html = format!("<body>{anchors}</body>");

        let page = ExtractionService::extract_page(&html);

        assert_eq!(page.links.len(), MAX_LINKS);
        assert_eq!(page.links[0].url, "https://example.com/0");
        assert_eq!(page.links[19].url, "https://example.com/19");
    }

    #[test]
    fn test_extract_text_collapses_whitespace() {
        let html = "<body><p>one\n   two</p>\t<div>three</div></body>";

        let page = ExtractionService::extract_page(html);

        assert_eq!(page.text, "one two three");
    }

    #[test]
    fn test_extract_page_malformed_input_does_not_panic() {
        let page = ExtractionService::extract_page("<<<not <html");
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_extract_metadata() {
        let html = r#"
            <html>
                <head>
                    <title>  A   Title </title>
                    <meta name="description" content="Short description.">
                </head>
                <body></body>
            </html>
        "#;

        let metadata = ExtractionService::extract_metadata(html);

        assert_eq!(metadata.title.as_deref(), Some("A Title"));
        assert_eq!(metadata.description.as_deref(), Some("Short description."));
    }

    #[test]
    fn test_extract_metadata_missing_fields() {
        let metadata = ExtractionService::extract_metadata("<body>no head</body>");
        assert!(metadata.title.is_none());
        assert!(metadata.description.is_none());
    }
}
