// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::perplexity_client::TokenUsage;

/// 出站链接
///
/// 只保留绝对HTTP(S)地址的锚元素，按文档顺序排列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// 链接地址
    pub url: String,
    /// 锚文本（已去除首尾空白）
    pub text: String,
}

/// 引用条目
///
/// 从研究文本中按标记模式提取，同一结果内按标记号去重。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 标记号
    pub marker: u32,
    /// 说明文本，缺失时为固定占位符
    pub details: String,
}

/// 抓取结果
///
/// 一次抓取请求产生的结果数据，构造后不可变，不跨请求共享。
/// 文本长度和链接数量在返回或持久化之前总是被截断到固定上限。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// 来源URL
    pub url: String,
    /// 提取的正文文本（截断后）
    pub content: String,
    /// 出站链接列表（截断后）
    pub links: Vec<Link>,
    /// 生成的摘要
    pub summary: String,
    /// 生成摘要的模型，短文本直通时为空
    pub model: Option<String>,
    /// 令牌使用情况
    pub usage: TokenUsage,
}

/// 深度研究结果
///
/// 研究变体把URL本身交给模型并从生成文本中提取引用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    /// 研究目标URL
    pub url: String,
    /// 页面标题（来自元数据抓取）
    pub title: Option<String>,
    /// 模型生成的研究文本
    pub analysis: String,
    /// 提取的引用列表
    pub citations: Vec<Citation>,
    /// 使用的模型
    pub model: String,
    /// 令牌使用情况
    pub usage: TokenUsage,
}
