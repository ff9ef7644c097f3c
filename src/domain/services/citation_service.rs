// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::Regex;
use std::collections::HashSet;

use crate::domain::models::scrape_result::Citation;
use crate::utils::text_processing::collapse_whitespace;

/// 标记没有说明文本时使用的占位符
pub const CITATION_PLACEHOLDER: &str = "No citation details available";

/// 引用提取服务
///
/// 在生成的研究文本中按固定的标记模式 `[n]` 定位引用。
/// 这是尽力而为的文本启发式，不是正式的引用解析器：
/// 嵌套或畸形的标记不保证恢复出相邻内容。
pub struct CitationService;

impl CitationService {
    /// 从生成文本中提取引用
    ///
    /// 标记号去重后保留首次出现；每个标记的说明文本取该标记与
    /// 下一个标记（或文本末尾）之间的内容，为空时代以固定占位符。
    ///
    /// # 参数
    ///
    /// * `prose` - 模型生成的文本
    ///
    /// # 返回值
    ///
    /// 按首次出现顺序排列的引用列表
    pub fn extract_citations(prose: &str) -> Vec<Citation> {
        let marker_pattern = Regex::new(r"\[(\d+)\]").unwrap();

        let markers: Vec<(u32, usize, usize)> = marker_pattern
            .captures_iter(prose)
            .filter_map(|captures| {
                let full = captures.get(0)?;
                let id = captures.get(1)?.as_str().parse::<u32>().ok()?;
                Some((id, full.start(), full.end()))
            })
            .collect();

        let mut seen = HashSet::new();
        let mut citations = Vec::new();

        for (index, (id, _, end)) in markers.iter().enumerate() {
            if !seen.insert(*id) {
                continue;
            }

            let details_end = markers
                .get(index + 1)
                .map(|(_, next_start, _)| *next_start)
                .unwrap_or(prose.len());
            let details = collapse_whitespace(&prose[*end..details_end]);

            citations.push(Citation {
                marker: *id,
                details: if details.is_empty() {
                    CITATION_PLACEHOLDER.to_string()
                } else {
                    details
                },
            });
        }

        citations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_citations_with_details() {
        let prose = "[1] First source explains the protocol. [2] Second source disagrees.";

        let citations = CitationService::extract_citations(prose);

        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].marker, 1);
        assert_eq!(
            citations[0].details,
            "First source explains the protocol."
        );
        assert_eq!(citations[1].marker, 2);
        assert_eq!(citations[1].details, "Second source disagrees.");
    }

    #[test]
    fn test_adjacent_markers_get_placeholder_not_crash() {
        let prose = "Results [1][2] were consistent.";

        let citations = CitationService::extract_citations(prose);

        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].marker, 1);
        assert_eq!(citations[0].details, CITATION_PLACEHOLDER);
        assert_eq!(citations[1].details, "were consistent.");
    }

    #[test]
    fn test_markers_deduplicated_first_occurrence_wins() {
        let prose = "[1] primary detail [2] other [1] repeated mention";

        let citations = CitationService::extract_citations(prose);

        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].marker, 1);
        assert_eq!(citations[0].details, "primary detail");
        assert_eq!(citations[1].marker, 2);
        assert_eq!(citations[1].details, "other");
    }

    #[test]
    fn test_trailing_marker_without_details() {
        let prose = "All evidence points the same way [3]";

        let citations = CitationService::extract_citations(prose);

        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].marker, 3);
        assert_eq!(citations[0].details, CITATION_PLACEHOLDER);
    }

    #[test]
    fn test_no_markers_returns_empty() {
        assert!(CitationService::extract_citations("plain prose").is_empty());
    }

    #[test]
    fn test_non_numeric_brackets_ignored() {
        let prose = "[note] aside [1] real citation";

        let citations = CitationService::extract_citations(prose);

        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].marker, 1);
        assert_eq!(citations[0].details, "real citation");
    }
}
