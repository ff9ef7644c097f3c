// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 按字符数截断字符串
///
/// 截断发生在字符边界上，多字节字符不会被切断。
///
/// # 参数
///
/// * `text` - 输入文本
/// * `max_chars` - 最大字符数
///
/// # 返回值
///
/// 截断后的字符串切片
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// 将连续空白折叠为单个空格
///
/// 包括换行和制表符在内的所有空白序列都被折叠，首尾空白被去除。
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 从生成的文本中提取第一个围栏代码块
///
/// 扫描成对的 ``` 围栏标记，开头围栏上的语言标签被忽略。
/// 未配对的围栏视为没有代码块，畸形输入不会导致错误。
///
/// # 参数
///
/// * `text` - 模型生成的文本
///
/// # 返回值
///
/// * `Some(String)` - 第一个完整代码块的内容
/// * `None` - 没有找到成对的围栏
pub fn extract_code_block(text: &str) -> Option<String> {
    const FENCE: &str = "```";

    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];

    // The opening fence may carry a language tag up to the end of line
    let body_start = match after_open.find('\n') {
        Some(idx) => idx + 1,
        // Opening fence with no newline after it cannot enclose a block
        None => return None,
    };
    let body = &after_open[body_start..];

    let close = body.find(FENCE)?;
    Some(body[..close].trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_than_limit() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_at_limit() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte_boundary() {
        // Each CJK char is 3 bytes; a byte slice at 4 would panic
        assert_eq!(truncate_chars("你好世界", 2), "你好");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  a\n\tb   c  "),
            "a b c".to_string()
        );
    }

    #[test]
    fn test_extract_code_block_with_language_tag() {
        let text = "Here is the code:\n```python\ndef hello():\n    pass\n```\nDone.";
        assert_eq!(
            extract_code_block(text),
            Some("def hello():\n    pass".to_string())
        );
    }

    #[test]
    fn test_extract_code_block_without_language_tag() {
        let text = "```\nlet x = 1;\n```";
        assert_eq!(extract_code_block(text), Some("let x = 1;".to_string()));
    }

    #[test]
    fn test_extract_code_block_unpaired_fence() {
        assert_eq!(extract_code_block("```python\ndef broken():"), None);
    }

    #[test]
    fn test_extract_code_block_no_fence() {
        assert_eq!(extract_code_block("plain prose, no code"), None);
    }

    #[test]
    fn test_extract_code_block_empty_block() {
        assert_eq!(extract_code_block("```\n```"), Some(String::new()));
    }
}
