// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

/// 会话请求
#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    /// 用户消息
    pub message: String,
    /// 可选的上下文信息
    #[serde(default)]
    pub context: Option<String>,
}
