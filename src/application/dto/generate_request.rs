// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

/// 代码生成请求
#[derive(Debug, Deserialize)]
pub struct GenerateRequestDto {
    /// 项目上下文描述
    pub project_context: String,
    /// 已有代码（可选）
    #[serde(default)]
    pub existing_code: String,
    /// 开发任务描述
    pub task: String,
}
