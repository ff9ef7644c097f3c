// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

/// 抓取请求
///
/// 抓取和深度研究共用同一请求形状。
#[derive(Debug, Deserialize)]
pub struct ScrapeRequestDto {
    /// 目标URL
    pub url: String,
}
