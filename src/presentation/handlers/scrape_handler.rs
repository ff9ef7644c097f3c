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

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

use crate::application::dto::scrape_request::ScrapeRequestDto;
use crate::domain::services::scrape_service::WebScraper;

/// 抓取并摘要一个网页
///
/// 调用方总是收到填充好的结果或单条错误字符串，从不收到崩溃。
pub async fn create_scrape(
    Extension(scraper): Extension<Arc<WebScraper>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> impl IntoResponse {
    match scraper.scrape(&payload.url).await {
        Ok(result) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": result,
            })),
        ),
        Err(e) => {
            error!("Error scraping website: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                })),
            )
        }
    }
}

/// 对一个网页执行深度研究
pub async fn create_research(
    Extension(scraper): Extension<Arc<WebScraper>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> impl IntoResponse {
    match scraper.deep_research(&payload.url).await {
        Ok(result) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": result,
            })),
        ),
        Err(e) => {
            error!("Error researching website: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                })),
            )
        }
    }
}
