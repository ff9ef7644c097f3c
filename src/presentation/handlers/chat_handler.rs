// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

use crate::application::dto::chat_request::ChatRequestDto;
use crate::domain::services::chat_service::ChatAssistant;

/// 处理一条会话消息
///
/// 会话记忆是流水线中唯一的可变状态，由互斥锁串行化并发轮次。
pub async fn chat(
    Extension(assistant): Extension<Arc<Mutex<ChatAssistant>>>,
    Json(payload): Json<ChatRequestDto>,
) -> impl IntoResponse {
    let mut assistant = assistant.lock().await;
    match assistant
        .process_message(&payload.message, payload.context.as_deref())
        .await
    {
        Ok(response) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": { "response": response },
            })),
        ),
        Err(e) => {
            error!("Error processing message: {}", e);
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
