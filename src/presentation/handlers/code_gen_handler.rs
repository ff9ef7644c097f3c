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
use tracing::error;

use crate::application::dto::generate_request::GenerateRequestDto;
use crate::domain::services::code_generation_service::CodeGenerator;

/// 生成代码
pub async fn generate_code(
    Extension(generator): Extension<Arc<CodeGenerator>>,
    Json(payload): Json<GenerateRequestDto>,
) -> impl IntoResponse {
    match generator
        .generate(&payload.project_context, &payload.existing_code, &payload.task)
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": result,
            })),
        ),
        Err(e) => {
            error!("Error generating code: {}", e);
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
