// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::config::settings::{LlmSettings, ModelSettings};
    use crate::infrastructure::llm::perplexity_client::{
        ChatMessage, LlmError, PerplexityClient, Purpose,
    };
    use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
    use tokio::net::TcpListener;

    fn test_models() -> ModelSettings {
        ModelSettings {
            code: "sonar-pro".to_string(),
            web: "sonar-deep-research".to_string(),
            chat: "sonar".to_string(),
        }
    }

    async fn start_test_server() -> String {
        let app = Router::new()
            .route(
                "/chat/completions",
                post(|| async {
                    Json(serde_json::json!({
                        "model": "sonar",
                        "choices": [
                            {"message": {"role": "assistant", "content": "Summary of test content"}}
                        ],
                        "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
                    }))
                }),
            )
            .route(
                "/no-choices/chat/completions",
                post(|| async { Json(serde_json::json!({"model": "sonar", "usage": {}})) }),
            )
            .route(
                "/unauthorized/chat/completions",
                post(|| async {
                    (StatusCode::UNAUTHORIZED, "invalid api key").into_response()
                }),
            )
            .route(
                "/no-usage/chat/completions",
                post(|| async {
                    Json(serde_json::json!({
                        "choices": [
                            {"message": {"role": "assistant", "content": "hello"}}
                        ]
                    }))
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_missing_api_key_fails_at_construction() {
        let settings = LlmSettings {
            api_key: None,
            base_url: "https://api.perplexity.ai".to_string(),
            temperature: 0.7,
            models: test_models(),
        };
        let result = PerplexityClient::new(&settings);
        assert!(matches!(result, Err(LlmError::MissingApiKey)));

        let settings = LlmSettings {
            api_key: Some(String::new()),
            base_url: "https://api.perplexity.ai".to_string(),
            temperature: 0.7,
            models: test_models(),
        };
        assert!(matches!(
            PerplexityClient::new(&settings),
            Err(LlmError::MissingApiKey)
        ));
    }

    #[test]
    fn test_model_table_lookup() {
        let client = PerplexityClient::new_with_config(
            "test-key".to_string(),
            "http://127.0.0.1:9".to_string(),
            test_models(),
        )
        .unwrap();

        assert_eq!(client.model_for(Purpose::Code), "sonar-pro");
        assert_eq!(client.model_for(Purpose::Web), "sonar-deep-research");
        assert_eq!(client.model_for(Purpose::Chat), "sonar");
    }

    #[tokio::test]
    async fn test_generate_completion_parses_content_and_usage() {
        let base_url = start_test_server().await;
        let client =
            PerplexityClient::new_with_config("test-key".to_string(), base_url, test_models())
                .unwrap();

        let completion = client
            .generate_completion("sonar", &[ChatMessage::user("summarize")], 0.7, 2000)
            .await
            .unwrap();

        assert_eq!(completion.content, "Summary of test content");
        assert_eq!(completion.model, "sonar");
        assert_eq!(completion.usage.prompt_tokens, 12);
        assert_eq!(completion.usage.completion_tokens, 8);
        assert_eq!(completion.usage.total_tokens, 20);
    }

    #[tokio::test]
    async fn test_generate_completion_missing_choices_is_error_not_panic() {
        let base_url = start_test_server().await;
        let client = PerplexityClient::new_with_config(
            "test-key".to_string(),
            format!("{}/no-choices", base_url),
            test_models(),
        )
        .unwrap();

        let result = client
            .generate_completion("sonar", &[ChatMessage::user("hi")], 0.7, 2000)
            .await;

        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_generate_completion_unauthorized_is_distinct() {
        let base_url = start_test_server().await;
        let client = PerplexityClient::new_with_config(
            "bad-key".to_string(),
            format!("{}/unauthorized", base_url),
            test_models(),
        )
        .unwrap();

        let result = client
            .generate_completion("sonar", &[ChatMessage::user("hi")], 0.7, 2000)
            .await;

        match result {
            Err(LlmError::Unauthorized(msg)) => assert!(msg.contains("invalid api key")),
            other => panic!("expected Unauthorized, got {:?}", other.map(|c| c.content)),
        }
    }

    #[tokio::test]
    async fn test_generate_completion_without_usage_defaults_to_zero() {
        let base_url = start_test_server().await;
        let client = PerplexityClient::new_with_config(
            "test-key".to_string(),
            format!("{}/no-usage", base_url),
            test_models(),
        )
        .unwrap();

        let completion = client
            .generate_completion("sonar", &[ChatMessage::user("hi")], 0.7, 2000)
            .await
            .unwrap();

        assert_eq!(completion.content, "hello");
        // Endpoint model field absent falls back to the requested model
        assert_eq!(completion.model, "sonar");
        assert_eq!(completion.usage.total_tokens, 0);
    }
}
