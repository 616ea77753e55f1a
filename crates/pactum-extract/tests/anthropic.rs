//! Anthropic extractor against a local fake of the Messages API.

use axum::Json;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use pactum_extract::{AnthropicExtractor, ExtractError, ExtractionOptions, Extractor, Provider};
use serde_json::{Value, json};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn fake_messages(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"type": "error", "error": {"message": "bad key"}})),
        );
    }

    let document = &body["messages"][0]["content"][0];
    assert_eq!(document["type"], "document");
    assert_eq!(document["citations"]["enabled"], true);
    assert_eq!(body["model"], "claude-sonnet-4-20250514");

    let source_type = document["source"]["type"].as_str().unwrap_or_default().to_string();

    (
        StatusCode::OK,
        Json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "content": [
                {"type": "text", "text": "```json\n{\"extractedData\": {\"capacity\": 500}, "},
                {
                    "type": "text",
                    "text": format!("\"notes\": [\"{source_type}\"]}}\n```"),
                    "citations": [{"type": "page_location", "cited_text": "500 kW"}]
                }
            ],
            "usage": {"input_tokens": 1200, "output_tokens": 300}
        })),
    )
}

#[tokio::test]
async fn pdf_extraction_collects_text_citations_and_usage() {
    let base = serve(Router::new().route("/v1/messages", post(fake_messages))).await;
    let extractor =
        AnthropicExtractor::new("test-key", "claude-sonnet-4-20250514").with_base_url(base);

    let result = extractor
        .extract(b"%PDF-1.7 fake", "acme.pdf", &ExtractionOptions::default())
        .await
        .unwrap();

    assert_eq!(result.provider, Provider::Anthropic);
    assert_eq!(result.api, "messages");
    assert!(result.text.starts_with("```json"));
    assert!(result.text.contains("\"base64\""));
    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.usage.tokens.input, 1200);
    assert_eq!(result.usage.tokens.output, 300);
    assert!(result.usage.cost_usd > 0.0);
    assert!(result.notes.is_empty());
}

#[tokio::test]
async fn text_documents_are_sent_as_plain_text() {
    let base = serve(Router::new().route("/v1/messages", post(fake_messages))).await;
    let extractor =
        AnthropicExtractor::new("test-key", "claude-sonnet-4-20250514").with_base_url(base);

    let result = extractor
        .extract(b"Capacity: 500 kW", "terms.txt", &ExtractionOptions::default())
        .await
        .unwrap();

    assert!(result.text.contains("\"text\""));
}

#[tokio::test]
async fn api_error_status_is_surfaced() {
    let base = serve(Router::new().route("/v1/messages", post(fake_messages))).await;
    let extractor =
        AnthropicExtractor::new("wrong-key", "claude-sonnet-4-20250514").with_base_url(base);

    let err = extractor
        .extract(b"%PDF-1.7", "acme.pdf", &ExtractionOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::Api { status: 401, .. }));
}

#[tokio::test]
async fn office_formats_are_unsupported() {
    let extractor = AnthropicExtractor::new("test-key", "claude-sonnet-4-20250514")
        .with_base_url("http://127.0.0.1:9");

    let err = extractor
        .extract(b"PK", "acme.docx", &ExtractionOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
}
