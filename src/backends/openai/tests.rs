use mockito::Matcher;
use serde_json::json;

use super::*;
use crate::chat::{FunctionBuilder, FunctionCall, ParamBuilder};

fn client_for(server: &mockito::Server, system: Option<&str>) -> OpenAI {
    OpenAI::new(
        "test-key",
        Some(server.url()),
        Some("gpt-4o-mini".to_string()),
        None,
        Some(0.0),
        Some(5),
        system.map(str::to_string),
    )
    .unwrap()
}

fn pdf_tool() -> Tool {
    FunctionBuilder::new("pdf_reader_tool")
        .description("Read a PDF")
        .param(ParamBuilder::new("file_path"))
        .required(vec!["file_path".to_string()])
        .build()
}

#[test]
fn missing_api_key_is_rejected() {
    let err = OpenAI::new("", None, None, None, None, None, None).unwrap_err();
    assert!(matches!(err, CvError::AuthError(_)));
}

#[test]
fn base_url_gets_trailing_slash() {
    let url = parse_base_url("http://localhost:8080/v1").unwrap();
    assert_eq!(url.join("chat/completions").unwrap().path(), "/v1/chat/completions");
}

#[test]
fn tool_results_become_tool_role_messages() {
    let result = ToolCall {
        id: "call_1".to_string(),
        call_type: "function".to_string(),
        function: FunctionCall {
            name: "pdf_reader_tool".to_string(),
            arguments: "Jane Doe".to_string(),
        },
    };
    let message = ChatMessage::assistant().tool_result(vec![result]).build();
    let converted = convert_message(&message);
    assert_eq!(converted.len(), 1);
    assert_eq!(
        serde_json::to_value(&converted[0]).unwrap(),
        json!({"role": "tool", "content": "Jane Doe", "tool_call_id": "call_1"})
    );
}

#[tokio::test]
async fn chat_sends_system_prompt_and_parses_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "stream": false,
            "messages": [
                {"role": "system", "content": "You read CVs."},
                {"role": "user", "content": "Who is the candidate?"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{"message": {"role": "assistant", "content": "Jane Doe"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, Some("You read CVs."));
    let messages = [ChatMessage::user().content("Who is the candidate?").build()];
    let response = client.chat(&messages).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text().as_deref(), Some("Jane Doe"));
    assert_eq!(response.usage().map(|u| u.total_tokens), Some(12));
    assert!(response.tool_calls().is_none());
}

#[tokio::test]
async fn chat_with_tools_returns_tool_calls() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "tool_choice": "auto",
            "tools": [{"type": "function", "function": {"name": "pdf_reader_tool"}}]
        })))
        .with_status(200)
        .with_body(
            json!({
                "choices": [{"message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "pdf_reader_tool", "arguments": "{\"file_path\":\"cv.pdf\"}"}
                    }]
                }}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, None);
    let tools = [pdf_tool()];
    let messages = [ChatMessage::user().content("Read cv.pdf").build()];
    let response = client
        .chat_with_tools(&messages, Some(&tools[..]))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(response.text().is_none());
    let calls = response.tool_calls().unwrap();
    assert_eq!(calls[0].function.name, "pdf_reader_tool");
    assert!(response.to_string().contains("pdf_reader_tool"));
}

#[tokio::test]
async fn structured_chat_sends_json_schema_format() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": "criterion_score", "strict": true}
            }
        })))
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"content": "{\"score\": 3}"}}]}).to_string())
        .create_async()
        .await;

    let client = client_for(&server, None);
    let schema = StructuredOutputFormat {
        name: "criterion_score".to_string(),
        description: None,
        schema: Some(json!({"type": "object"})),
        strict: Some(true),
    };
    let messages = [ChatMessage::user().content("score it").build()];
    let response = client.chat_structured(&messages, &schema).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text().as_deref(), Some("{\"score\": 3}"));
}

#[tokio::test]
async fn error_status_keeps_raw_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let client = client_for(&server, None);
    let messages = [ChatMessage::user().content("hi").build()];
    let err = client.chat(&messages).await.unwrap_err();

    match err {
        CvError::ResponseFormatError { raw_response, .. } => {
            assert_eq!(raw_response, "upstream exploded")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unauthorized_status_maps_to_auth_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body("bad key")
        .create_async()
        .await;

    let client = client_for(&server, None);
    let messages = [ChatMessage::user().content("hi").build()];
    let err = client.chat(&messages).await.unwrap_err();
    assert!(matches!(err, CvError::AuthError(_)));
}
