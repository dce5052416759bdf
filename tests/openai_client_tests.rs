//! Wire-level tests for the chat-completions client.

use futures::StreamExt;
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use envgym::client::{ChatClient, ChatRequest, OpenAiClient, ToolCallAggregator};
use envgym::error::HarnessError;
use envgym::tools::ToolDescriptor;
use envgym::types::{ChatDelta, ChatMessage, InferenceSettings};

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new("gpt-4o-mini", "test-key", Some(server.uri()))
}

fn request_with_tools() -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::system("You are a build agent."),
            ChatMessage::user("What time is it?"),
        ],
        settings: InferenceSettings::harness_defaults(),
        tools: Some(vec![ToolDescriptor {
            name: "get_time".into(),
            description: "Current time".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        }]),
    }
}

fn text_completion_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop",
        }]
    })
}

#[tokio::test]
async fn batch_request_carries_the_full_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "stream": false,
            "max_tokens": 1000,
            "temperature": 0.7,
            "top_p": 0.9,
            "tool_choice": "auto",
            "messages": [
                { "role": "system", "content": "You are a build agent." },
                { "role": "user", "content": "What time is it?" },
            ],
            "tools": [{
                "type": "function",
                "function": {
                    "name": "get_time",
                    "description": "Current time",
                }
            }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_completion_body("noon")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete(&request_with_tools())
        .await
        .unwrap();

    assert_eq!(reply.content, "noon");
    assert!(reply.tool_calls.is_empty());
}

#[tokio::test]
async fn batch_response_tool_calls_keep_raw_argument_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "get_time",
                            "arguments": "{\"zone\": \"UTC\"}",
                        }
                    }]
                },
                "finish_reason": "tool_calls",
            }]
        })))
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete(&request_with_tools())
        .await
        .unwrap();

    assert_eq!(reply.content, "");
    assert_eq!(reply.tool_calls.len(), 1);
    assert_eq!(reply.tool_calls[0].id, "call_abc");
    assert_eq!(reply.tool_calls[0].name, "get_time");
    assert_eq!(reply.tool_calls[0].arguments, "{\"zone\": \"UTC\"}");
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(&request_with_tools())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Authentication(_)));
}

#[tokio::test]
async fn server_error_surfaces_once_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(&request_with_tools())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Api { status: 500, .. }));
    // Mock expectation of exactly one request is verified on drop.
}

#[tokio::test]
async fn empty_choices_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(&request_with_tools())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Api { .. }));
}

#[tokio::test]
async fn stream_yields_text_deltas_in_arrival_order() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":null}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body, "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut stream = client_for(&server)
        .complete_stream(&request_with_tools())
        .await
        .unwrap();

    let mut deltas = Vec::new();
    while let Some(delta) = stream.next().await {
        deltas.push(delta.unwrap());
    }

    assert_eq!(
        deltas,
        vec![
            ChatDelta::Text("Hel".into()),
            ChatDelta::Text("lo".into()),
            ChatDelta::Done,
        ]
    );
}

#[tokio::test]
async fn fragmented_tool_call_reassembles_byte_identically() {
    let server = MockServer::start().await;
    // One logical call split across many argument fragments, including
    // single-character pieces.
    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_1\",\"function\":{\"name\":\"run_dockerfile\",\"arguments\":\"\"}}]},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"{\\\"dockerfile\\\":\"}}]},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\" \\\"envgym/envgym\"}}]},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\".dockerfile\\\"\"}}]},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"}\"}}]},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body, "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut stream = client_for(&server)
        .complete_stream(&request_with_tools())
        .await
        .unwrap();

    let mut aggregator = ToolCallAggregator::new();
    while let Some(delta) = stream.next().await {
        match delta.unwrap() {
            ChatDelta::ToolCall(fragment) => aggregator.apply(&fragment),
            ChatDelta::Done => break,
            ChatDelta::Text(_) => {}
        }
    }

    let calls = aggregator.finish();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_1");
    assert_eq!(calls[0].name, "run_dockerfile");
    assert_eq!(
        calls[0].arguments,
        "{\"dockerfile\": \"envgym/envgym.dockerfile\"}"
    );
}

#[tokio::test]
async fn keep_alive_and_unparseable_chunks_are_skipped() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        ": keep-alive\n\n",
        "data: not json\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"},\"finish_reason\":null}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body, "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut stream = client_for(&server)
        .complete_stream(&request_with_tools())
        .await
        .unwrap();

    let mut deltas = Vec::new();
    while let Some(delta) = stream.next().await {
        deltas.push(delta.unwrap());
    }

    assert_eq!(deltas, vec![ChatDelta::Text("ok".into()), ChatDelta::Done]);
}
