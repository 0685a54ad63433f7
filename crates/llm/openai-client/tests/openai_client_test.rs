//! Tests for [`openai_client`]: key masking, request message conversion, and the HTTP round trip
//! against a local mockito server standing in for the OpenAI endpoint.

use mockito::Matcher;
use openai_client::{
    mask_token, to_request_message, CompletionApiError, OpenAIClient, TOKEN_CHECK_PROMPT,
};
use prompt::Message;
use serde_json::json;

const REPLY: &str = r#"{
    "id": "chatcmpl-42",
    "object": "chat.completion",
    "created": 1700000000,
    "model": "gpt-3.5-turbo",
    "choices": [{"index": 0, "message": {"role": "assistant", "content": "Arr, matey!"}, "finish_reason": "stop"}],
    "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
}"#;

const BAD_KEY: &str = r#"{
    "error": {
        "message": "Incorrect API key provided: sk-wrong***. You can find your API key at https://platform.openai.com/account/api-keys.",
        "type": "invalid_request_error",
        "param": null,
        "code": "invalid_api_key"
    }
}"#;

/// **Test: Short keys are fully masked; long keys keep 7 head and 4 tail characters.**
#[test]
fn mask_token_hides_the_middle() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("sk-short"), "***");
    assert_eq!(mask_token("sk-proj-abcdefghijklmnop"), "sk-proj***mnop");
    let masked = mask_token("sk-proj-1234567890abcdefghijklmnopqrstuvwxyz");
    assert_eq!(masked.len(), 7 + 3 + 4);
}

/// **Test: Request messages carry role, content and name.**
#[test]
fn request_message_keeps_name() {
    let value = serde_json::to_value(
        to_request_message(&Message::user("hi").with_name("ada")).unwrap(),
    )
    .unwrap();
    assert_eq!(value["role"], "user");
    assert_eq!(value["content"], "hi");
    assert_eq!(value["name"], "ada");

    let value = serde_json::to_value(to_request_message(&Message::system("a pirate")).unwrap())
        .unwrap();
    assert_eq!(value["role"], "system");
    assert!(value.get("name").is_none());
}

/// **Test: A successful completion is parsed and the whole history is posted in order.**
#[tokio::test]
async fn create_chat_completion_posts_history_and_parses_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "system", "content": "a pirate"},
                {"role": "user", "content": "ahoy"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-key-123456".into(), server.url());
    let response = client
        .create_chat_completion(
            "gpt-3.5-turbo",
            &[Message::system("a pirate"), Message::user("ahoy")],
            None,
        )
        .await
        .expect("completion should succeed");

    mock.assert_async().await;
    assert_eq!(response.id, "chatcmpl-42");
    assert_eq!(response.first_content(), Some("Arr, matey!"));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(16));
}

/// **Test: A rejected key is classified as an authentication error.**
#[tokio::test]
async fn rejected_key_is_authentication_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(BAD_KEY)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-wrong".into(), server.url());
    let result = client
        .create_chat_completion("gpt-3.5-turbo", &[Message::user("hi")], None)
        .await;

    match result {
        Err(e) => assert!(e.is_authentication(), "unexpected error: {e}"),
        Ok(_) => panic!("expected authentication failure"),
    }
}

/// **Test: The token check sends the probe prompt with a 5-token budget.**
#[tokio::test]
async fn check_token_sends_probe() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "max_tokens": 5,
            "messages": [{"role": "user", "content": TOKEN_CHECK_PROMPT, "name": "ada"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-key-123456".into(), server.url());
    client
        .check_token("gpt-3.5-turbo", Some("ada"))
        .await
        .expect("token check should pass");
    mock.assert_async().await;
}

/// **Test: A reply with no choices is reported as EmptyChoices.**
#[tokio::test]
async fn empty_choices_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"x","object":"chat.completion","created":1,"model":"m","choices":[]}"#,
        )
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-key-123456".into(), server.url());
    let result = client
        .create_chat_completion("m", &[Message::user("hi")], None)
        .await;
    assert!(matches!(result, Err(CompletionApiError::EmptyChoices)));
}
