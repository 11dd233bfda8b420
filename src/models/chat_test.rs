use serde_json::json;

use super::*;

#[test]
fn test_chat_request_wire_format() {
    let params = ChatParameters::default().with_model("llama3.2:3b");
    let req = ChatRequest::new(None, "Hello", &params).with_stream(true);

    let body = serde_json::to_value(&req).expect("failed to serialize");
    assert_eq!(
        body,
        json!({
            "message": "Hello",
            "model": "llama3.2:3b",
            "temperature": 0.7f32,
            "top_p": 0.9f32,
            "stream": true,
        })
    );

    let params = params
        .with_max_tokens(Some(128))
        .with_system_prompt(Some("Answer in French".to_string()));
    let req = ChatRequest::new(Some(5), "Bonjour", &params);
    let body = serde_json::to_value(&req).expect("failed to serialize");
    assert_eq!(body["conversation_id"], 5);
    assert_eq!(body["max_tokens"], 128);
    assert_eq!(body["stream"], false);
    assert_eq!(body["system_prompt"], "Answer in French");
}

#[test]
fn test_parameters_from_config() {
    let mut config = ChatConfig::default();
    config.default_model = "mistral:7b".to_string();
    config.temperature = 1.1;
    config.max_tokens = Some(64);

    let params = ChatParameters::from(&config);
    assert_eq!(params.model.as_deref(), Some("mistral:7b"));
    assert_eq!(params.temperature, 1.1);
    assert_eq!(params.top_p, DEFAULT_TOP_P);
    assert_eq!(params.max_tokens, Some(64));
    assert_eq!(params.system_prompt, None);
}

#[test]
fn test_validate_parameters() {
    assert!(ChatParameters::default().validate().is_ok());
    assert!(
        ChatParameters::default()
            .with_temperature(2.0)
            .with_top_p(0.0)
            .validate()
            .is_ok()
    );

    let err = ChatParameters::default()
        .with_temperature(2.5)
        .validate()
        .unwrap_err();
    assert_eq!(err.to_string(), "temperature must be between 0 and 2, got 2.5");

    let err = ChatParameters::default()
        .with_top_p(1.5)
        .validate()
        .unwrap_err();
    assert_eq!(err.to_string(), "top_p must be between 0 and 1, got 1.5");

    let err = ChatParameters::default()
        .with_max_tokens(Some(0))
        .validate()
        .unwrap_err();
    assert_eq!(err.to_string(), "max_tokens must be at least 1");

    assert!(ChatParameters::default().with_model(" ").validate().is_err());
}

#[test]
fn test_deserialize_chat_reply() {
    let reply: ChatReply = serde_json::from_str(
        r#"{"conversation_id": 9, "message": "Sure.", "model": "llama3.2:3b"}"#,
    )
    .expect("failed to parse reply");
    assert_eq!(reply.conversation_id, 9);
    assert_eq!(reply.message, "Sure.");
    assert_eq!(reply.model, "llama3.2:3b");
}
