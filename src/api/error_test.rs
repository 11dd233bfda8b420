use super::*;

#[test]
fn test_detail_message() {
    assert_eq!(
        detail_message(r#"{"detail": "Conversation not found"}"#).as_deref(),
        Some("Conversation not found")
    );

    let validation = r#"{"detail": [
        {"loc": ["body", "temperature"], "msg": "Input should be less than or equal to 2", "type": "less_than_equal"},
        {"loc": ["body", "message"], "msg": "Field required", "type": "missing"}
    ]}"#;
    assert_eq!(
        detail_message(validation).as_deref(),
        Some("Input should be less than or equal to 2; Field required")
    );

    assert_eq!(detail_message(r#"{"detail": null}"#), None);
    assert_eq!(detail_message(r#"{"detail": ""}"#), None);
    assert_eq!(detail_message(r#"{"error": "boom"}"#), None);
    assert_eq!(detail_message("<html>Bad Gateway</html>"), None);
}

#[test]
fn test_api_error_from_body() {
    let err = ApiError::from_body(503, r#"{"detail": "Ollama is not accessible"}"#);
    assert_eq!(err.http_code, 503);
    assert_eq!(err.to_string(), "Ollama is not accessible");

    let err = ApiError::from_body(502, "Bad Gateway");
    assert_eq!(err.to_string(), "request failed with status 502");

    let err = ApiError::from_body(404, r#"{"detail": "Setting not found"}"#);
    assert_eq!(err.http_code, 404);
    assert_eq!(err.to_string(), "Setting not found");
}
