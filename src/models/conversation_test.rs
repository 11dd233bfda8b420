use super::*;

#[test]
fn test_deserialize_conversation() {
    let body = r#"{
        "id": 5,
        "title": "Rust lifetimes",
        "model": "llama3.2:3b",
        "created_at": "2024-05-01T10:15:30.000001",
        "updated_at": "2024-05-02T08:00:00",
        "message_count": 4
    }"#;

    let convo: Conversation = serde_json::from_str(body).expect("failed to parse conversation");
    assert_eq!(convo.id(), 5);
    assert_eq!(convo.title(), "Rust lifetimes");
    assert_eq!(convo.model(), "llama3.2:3b");
    assert_eq!(convo.message_count(), 4);
    assert!(convo.updated_at() > convo.created_at());
}

#[test]
fn test_new_conversation_falls_back_to_default_title() {
    let req = NewConversation::new("   ", "llama3.2:3b");
    assert_eq!(req.title, NEW_CONVERSATION_TITLE);

    let req = NewConversation::new("Notes", "llama3.2:3b");
    let body = serde_json::to_value(&req).expect("failed to serialize");
    assert_eq!(
        body,
        serde_json::json!({"title": "Notes", "model": "llama3.2:3b"})
    );

    let req = req.with_system_prompt("Be brief");
    let body = serde_json::to_value(&req).expect("failed to serialize");
    assert_eq!(body["system_prompt"], "Be brief");
}

#[test]
fn test_default_page() {
    let page = Page::default();
    assert_eq!(page.skip, 0);
    assert_eq!(page.limit, 50);
    assert_eq!(Page::new(10, 5), Page { skip: 10, limit: 5 });
}
