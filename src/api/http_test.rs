use mockito::Matcher;
use serde_json::json;

use super::*;
use crate::models::{ChatParameters, MessageId, Role, SearchQuery, SettingUpdate};

fn setup_api(url: String) -> HttpApi {
    let mut api = HttpApi::default().with_endpoint(&url);
    api.init().expect("failed to init api");
    api
}

#[tokio::test]
async fn test_health() {
    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status": "healthy", "service": "llmlocal-api", "version": "1.0.0"}"#)
        .create_async()
        .await;

    let api = setup_api(server.url());
    let health = api.health().await.expect("failed to check health");
    assert!(health.is_healthy());
    assert_eq!(health.metadata["service"], "llmlocal-api");
    handler.assert_async().await;
}

#[tokio::test]
async fn test_chat_health_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/chat/health")
        .with_status(503)
        .with_body(r#"{"detail": "Ollama is not accessible"}"#)
        .create_async()
        .await;

    let api = setup_api(server.url());
    let err = api.chat_health().await.unwrap_err();
    assert_eq!(err.to_string(), "Ollama is not accessible");
    let api_err = err.downcast_ref::<ApiError>().expect("expected an api error");
    assert_eq!(api_err.http_code, 503);
}

#[tokio::test]
async fn test_list_models() {
    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("GET", "/api/chat/models")
        .with_status(200)
        .with_body(
            json!({
                "models": [
                    {"name": "llama3.2:3b", "size": 2019393189, "digest": "a80c4f17acd5"},
                    {"model": "nomic-embed-text", "size": 274302450, "digest": "0a109f422b47"}
                ]
            })
            .to_string(),
        )
        .expect_at_most(1)
        .create_async()
        .await;

    let api = setup_api(server.url());
    let models = api.list_models().await.expect("failed to list models");
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name(), "llama3.2:3b");
    assert_eq!(models[1].name(), "nomic-embed-text");
    handler.assert_async().await;
}

#[tokio::test]
async fn test_list_conversations_sends_page() {
    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("GET", "/api/chat/conversations")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("skip".into(), "10".into()),
            Matcher::UrlEncoded("limit".into(), "20".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "conversations": [{
                    "id": 3,
                    "title": "Trip planning",
                    "model": "llama3.2:3b",
                    "created_at": "2024-05-01T10:00:00",
                    "updated_at": "2024-05-01T11:00:00",
                    "message_count": 6
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = setup_api(server.url());
    let conversations = api
        .list_conversations(Page::new(10, 20))
        .await
        .expect("failed to list conversations");
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].id(), 3);
    assert_eq!(conversations[0].message_count(), 6);
    handler.assert_async().await;
}

#[tokio::test]
async fn test_create_conversation() {
    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("POST", "/api/chat/conversations")
        .match_body(Matcher::Json(json!({"title": "Notes", "model": "llama3.2:3b"})))
        .with_status(200)
        .with_body(
            json!({
                "id": 11,
                "title": "Notes",
                "model": "llama3.2:3b",
                "created_at": "2024-05-01T10:00:00",
                "updated_at": "2024-05-01T10:00:00",
                "message_count": 0
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = setup_api(server.url());
    let convo = api
        .create_conversation(NewConversation::new("Notes", "llama3.2:3b"))
        .await
        .expect("failed to create conversation");
    assert_eq!(convo.id(), 11);
    assert_eq!(convo.title(), "Notes");
    handler.assert_async().await;
}

#[tokio::test]
async fn test_delete_missing_conversation() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/api/chat/conversations/42")
        .with_status(404)
        .with_body(r#"{"detail": "Conversation not found"}"#)
        .create_async()
        .await;

    let api = setup_api(server.url());
    let err = api.delete_conversation(42).await.unwrap_err();
    assert_eq!(err.to_string(), "Conversation not found");
    assert_eq!(err.downcast_ref::<ApiError>().unwrap().http_code, 404);
}

#[tokio::test]
async fn test_list_messages() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/chat/conversations/5/messages")
        .with_status(200)
        .with_body(
            json!({
                "messages": [
                    {"id": 1, "role": "user", "content": "Hello", "created_at": "2024-05-01T10:00:00", "token_count": 1},
                    {"id": 2, "role": "assistant", "content": "Hi!", "created_at": "2024-05-01T10:00:01", "token_count": 2}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = setup_api(server.url());
    let messages = api.list_messages(5).await.expect("failed to list messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id(), MessageId::Remote(1));
    assert_eq!(messages[0].role(), Role::User);
    assert_eq!(messages[1].role(), Role::Assistant);
    assert_eq!(messages[1].content(), "Hi!");
}

#[tokio::test]
async fn test_chat_without_stream() {
    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("POST", "/api/chat/chat")
        .match_body(Matcher::PartialJson(json!({
            "conversation_id": 5,
            "message": "Hello",
            "stream": false
        })))
        .with_status(200)
        .with_body(r#"{"conversation_id": 5, "message": "Hi there", "model": "llama3.2:3b"}"#)
        .create_async()
        .await;

    let api = setup_api(server.url());
    let params = ChatParameters::default().with_model("llama3.2:3b");
    let reply = api
        .chat(ChatRequest::new(Some(5), "Hello", &params).with_stream(true))
        .await
        .expect("failed to chat");
    assert_eq!(reply.message, "Hi there");
    handler.assert_async().await;
}

#[tokio::test]
async fn test_settings_roundtrip() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/settings")
        .with_status(200)
        .with_body(
            json!({"settings": {"ollama_default_model": "llama3.2:3b", "rag_top_k_results": 5}})
                .to_string(),
        )
        .create_async()
        .await;
    let update_handler = server
        .mock("POST", "/api/settings")
        .match_body(Matcher::Json(json!({"key": "rag_top_k_results", "value": 8})))
        .with_status(200)
        .with_body(
            json!({
                "key": "rag_top_k_results",
                "value": 8,
                "description": null,
                "updated_at": "2024-05-01T10:00:00"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let delete_handler = server
        .mock("DELETE", "/api/settings/rag_top_k_results")
        .with_status(200)
        .with_body(r#"{"message": "Setting 'rag_top_k_results' deleted successfully"}"#)
        .create_async()
        .await;

    let api = setup_api(server.url());
    let settings = api.get_settings().await.expect("failed to get settings");
    assert_eq!(settings["ollama_default_model"], "llama3.2:3b");
    assert_eq!(settings["rag_top_k_results"], 5);

    let setting = api
        .update_setting(&SettingUpdate::parse("rag_top_k_results", "8"))
        .await
        .expect("failed to update setting");
    assert_eq!(setting.value, 8);
    assert_eq!(setting.description, None);

    api.delete_setting("rag_top_k_results")
        .await
        .expect("failed to delete setting");
    update_handler.assert_async().await;
    delete_handler.assert_async().await;
}

#[tokio::test]
async fn test_search_documents() {
    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("POST", "/api/rag/search")
        .match_body(Matcher::Json(json!({"query": "tokio runtime", "n_results": 3, "file_ids": [2]})))
        .with_status(200)
        .with_body(
            json!([
                {"content": "The runtime drives futures.", "filename": "notes.md", "chunk_id": 4, "distance": 0.12}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let api = setup_api(server.url());
    let hits = api
        .search_documents(&SearchQuery::new("tokio runtime", 3).with_file_ids(vec![2]))
        .await
        .expect("failed to search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].filename, "notes.md");
    assert_eq!(hits[0].chunk_id, 4);
    assert_eq!(hits[0].distance, Some(0.12));
    handler.assert_async().await;
}

#[tokio::test]
async fn test_custom_api_prefix() {
    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("GET", "/v2/chat/models")
        .with_status(200)
        .with_body(r#"{"models": []}"#)
        .create_async()
        .await;

    let mut api = HttpApi::default()
        .with_endpoint(&format!("{}/", server.url()))
        .with_api_prefix("v2/");
    api.init().expect("failed to init api");
    let models = api.list_models().await.expect("failed to list models");
    assert!(models.is_empty());
    handler.assert_async().await;
}

#[test]
fn test_init_rejects_bad_endpoint() {
    let mut api = HttpApi::default().with_endpoint("not a url");
    let err = api.init().unwrap_err();
    assert_eq!(err.to_string(), "parsing endpoint not a url");
}
