use crate::config::constants::{
    API_PREFIX, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, LOG_FILE_PATH, PAGE_SIZE,
};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    assert_eq!(config.general.verbose, true);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("debug"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("llmlocal::store"));
    assert_eq!(log_filters[0].level.as_deref(), Some("trace"));
    assert_eq!(log.file.path, "/var/log/llmlocal.log");
    assert_eq!(log.file.append, true);

    let server = &config.server;
    assert_eq!(server.endpoint, "http://10.0.0.5:8000");
    assert_eq!(server.api_prefix, "/v2/api");
    assert_eq!(server.timeout_secs, Some(30));
    assert_eq!(server.timeout(), Some(std::time::Duration::from_secs(30)));

    let chat = &config.chat;
    assert_eq!(chat.default_model, "qwen2.5:7b");
    assert_eq!(chat.temperature, 0.2);
    assert_eq!(chat.top_p, 0.5);
    assert_eq!(chat.max_tokens, Some(1024));
    assert_eq!(
        chat.system_prompt.as_deref(),
        Some("You are a terse assistant.")
    );
    assert_eq!(chat.page_size, 20);
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config =
        load_configuration("./testdata/config_with_default.toml").expect("failed to load config");

    assert_eq!(config.general.verbose, false);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("info"));
    assert_eq!(log.file.path, LOG_FILE_PATH);

    assert_eq!(config.server.endpoint, "http://127.0.0.1:9000");
    assert_eq!(config.server.api_prefix, API_PREFIX);
    assert_eq!(config.server.timeout(), None);

    let chat = &config.chat;
    assert_eq!(chat.default_model, DEFAULT_MODEL);
    assert_eq!(chat.temperature, DEFAULT_TEMPERATURE);
    assert_eq!(chat.top_p, DEFAULT_TOP_P);
    assert_eq!(chat.max_tokens, Some(256));
    assert_eq!(chat.system_prompt, None);
    assert_eq!(chat.page_size, PAGE_SIZE);
}

#[test]
fn test_load_configuration_missing_file() {
    let err = load_configuration("./testdata/does-not-exist.toml").unwrap_err();
    assert_eq!(err.to_string(), "reading ./testdata/does-not-exist.toml");
}

#[test]
fn test_resolve_path() {
    let ret = resolve_path("$LLMLOCAL_UNSET_DIR/${LLMLOCAL_UNSET_NAME}/config.toml")
        .expect("failed to resolve path");
    assert_eq!(ret, std::path::PathBuf::from("//config.toml"));

    unsafe {
        std::env::set_var("LLMLOCAL_LOG_DIR", "/tmp/test");
        std::env::set_var("LLMLOCAL_LOG_NAME", "chat_1");
    }
    let ret = resolve_path("$LLMLOCAL_LOG_DIR/${LLMLOCAL_LOG_NAME}.log")
        .expect("failed to resolve path");
    assert_eq!(ret, std::path::PathBuf::from("/tmp/test/chat_1.log"));

    let ret = resolve_path("llmlocal.log").expect("failed to resolve path");
    assert!(ret.is_absolute());
    assert!(ret.ends_with("llmlocal.log"));
}

#[test]
fn test_basename() {
    assert_eq!(basename("src/store/mod.rs"), "mod.rs");
    assert_eq!(basename("main.rs"), "main.rs");
}

#[test]
fn test_parse_level() {
    assert_eq!(parse_level(None).unwrap(), LevelFilter::Info);
    assert_eq!(parse_level(Some("TRACE")).unwrap(), LevelFilter::Trace);
    assert_eq!(
        parse_level(Some("loud")).unwrap_err().to_string(),
        "invalid log level \"loud\""
    );
}

#[test]
fn test_config_candidates_order() {
    let candidates = config_candidates(
        Some(PathBuf::from("/xdg")),
        Some(PathBuf::from("/home/me")),
    );
    assert_eq!(
        candidates,
        vec![
            PathBuf::from("/xdg/llmlocal/config.toml"),
            PathBuf::from("/home/me/.config/llmlocal/config.toml"),
            PathBuf::from("/home/me/.llmlocal.toml"),
        ]
    );

    let candidates = config_candidates(None, Some(PathBuf::from("/home/me")));
    assert_eq!(candidates.len(), 2);
    assert!(config_candidates(None, None).is_empty());
}
