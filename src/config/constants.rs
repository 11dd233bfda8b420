pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Every route except the root health probe lives under this prefix
pub const API_PREFIX: &str = "/api";

pub const DEFAULT_MODEL: &str = "llama3.2:3b";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const DEFAULT_TOP_P: f32 = 0.9;

/// Conversations fetched per list request
pub const PAGE_SIZE: usize = 50;

pub const NEW_CONVERSATION_TITLE: &str = "New Conversation";

pub const LOG_FILE_PATH: &str = "/tmp/llmlocal.log";
