pub mod chat;
pub mod conversation;
pub mod document;
pub mod event;
pub mod health;
pub mod message;
pub mod model;
pub mod notice;
pub mod settings;

pub use chat::{ChatParameters, ChatReply, ChatRequest};
pub use conversation::{Conversation, ConversationId, NewConversation, Page};
pub use document::{DocumentFile, FileStats, LibraryStats, SearchHit, SearchQuery};
pub use event::{ArcEventTx, Event, EventTx};
pub use health::Health;
pub use message::{Message, MessageId, Role};
pub use model::{Model, ModelDetails, human_size};
pub use notice::*;
pub use settings::{Setting, SettingUpdate, SettingsMap};
