pub mod models;
pub mod config;
pub mod reference_matcher;
pub mod hit_lookup;
pub mod reference_replacer;
pub mod conversation_client;
pub mod chat_session;

pub use models::*;
pub use config::Config;
pub use reference_matcher::{extract_all_reference_ids, extract_first_reference_id, find_references, ReferenceMatch};
pub use hit_lookup::{find_hit, unique_hits};
pub use reference_replacer::{parse_and_replace_references, parse_and_replace_references_with};
pub use conversation_client::{ConversationBackend, SearchBackendError, TypesenseClient};
pub use chat_session::{ChatSession, TurnState};
