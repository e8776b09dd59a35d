use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One search result document, shaped for the chat UI and the reference replacer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hit {
    pub id: String,
    #[serde(rename = "objectID", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub url: String,
    pub anchor: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    /// Vector distance, lower is more relevant.
    pub score: Option<f64>,
    /// Marked-up excerpt as returned by the backend.
    pub highlight: Option<String>,
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<Hit>,
}

/// Simplified result of one conversational multi-search call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationResult {
    pub answer: String,
    pub conversation_id: Option<String>,
    pub query: Option<String>,
    pub found: u64,
    pub out_of: u64,
    pub page: u64,
    pub search_time_ms: u64,
    pub search_cutoff: bool,
    pub request_params: Option<Value>,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}

// Wire format of the hosted multi_search endpoint.

#[derive(Debug, Serialize)]
pub struct MultiSearchRequest {
    pub searches: Vec<SubSearch>,
}

#[derive(Debug, Serialize)]
pub struct SubSearch {
    pub collection: String,
    pub query_by: String,
    pub exclude_fields: String,
}

#[derive(Debug, Deserialize)]
pub struct MultiSearchResponse {
    pub conversation: Option<ConversationPayload>,
    #[serde(default)]
    pub results: Vec<SearchResultPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationPayload {
    #[serde(default)]
    pub answer: String,
    pub conversation_id: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchResultPayload {
    pub found: u64,
    pub out_of: u64,
    pub page: u64,
    pub request_params: Option<Value>,
    pub search_cutoff: bool,
    pub search_time_ms: u64,
    pub hits: Vec<HitPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HitPayload {
    pub document: DocumentPayload,
    pub vector_distance: Option<f64>,
    pub highlights: Vec<HighlightPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DocumentPayload {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "objectID", deserialize_with = "string_or_number")]
    pub object_id: Option<String>,
    pub url: String,
    pub anchor: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hierarchy: Hierarchy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Hierarchy {
    pub lvl0: Option<String>,
    pub lvl1: Option<String>,
    pub lvl2: Option<String>,
    pub lvl3: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HighlightPayload {
    pub snippet: Option<String>,
}

/// Document ids arrive as either JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
