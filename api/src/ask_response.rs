use askdocs::Hit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub answer_html: String,
    pub conversation_id: Option<String>,
    pub hits: Vec<Hit>,
    pub found: u64,
    pub out_of: u64,
    pub search_time_ms: u64,
}
