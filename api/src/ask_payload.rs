use serde::Deserialize;

#[derive(Deserialize)]
pub struct AskPayload {
    pub message: String,
    pub conversation_id: Option<String>, // echoed back from the previous turn
}
