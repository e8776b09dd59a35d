use std::future::Future;

use reqwest::Client;
use thiserror::Error;

use crate::config::Config;
use crate::models::*;

const QUERY_BY: &str = "embedding";
const EXCLUDE_FIELDS: &str = "embedding";
const ZERO_WIDTH_SPACE: char = '\u{200B}';

#[derive(Debug, Error)]
pub enum SearchBackendError {
    #[error("search backend returned {status} {reason}: {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },
    #[error("search backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed search backend response: {0}")]
    Malformed(String),
}

/// Anything that can answer a conversational search turn.
pub trait ConversationBackend {
    fn multi_search(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> impl Future<Output = Result<ConversationResult, SearchBackendError>> + Send;
}

pub struct TypesenseClient {
    client: Client,
    base_url: String,
    api_key: String,
    collection: String,
    conversation_model_id: String,
}

impl TypesenseClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
            conversation_model_id: config.conversation_model_id.clone(),
        })
    }

    fn query_params<'a>(
        &'a self,
        message: &'a str,
        conversation_id: Option<&'a str>,
    ) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("q", message),
            ("conversation", "true"),
            ("conversation_model_id", self.conversation_model_id.as_str()),
        ];
        if let Some(id) = conversation_id.filter(|id| !id.is_empty()) {
            params.push(("conversation_id", id));
        }
        params
    }

    async fn send_multi_search(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ConversationResult, SearchBackendError> {
        let request = MultiSearchRequest {
            searches: vec![SubSearch {
                collection: self.collection.clone(),
                query_by: QUERY_BY.to_string(),
                exclude_fields: EXCLUDE_FIELDS.to_string(),
            }],
        };

        log::info!(
            "multi_search ({}) in {}",
            if conversation_id.is_some() { "continuing" } else { "new conversation" },
            self.collection
        );

        let response = self
            .client
            .post(format!("{}/multi_search", self.base_url))
            .query(&self.query_params(message, conversation_id))
            .header("x-typesense-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("multi_search failed with {}: {}", status, body);
            return Err(SearchBackendError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let raw: MultiSearchResponse = serde_json::from_slice(&bytes)
            .map_err(|e| SearchBackendError::Malformed(e.to_string()))?;

        let result = shape_response(raw)?;
        log::info!(
            "multi_search returned {} hits in {}ms",
            result.hits.len(),
            result.search_time_ms
        );
        Ok(result)
    }
}

impl ConversationBackend for TypesenseClient {
    fn multi_search(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> impl Future<Output = Result<ConversationResult, SearchBackendError>> + Send {
        self.send_multi_search(message, conversation_id)
    }
}

/// Flattens the raw response into what the chat UI consumes.
pub fn shape_response(raw: MultiSearchResponse) -> Result<ConversationResult, SearchBackendError> {
    let conversation = raw
        .conversation
        .ok_or_else(|| SearchBackendError::Malformed("response has no conversation".to_string()))?;

    let first = raw.results.into_iter().next().unwrap_or_default();

    Ok(ConversationResult {
        answer: conversation.answer,
        conversation_id: conversation.conversation_id.filter(|id| !id.is_empty()),
        query: conversation.query,
        found: first.found,
        out_of: first.out_of,
        page: first.page,
        search_time_ms: first.search_time_ms,
        search_cutoff: first.search_cutoff,
        request_params: first.request_params,
        hits: first.hits.into_iter().map(shape_hit).collect(),
    })
}

fn shape_hit(raw: HitPayload) -> Hit {
    let doc = raw.document;
    let snippet = raw.highlights.into_iter().find_map(|h| h.snippet);
    let content = clean_text(&doc.content);

    Hit {
        id: doc.id.clone().or_else(|| doc.object_id.clone()).unwrap_or_default(),
        object_id: doc.object_id.or(doc.id),
        url: doc.url,
        anchor: doc.anchor,
        title: hit_title(&doc.hierarchy),
        kind: doc.kind,
        score: raw.vector_distance,
        snippet: snippet
            .as_deref()
            .map(clean_text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| content.clone()),
        highlight: snippet,
        content,
    }
}

/// Deepest non-empty heading level, lvl3 down to lvl0.
fn hit_title(hierarchy: &Hierarchy) -> String {
    [&hierarchy.lvl3, &hierarchy.lvl2, &hierarchy.lvl1, &hierarchy.lvl0]
        .into_iter()
        .filter_map(|lvl| lvl.as_deref())
        .map(clean_text)
        .find(|title| !title.is_empty())
        .unwrap_or_default()
}

fn clean_text(text: &str) -> String {
    text.replace(ZERO_WIDTH_SPACE, "").trim().to_string()
}
