use std::borrow::Cow;

use crate::conversation_client::ConversationBackend;
use crate::models::{Hit, Message, Role};
use crate::reference_replacer::parse_and_replace_references;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Sending,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            hits: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, hits: Vec<Hit>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            hits,
        }
    }

    /// Content with citation markers linked against this message's own hits.
    pub fn rendered(&self) -> Cow<'_, str> {
        match self.role {
            Role::User => Cow::Borrowed(&self.content),
            Role::Assistant => parse_and_replace_references(&self.content, &self.hits),
        }
    }
}

/// One open chat dialog: the ordered message list plus the server-side
/// conversation id that ties its turns together.
///
/// `send` takes `&mut self`, so at most one turn is ever in flight.
pub struct ChatSession<B> {
    backend: B,
    messages: Vec<Message>,
    conversation_id: Option<String>,
    state: TurnState,
}

impl<B: ConversationBackend> ChatSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            messages: Vec::new(),
            conversation_id: None,
            state: TurnState::Idle,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == TurnState::Sending
    }

    /// Runs one turn and returns the assistant reply appended for it.
    ///
    /// Backend failures become an assistant message holding the error text.
    /// Blank input is ignored.
    pub async fn send(&mut self, text: &str) -> Option<&Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.messages.push(Message::user(text));
        self.state = TurnState::Sending;

        let outcome = self
            .backend
            .multi_search(text, self.conversation_id.as_deref())
            .await;

        let reply = match outcome {
            Ok(result) => {
                if let Some(id) = result.conversation_id {
                    self.conversation_id = Some(id);
                }
                Message::assistant(result.answer, result.hits)
            }
            Err(e) => {
                log::error!("Chat turn failed: {}", e);
                Message::assistant(e.to_string(), Vec::new())
            }
        };

        self.messages.push(reply);
        self.state = TurnState::Idle;
        self.messages.last()
    }

    /// Forgets every message and the conversation id. Also the way back to
    /// `Idle` when a `send` future was dropped before it finished.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.conversation_id = None;
        self.state = TurnState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation_client::SearchBackendError;
    use crate::models::ConversationResult;
    use std::future::{pending, Future};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays canned results and records the conversation id sent with each call.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<ConversationResult, SearchBackendError>>>,
        seen_ids: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedBackend {
        fn new(mut replies: Vec<Result<ConversationResult, SearchBackendError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                seen_ids: Mutex::new(Vec::new()),
            }
        }
    }

    impl ConversationBackend for ScriptedBackend {
        fn multi_search(
            &self,
            _message: &str,
            conversation_id: Option<&str>,
        ) -> impl Future<Output = Result<ConversationResult, SearchBackendError>> + Send {
            self.seen_ids
                .lock()
                .unwrap()
                .push(conversation_id.map(str::to_string));
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(SearchBackendError::Malformed("script exhausted".into())));
            async move { reply }
        }
    }

    /// Never answers, so a turn stays in flight until its future is dropped.
    struct SilentBackend;

    impl ConversationBackend for SilentBackend {
        fn multi_search(
            &self,
            _message: &str,
            _conversation_id: Option<&str>,
        ) -> impl Future<Output = Result<ConversationResult, SearchBackendError>> + Send {
            pending::<Result<ConversationResult, SearchBackendError>>()
        }
    }

    fn answer(text: &str, conversation_id: &str, hits: Vec<Hit>) -> ConversationResult {
        ConversationResult {
            answer: text.to_string(),
            conversation_id: Some(conversation_id.to_string()),
            hits,
            ..Default::default()
        }
    }

    fn hit(id: &str, url: &str) -> Hit {
        Hit {
            id: id.into(),
            url: url.into(),
            title: "T".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_turn_starts_conversation_and_later_turns_echo_id() {
        let backend = ScriptedBackend::new(vec![
            Ok(answer("one", "conv-9", vec![])),
            Ok(answer("two", "conv-9", vec![])),
        ]);
        let mut session = ChatSession::new(backend);

        session.send("first").await;
        assert_eq!(session.conversation_id(), Some("conv-9"));
        session.send("second").await;

        let seen = session.backend.seen_ids.lock().unwrap().clone();
        assert_eq!(seen, vec![None, Some("conv-9".to_string())]);
        assert_eq!(session.messages().len(), 4);
        assert_eq!(session.messages()[0].role, Role::User);
        assert_eq!(session.messages()[3].content, "two");
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_failed_turn_appends_error_as_assistant_message() {
        let backend = ScriptedBackend::new(vec![Err(SearchBackendError::Status {
            status: 503,
            reason: "Service Unavailable".into(),
            body: "try later".into(),
        })]);
        let mut session = ChatSession::new(backend);

        let reply = session.send("hello").await.cloned().unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.contains("503"));
        assert!(reply.content.contains("try later"));
        assert!(reply.hits.is_empty());
        assert_eq!(session.state(), TurnState::Idle);
        assert!(session.conversation_id().is_none());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut session = ChatSession::new(ScriptedBackend::default());
        assert!(session.send("   ").await.is_none());
        assert!(session.messages().is_empty());
        assert!(session.backend.seen_ids.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_conversation() {
        let backend = ScriptedBackend::new(vec![
            Ok(answer("one", "conv-1", vec![])),
            Ok(answer("fresh", "conv-2", vec![])),
        ]);
        let mut session = ChatSession::new(backend);

        session.send("q").await;
        session.clear();
        assert!(session.messages().is_empty());
        assert!(session.conversation_id().is_none());

        session.send("again").await;
        let seen = session.backend.seen_ids.lock().unwrap().clone();
        assert_eq!(seen, vec![None, None]);
        assert_eq!(session.conversation_id(), Some("conv-2"));
    }

    #[tokio::test]
    async fn test_dropped_turn_recovers_through_clear() {
        let mut session = ChatSession::new(SilentBackend);

        let timed_out = tokio::time::timeout(Duration::from_millis(50), session.send("hello"))
            .await
            .is_err();
        assert!(timed_out);
        assert_eq!(session.state(), TurnState::Sending);
        assert!(session.is_loading());
        assert_eq!(session.messages().len(), 1);

        session.clear();
        assert_eq!(session.state(), TurnState::Idle);
        assert!(!session.is_loading());
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_assistant_reply_renders_links() {
        let backend = ScriptedBackend::new(vec![Ok(answer(
            "See [[5]].",
            "c",
            vec![hit("5", "/five")],
        ))]);
        let mut session = ChatSession::new(backend);

        let reply = session.send("where?").await.unwrap();
        assert_eq!(
            reply.rendered(),
            r#"See <a href="/five" target="_blank" title="T">5</a>."#
        );
        assert_eq!(session.messages()[0].rendered(), "where?");
    }

    #[test]
    fn test_user_message_is_not_rewritten() {
        let mut msg = Message::user("cite (Ref: 5)");
        msg.hits = vec![hit("5", "/five")];
        assert_eq!(msg.rendered(), "cite (Ref: 5)");
    }
}
