//! Per-session support state and the welcome/support transitions.
//!
//! Every UI session owns one `SupportSession`. Nothing here is shared
//! between sessions.

use crate::ai::prompt::{build_prompt, serialize_context};
use crate::gemini::{ModelClient, get_response};

use super::models::{ChatMessage, SupportStage, Transcript};

/// What happened when the user pressed send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The input was empty or whitespace. Nothing changed.
    Ignored,
    /// Send is only available on the support screen.
    NotInSupport,
    /// The assistant's reply (or the fallback message) was appended.
    Replied(String),
}

#[derive(Debug, Default, Clone)]
pub struct SupportSession {
    stage: SupportStage,
    transcript: Transcript,
}

impl SupportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> SupportStage {
        self.stage
    }

    /// Moving to welcome drops the transcript, there is no conversation
    /// outside the support screen.
    pub fn set_stage(&mut self, stage: SupportStage) {
        if stage == SupportStage::Welcome {
            self.clear_transcript();
        }
        self.stage = stage;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Messages are only recorded on the support screen.
    pub fn append_message(&mut self, msg: ChatMessage) {
        if self.stage != SupportStage::Support {
            tracing::warn!("Dropping message appended outside a support session");
            return;
        }
        self.transcript.push(msg);
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Welcome -> support with an empty transcript.
    pub fn start(&mut self) {
        self.clear_transcript();
        self.set_stage(SupportStage::Support);
    }

    /// Support -> welcome, dropping the conversation.
    pub fn clear(&mut self) {
        self.set_stage(SupportStage::Welcome);
    }

    /// Run one chat turn. The prompt context is the transcript
    /// including the new user message, limited to the latest
    /// `context_max_messages` entries.
    pub async fn send(
        &mut self,
        input: &str,
        client: &dyn ModelClient,
        context_max_messages: usize,
    ) -> SendOutcome {
        if self.stage != SupportStage::Support {
            return SendOutcome::NotInSupport;
        }
        if input.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        self.append_message(ChatMessage::user(input));
        let context = serialize_context(&self.transcript, context_max_messages);
        let prompt = build_prompt(input, Some(&context));

        tracing::debug!(
            "Sending support message ({} messages in transcript)",
            self.transcript.len()
        );
        let reply = get_response(client, &prompt).await;
        self.append_message(ChatMessage::assistant(&reply));

        SendOutcome::Replied(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::gemini::{FALLBACK_RESPONSE, ModelCallError};

    /// Returns a canned reply and records every prompt it receives.
    struct StubClient {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(vec![]),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(vec![]),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for StubClient {
        async fn generate(&self, prompt: &str) -> Result<String, ModelCallError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(ModelCallError::network)
        }
    }

    fn in_support() -> SupportSession {
        let mut session = SupportSession::new();
        session.start();
        session
    }

    #[test]
    fn it_starts_a_session() {
        let mut session = SupportSession::new();
        assert_eq!(session.stage(), SupportStage::Welcome);

        session.start();

        assert_eq!(session.stage(), SupportStage::Support);
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn it_appends_a_user_and_assistant_turn() {
        let client = StubClient::replying("Check the power cable.");
        let mut session = in_support();

        let outcome = session.send("laser won't power on", &client, 20).await;

        assert_eq!(
            outcome,
            SendOutcome::Replied("Check the power cable.".to_string())
        );
        assert_eq!(
            session.transcript().messages(),
            &[
                ChatMessage::user("laser won't power on"),
                ChatMessage::assistant("Check the power cable."),
            ]
        );
    }

    #[tokio::test]
    async fn it_includes_the_conversation_in_the_prompt() {
        let client = StubClient::replying("ok");
        let mut session = in_support();

        session.send("first question", &client, 20).await;
        session.send("second question", &client, 20).await;

        let prompts = client.prompts.lock().unwrap();
        assert!(prompts[0].contains("Context: User: first question"));
        assert!(prompts[1].contains("User: first question\nAssistant: ok\nUser: second question"));
        assert!(prompts[1].contains("User Input: second question"));
    }

    #[tokio::test]
    async fn it_limits_the_prompt_context() {
        let client = StubClient::replying("ok");
        let mut session = in_support();

        session.send("first question", &client, 2).await;
        session.send("second question", &client, 2).await;

        let prompts = client.prompts.lock().unwrap();
        assert!(!prompts[1].contains("first question"));
        assert!(prompts[1].contains("Assistant: ok\nUser: second question"));
    }

    #[tokio::test]
    async fn it_appends_the_fallback_on_model_failure() {
        let client = StubClient::failing("quota exceeded");
        let mut session = in_support();

        let outcome = session.send("help", &client, 20).await;

        assert_eq!(outcome, SendOutcome::Replied(FALLBACK_RESPONSE.to_string()));
        assert_eq!(
            session.transcript().messages().last(),
            Some(&ChatMessage::assistant(FALLBACK_RESPONSE))
        );
    }

    #[tokio::test]
    async fn it_ignores_blank_input() {
        let client = StubClient::replying("unused");
        let mut session = in_support();

        for input in ["", "   ", "\n\t"] {
            assert_eq!(session.send(input, &client, 20).await, SendOutcome::Ignored);
        }

        assert!(session.transcript().is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn it_refuses_to_send_from_the_welcome_screen() {
        let client = StubClient::replying("unused");
        let mut session = SupportSession::new();

        let outcome = session.send("hello", &client, 20).await;

        assert_eq!(outcome, SendOutcome::NotInSupport);
        assert!(session.transcript().is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn it_clears_back_to_welcome() {
        let client = StubClient::replying("ok");
        let mut session = in_support();
        session.send("hello", &client, 20).await;
        assert!(!session.transcript().is_empty());

        session.clear();

        assert_eq!(session.stage(), SupportStage::Welcome);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn it_does_not_enforce_alternation() {
        let mut session = in_support();
        session.append_message(ChatMessage::user("one"));
        session.append_message(ChatMessage::user("two"));
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn it_drops_the_transcript_when_set_to_welcome() {
        let mut session = in_support();
        session.append_message(ChatMessage::user("hello"));

        session.set_stage(SupportStage::Welcome);

        assert_eq!(session.stage(), SupportStage::Welcome);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn it_keeps_the_transcript_empty_on_the_welcome_screen() {
        let mut session = SupportSession::new();
        session.append_message(ChatMessage::user("hello"));
        assert!(session.transcript().is_empty());
    }
}
