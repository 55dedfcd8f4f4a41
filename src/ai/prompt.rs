//! Reusable prompts using Handlebars for templating. Handlebars adds
//! additional security controls since it can't do much out of the box
//! without registering your own helpers. Prompt templates are rendered
//! without HTML escaping so user text reaches the model verbatim.

use std::fmt;
use std::sync::LazyLock;

use handlebars::Handlebars;
use serde_json::json;

use crate::support::models::Transcript;

/// Context placeholder used when there is no conversation yet.
pub const INITIAL_CONTEXT: &str = "Initial inquiry";

#[derive(Debug)]
pub enum Prompt {
    SupportSpecialist,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

const SUPPORT_SPECIALIST_PROMPT: &str = r"
You are an expert laser manufacturing support specialist.
Context: {{context}}

Key Guidelines:
1. Provide specific, actionable solutions
2. Include safety considerations
3. Mention when escalation to technical support is needed
4. Ask for clarification if needed

User Input: {{user_input}}

Respond in a clear, structured manner with:
1. Issue identification
2. Immediate steps to take
3. Preventive measures
4. Safety warnings if applicable
";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(
            &Prompt::SupportSpecialist.to_string(),
            SUPPORT_SPECIALIST_PROMPT,
        )
        .expect("Failed to register template");
    registry
}

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(templates);

/// Wrap the user's text and the conversation so far in the support
/// specialist instructions. A missing or empty context renders as
/// `Initial inquiry`.
pub fn build_prompt(user_input: &str, context: Option<&str>) -> String {
    let context = context
        .filter(|c| !c.is_empty())
        .unwrap_or(INITIAL_CONTEXT);
    // Every variable in the template is always supplied
    TEMPLATES
        .render(
            &Prompt::SupportSpecialist.to_string(),
            &json!({ "context": context, "user_input": user_input }),
        )
        .expect("Failed to render support prompt")
}

/// Serialize the most recent `max_messages` entries of the transcript
/// into the context block of the prompt, one `Role: content` entry per
/// message.
pub fn serialize_context(transcript: &Transcript, max_messages: usize) -> String {
    let skip = transcript.len().saturating_sub(max_messages);
    transcript
        .iter()
        .skip(skip)
        .map(|msg| msg.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
