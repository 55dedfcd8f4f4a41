//! Server-rendered pages for the welcome and support screens. Unlike
//! the prompt templates these keep Handlebars' HTML escaping on since
//! both user input and model output end up in the page.

use std::path::Path;
use std::sync::LazyLock;

use handlebars::{Handlebars, RenderError};
use serde_json::json;
use thiserror::Error;

use crate::support::{SupportSession, SupportStage};

pub const WELCOME_MESSAGE: &str =
    "Welcome to LaserTech Support Assistant! How can I assist you today?";

#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("Logo not found at {0}")]
    Missing(String),
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>LaserTech Support Assistant</title>
<style>
  main { max-width: 800px; margin: 0 auto; padding: 1rem; font-family: sans-serif; }
  .logo-container { text-align: center; margin-bottom: 2rem; }
  .logo-container img { width: 200px; height: auto; }
  h1, .welcome { text-align: center; }
  form.action button { display: block; margin: 1rem auto; width: 200px; }
  .chat-message { margin: 1rem 0; padding: 1rem; border-radius: 10px; white-space: pre-wrap; }
  .user-message { background-color: #e3f2fd; margin-left: 20%; }
  .assistant-message { background-color: #f5f5f5; margin-right: 20%; }
  textarea { width: 100%; height: 100px; }
</style>
</head>
<body>
<main>
{{#if show_logo}}
  <div class="logo-container"><img src="/logo" alt="LaserTech"></div>
{{/if}}
  <h1>LaserTech Support Assistant</h1>
{{#if support}}
  <div id="transcript">
  {{#each messages}}
    {{#if is_user}}
    <div class="chat-message user-message">&#128100; <strong>You:</strong> {{content}}</div>
    {{else}}
    <div class="chat-message assistant-message">&#129302; <strong>Assistant:</strong> {{content}}</div>
    {{/if}}
  {{/each}}
  </div>
  <form method="post" action="/send">
    <textarea name="message" placeholder="Type your message here..."></textarea>
    <button type="submit">Send</button>
  </form>
  <form class="action" method="post" action="/clear">
    <button type="submit">Clear Chat History</button>
  </form>
{{else}}
  <p class="welcome">{{welcome_message}}</p>
  <form class="action" method="post" action="/start">
    <button type="submit">Start Support Session</button>
  </form>
{{/if}}
</main>
</body>
</html>
"#;

const PAGE: &str = "SupportPage";

fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(PAGE, PAGE_TEMPLATE)
        .expect("Failed to register template");
    registry
}

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(templates);

/// Check the logo is readable before linking to it.
pub fn check_logo(logo_path: &str) -> Result<(), AssetLoadError> {
    if Path::new(logo_path).is_file() {
        Ok(())
    } else {
        Err(AssetLoadError::Missing(logo_path.to_string()))
    }
}

/// Render the screen for the session's current stage. A missing logo
/// is skipped with a warning rather than failing the page.
pub fn render_page(session: &SupportSession, logo_path: &str) -> Result<String, RenderError> {
    let show_logo = match check_logo(logo_path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    };

    let messages: Vec<_> = session
        .transcript()
        .iter()
        .map(|msg| json!({ "is_user": msg.is_user(), "content": msg.content() }))
        .collect();

    TEMPLATES.render(
        PAGE,
        &json!({
            "show_logo": show_logo,
            "support": session.stage() == SupportStage::Support,
            "welcome_message": WELCOME_MESSAGE,
            "messages": messages,
        }),
    )
}
