use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::api::routes::support::views::WELCOME_MESSAGE;
use crate::core::AppConfig;
use crate::gemini::GeminiClient;
use crate::support::{SendOutcome, SupportSession, SupportStage};

const CLEAR_COMMAND: &str = "/clear";

pub async fn run(config: AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let client = GeminiClient::new(
        &config.gemini_api_hostname,
        &config.gemini_api_key,
        &config.gemini_model,
        config.request_timeout,
    )?;
    let mut session = SupportSession::new();

    loop {
        let prompt = match session.stage() {
            SupportStage::Welcome => {
                println!("{}", WELCOME_MESSAGE);
                "Press enter to start a support session "
            }
            SupportStage::Support => ">>> ",
        };

        match rl.readline(prompt) {
            Ok(line) => match session.stage() {
                SupportStage::Welcome => {
                    session.start();
                    println!("Support session started. Type {} to end it.", CLEAR_COMMAND);
                }
                SupportStage::Support if line.trim() == CLEAR_COMMAND => {
                    session.clear();
                }
                SupportStage::Support => {
                    let _ = rl.add_history_entry(line.as_str());
                    if let SendOutcome::Replied(reply) = session
                        .send(&line, &client, config.context_max_messages)
                        .await
                    {
                        println!("{}", reply);
                    }
                }
            },
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
