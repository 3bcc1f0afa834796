//! Interactive tutoring session.
//!
//! The conversation lives in a local `Vec<ChatMessage>` for the length of
//! the session; nothing is persisted. Ctrl+C during a reply cancels that
//! reply only. `/exit` or EOF ends the session.

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use tutor_types::chat::ChatMessage;

use super::ask::{cancel_on_ctrl_c, check_grade};
use crate::state::AppState;

/// In-session commands.
#[derive(Debug, PartialEq, Eq)]
enum SessionInput {
    Exit,
    Clear,
    Empty,
    Message(String),
}

fn parse_input(line: &str) -> SessionInput {
    match line.trim() {
        "" => SessionInput::Empty,
        "/exit" | "/quit" => SessionInput::Exit,
        "/clear" => SessionInput::Clear,
        text => SessionInput::Message(text.to_string()),
    }
}

pub async fn run_chat(state: &AppState, grade: i32) -> Result<()> {
    check_grade(grade)?;

    let labels = &state.config.tutor;
    println!();
    println!(
        "  {} Smart Teacher ({}: {grade}, gateway: {})",
        style("📐").bold(),
        style("grade").dim(),
        style(state.tutor.gateway_name()).cyan()
    );
    println!("  {}", style("/clear resets the conversation, /exit quits").dim());
    println!();

    let mut history: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout
            .write_all(format!("{}: ", labels.student_label).as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let message = match parse_input(&line) {
            SessionInput::Exit => break,
            SessionInput::Empty => continue,
            SessionInput::Clear => {
                history.clear();
                println!("  {}", style("Conversation cleared.").dim());
                continue;
            }
            SessionInput::Message(message) => message,
        };

        let (cancel, ctrl_c) = cancel_on_ctrl_c();
        let outcome = state.tutor.chat(&message, grade, &history, &cancel).await;
        ctrl_c.abort();

        match outcome.into_result() {
            Ok(reply) => {
                println!(
                    "{} {}",
                    style(format!("{}:", labels.tutor_label)).cyan().bold(),
                    reply
                );
                history.push(ChatMessage::student(message));
                history.push(ChatMessage::tutor(reply));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Chat turn failed");
                println!("  {} {e}", style("✗").red());
            }
        }
        println!();
    }

    println!("  {}", style("Session ended.").dim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("  "), SessionInput::Empty);
        assert_eq!(parse_input("/exit"), SessionInput::Exit);
        assert_eq!(parse_input("/quit "), SessionInput::Exit);
        assert_eq!(parse_input("/clear"), SessionInput::Clear);
        assert_eq!(
            parse_input(" كم يساوي ٥ + ٣؟ "),
            SessionInput::Message("كم يساوي ٥ + ٣؟".to_string())
        );
    }
}
