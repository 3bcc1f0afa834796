//! One-shot `ask` and `hint` commands.

use anyhow::{Result, ensure};
use console::style;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use tutor_types::outcome::Outcome;

use crate::http::handlers::tutor::GRADE_RANGE;
use crate::state::AppState;

/// Token cancelled on Ctrl+C until the returned handle is aborted.
pub(crate) fn cancel_on_ctrl_c() -> (CancellationToken, JoinHandle<()>) {
    let token = CancellationToken::new();
    let child = token.clone();
    let handle = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    (token, handle)
}

pub(crate) fn check_grade(grade: i32) -> Result<()> {
    ensure!(
        GRADE_RANGE.contains(&grade),
        "grade must be between {} and {}, got {grade}",
        GRADE_RANGE.start(),
        GRADE_RANGE.end()
    );
    Ok(())
}

/// Answer a single student message with no prior history.
pub async fn ask(state: &AppState, message: &str, grade: i32, json: bool) -> Result<()> {
    check_grade(grade)?;

    let (cancel, ctrl_c) = cancel_on_ctrl_c();
    let outcome = state.tutor.chat(message, grade, &[], &cancel).await;
    ctrl_c.abort();

    print_reply(state, outcome, "response", json)
}

/// Give one hint for a problem.
pub async fn hint(state: &AppState, problem: &str, grade: i32, json: bool) -> Result<()> {
    check_grade(grade)?;

    let (cancel, ctrl_c) = cancel_on_ctrl_c();
    let outcome = state.tutor.hint(problem, grade, &cancel).await;
    ctrl_c.abort();

    print_reply(state, outcome, "hint", json)
}

fn print_reply(state: &AppState, outcome: Outcome<String>, key: &str, json: bool) -> Result<()> {
    let reply = outcome.into_result()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ key: reply }))?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(format!("{}:", state.config.tutor.tutor_label)).cyan().bold(),
        reply
    );
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_grade() {
        assert!(check_grade(1).is_ok());
        assert!(check_grade(12).is_ok());
        assert!(check_grade(0).is_err());
        assert!(check_grade(13).is_err());
    }

    #[tokio::test]
    async fn test_ctrl_c_token_starts_uncancelled() {
        let (token, handle) = cancel_on_ctrl_c();
        assert!(!token.is_cancelled());
        handle.abort();
    }
}
