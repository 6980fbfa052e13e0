//! Console dialog implementation.

use async_trait::async_trait;
use std::io::Write;

use weightlog_core::Dialog;

/// Dialogs answered on stdin.
#[derive(Debug, Default)]
pub struct ConsoleDialog;

impl ConsoleDialog {
    pub fn new() -> Self {
        Self
    }
}

fn ask(prompt: String) -> String {
    print!("{}", prompt);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

#[async_trait]
impl Dialog for ConsoleDialog {
    async fn confirm(&self, message: &str) -> bool {
        let prompt = format!("{} [y/N]: ", message);
        let answer = tokio::task::spawn_blocking(move || ask(prompt))
            .await
            .unwrap_or_default();
        matches!(answer.to_lowercase().as_str(), "y" | "yes")
    }

    async fn prompt(&self, message: &str) -> Option<String> {
        let prompt = format!("{}: ", message);
        let answer = tokio::task::spawn_blocking(move || ask(prompt))
            .await
            .unwrap_or_default();
        if answer.is_empty() {
            None
        } else {
            Some(answer)
        }
    }
}
