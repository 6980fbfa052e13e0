//! User-facing dialog capability.
//!
//! Confirmation and prompt dialogs are injected so flows that need a user
//! response (delete confirmation, BMI weight prompt) stay testable with a
//! scripted fake.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

/// An asynchronous yes/no or value-returning dialog.
#[async_trait]
pub trait Dialog: Send + Sync {
    /// Asks a yes/no question; resolves once the user responds.
    async fn confirm(&self, message: &str) -> bool;

    /// Asks for a value; `None` means the user cancelled.
    async fn prompt(&self, message: &str) -> Option<String>;
}

/// Scripted dialog for tests: answers are queued up front and consumed in
/// order. An exhausted queue declines/cancels.
#[derive(Debug, Default)]
pub struct ScriptedDialog {
    confirms: Mutex<VecDeque<bool>>,
    prompts: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_confirm(&self, answer: bool) {
        self.confirms.lock().unwrap().push_back(answer);
    }

    pub fn push_prompt(&self, answer: Option<&str>) {
        self.prompts
            .lock()
            .unwrap()
            .push_back(answer.map(String::from));
    }
}

#[async_trait]
impl Dialog for ScriptedDialog {
    async fn confirm(&self, _message: &str) -> bool {
        self.confirms.lock().unwrap().pop_front().unwrap_or(false)
    }

    async fn prompt(&self, _message: &str) -> Option<String> {
        self.prompts.lock().unwrap().pop_front().flatten()
    }
}
