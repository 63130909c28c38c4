use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use zenboard_core::Task;

use crate::{AiError, Assistant};

/// A canned assistant for tests and offline sessions.
///
/// `None` for a reply makes that call fail with a transport error.
pub struct MockAssistant {
    subtasks: Option<Vec<String>>,
    summary: Option<String>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self {
            subtasks: Some(vec!["Outline".into(), "Draft".into(), "Review".into()]),
            summary: Some("Great progress! Focus on the documentation next.".into()),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subtasks(mut self, titles: &[&str]) -> Self {
        self.subtasks = Some(titles.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn failing_subtasks(mut self) -> Self {
        self.subtasks = None;
        self
    }

    pub fn with_summary(mut self, text: &str) -> Self {
        self.summary = Some(text.to_string());
        self
    }

    pub fn failing_summary(mut self) -> Self {
        self.summary = None;
        self
    }

    /// Sleep this long before answering, to keep a request in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every call made so far, as `"subtasks:<title>"` or `"summary:<n tasks>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    fn name(&self) -> &str {
        "mock"
    }

    fn model_hint(&self) -> Option<&str> {
        Some("mock")
    }

    async fn generate_subtasks(&self, task_title: &str) -> Result<Vec<String>, AiError> {
        self.record(format!("subtasks:{task_title}"));
        self.pause().await;
        self.subtasks
            .clone()
            .ok_or_else(|| AiError::Transport("mock failure".into()))
    }

    async fn board_summary(&self, tasks: &[Task]) -> Result<String, AiError> {
        self.record(format!("summary:{}", tasks.len()));
        self.pause().await;
        self.summary
            .clone()
            .ok_or_else(|| AiError::Transport("mock failure".into()))
    }
}
