pub mod config;
pub mod gemini;
pub mod mock;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use config::AiConfig;
pub use gemini::GeminiClient;
pub use mock::MockAssistant;

use async_trait::async_trait;
use thiserror::Error;
use zenboard_core::Task;

/// Shown when a summary request fails for any reason.
pub const SUMMARY_ERROR_MESSAGE: &str = "Could not generate summary at this time.";

/// Used when the model answers a summary request with no text.
pub const EMPTY_SUMMARY_FALLBACK: &str = "Keep up the great work!";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no API key configured (set GEMINI_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode model response: {0}")]
    Decode(String),
}

/// A text-generation backend the board can ask for help.
///
/// Both calls are one-shot: no retry, no cancellation. Callers decide how to
/// present failures.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// Model name for display, if the backend has one.
    fn model_hint(&self) -> Option<&str> {
        None
    }

    /// Suggest 3-5 subtask titles for a task. A response that is not a JSON
    /// array of strings yields an empty list rather than an error.
    async fn generate_subtasks(&self, task_title: &str) -> Result<Vec<String>, AiError>;

    /// A short motivational progress summary of the whole board.
    async fn board_summary(&self, tasks: &[Task]) -> Result<String, AiError>;
}
