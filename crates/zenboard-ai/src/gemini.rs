use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};
use zenboard_core::Task;
use zenboard_prompts::PromptKind;

use crate::{AiConfig, AiError, Assistant, EMPTY_SUMMARY_FALLBACK};

// -- Wire types --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    pub fn text(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part { text: prompt }],
            }],
            generation_config: None,
        }
    }

    /// Constrain the answer to a JSON array of strings.
    pub fn string_array(prompt: String) -> Self {
        Self {
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
            }),
            ..Self::text(prompt)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, empty if there is none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<String>())
            .unwrap_or_default()
    }
}

/// Parse a breakdown answer. Anything but a JSON array of strings is logged
/// and treated as "no suggestions".
pub fn parse_subtasks(text: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(text.trim()) {
        Ok(titles) => titles,
        Err(e) => {
            error!("failed to parse AI subtask response: {e}");
            Vec::new()
        }
    }
}

/// Trim a summary answer, falling back to a fixed line when it is empty.
pub fn summary_or_fallback(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        EMPTY_SUMMARY_FALLBACK.to_string()
    } else {
        text.to_string()
    }
}

// -- Client --

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Transport(format!("build client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn generate(
        &self,
        kind: PromptKind,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AiError> {
        let key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        debug!(kind = kind.as_str(), model = %self.model, "sending generateContent");
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(request)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(kind = kind.as_str(), %status, "generateContent failed");
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        resp.json::<GenerateResponse>()
            .await
            .map_err(|e| AiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model_hint(&self) -> Option<&str> {
        Some(&self.model)
    }

    async fn generate_subtasks(&self, task_title: &str) -> Result<Vec<String>, AiError> {
        let request = GenerateRequest::string_array(zenboard_prompts::subtasks::build(task_title));
        let resp = self.generate(PromptKind::Subtasks, &request).await?;
        let titles = parse_subtasks(&resp.text());
        info!(count = titles.len(), "subtask suggestions received");
        Ok(titles)
    }

    async fn board_summary(&self, tasks: &[Task]) -> Result<String, AiError> {
        let request = GenerateRequest::text(zenboard_prompts::summary::build(tasks));
        let resp = self.generate(PromptKind::Summary, &request).await?;
        Ok(summary_or_fallback(&resp.text()))
    }
}
