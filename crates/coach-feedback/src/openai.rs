//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use courtside_common::config::FeedbackConfig;
use courtside_common::error::{CourtsideError, CourtsideResult};

use crate::service::{FeedbackFailure, FeedbackOutcome, FeedbackService};

const SYSTEM_PROMPT: &str = "\
You are an experienced volleyball coach reviewing match film with a player.
Give precise, actionable feedback on the single play event you are shown.

Write 2 to 4 bullet points and nothing else:
• Observation: what happened, stated plainly
• Improvement: one or two technical or tactical adjustments
• Drill: one named drill that trains the adjustment

Use correct volleyball terminology (OH, MB, libero, transition footwork).
Never ask for more detail and never fall back on generic advice.
When the player's role, jersey number, or focus areas are given, tailor the notes to them.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Feedback from a chat completions endpoint.
pub struct OpenAiFeedback {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiFeedback {
    /// Build a client from configuration, reading the key from the configured variable.
    pub fn from_config(config: &FeedbackConfig) -> CourtsideResult<Self> {
        Self::with_api_key(config, config.api_key())
    }

    /// Build a client with an explicit key. `None` yields setup placeholders.
    pub fn with_api_key(config: &FeedbackConfig, api_key: Option<String>) -> CourtsideResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| CourtsideError::feedback(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request(
        &self,
        api_key: &str,
        event_label: &str,
        context: &str,
    ) -> Result<String, FeedbackFailure> {
        let user_prompt = user_prompt(event_label, context);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FeedbackFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedbackFailure::Api {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| FeedbackFailure::Transport(format!("invalid response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(FeedbackFailure::EmptyResponse)
    }
}

#[async_trait]
impl FeedbackService for OpenAiFeedback {
    async fn feedback(&self, event_label: &str, context: &str) -> FeedbackOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            return FeedbackOutcome::from_failure(FeedbackFailure::MissingCredentials);
        };

        match self.request(api_key, event_label, context).await {
            Ok(text) => {
                tracing::debug!(model = %self.model, event = event_label, "Feedback generated");
                FeedbackOutcome::Generated(text)
            }
            Err(failure) => {
                tracing::warn!(model = %self.model, event = event_label, error = %failure, "Feedback request failed");
                FeedbackOutcome::from_failure(failure)
            }
        }
    }
}

fn user_prompt(event_label: &str, context: &str) -> String {
    let mut prompt = format!(
        "Analyze this detected moment from a volleyball video:\n- Event: {event_label}\n"
    );
    let context = context.trim();
    if !context.is_empty() {
        prompt.push_str(&format!("- Player/context: {context}\n"));
    }
    prompt.push_str(
        "\nReturn:\n\
         • Brief observation\n\
         • 1–2 actionable improvements (mechanics, decision, or positioning)\n\
         • Optional drill suggestion\n",
    );
    prompt
}
