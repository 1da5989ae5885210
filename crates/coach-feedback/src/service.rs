//! The feedback service boundary.

use async_trait::async_trait;

/// Text returned when no API key is configured.
pub const SETUP_PLACEHOLDER: &str = "[Setup] Add OPENAI_API_KEY in .env to enable analysis.";

/// Why feedback could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackFailure {
    #[error("no API key configured")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("API returned no content")]
    EmptyResponse,
}

/// Result of a feedback request. Failures carry displayable placeholder text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Generated(String),
    Placeholder {
        failure: FeedbackFailure,
        text: String,
    },
}

impl FeedbackOutcome {
    /// Placeholder text for a failure, in the form shown to coaches.
    pub fn from_failure(failure: FeedbackFailure) -> Self {
        let text = match &failure {
            FeedbackFailure::MissingCredentials => SETUP_PLACEHOLDER.to_string(),
            other => format!("[Feedback API error] {other}"),
        };
        Self::Placeholder { failure, text }
    }

    /// The text to display, generated or not.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::Placeholder { text, .. } => text,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) => text,
            Self::Placeholder { text, .. } => text,
        }
    }
}

/// Produces coaching feedback for one event label.
///
/// Implementations must not fail: every error is reported as
/// [`FeedbackOutcome::Placeholder`].
#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Feedback for `event_label`, optionally informed by player `context`.
    async fn feedback(&self, event_label: &str, context: &str) -> FeedbackOutcome;
}

/// Service used when no credentials are available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledFeedback;

#[async_trait]
impl FeedbackService for DisabledFeedback {
    async fn feedback(&self, _event_label: &str, _context: &str) -> FeedbackOutcome {
        FeedbackOutcome::from_failure(FeedbackFailure::MissingCredentials)
    }
}
