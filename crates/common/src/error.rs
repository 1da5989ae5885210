//! Error types shared across Courtside crates.

/// Top-level error type for Courtside operations.
#[derive(Debug, thiserror::Error)]
pub enum CourtsideError {
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("Feedback error: {message}")]
    Feedback { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CourtsideError.
pub type CourtsideResult<T> = Result<T, CourtsideError>;

/// Whether a failure ends the current invocation or only the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The input cannot be processed at all; retrying the same input cannot help.
    Fatal,
    /// Only the current step failed; the surrounding run can continue.
    Recoverable,
}

impl CourtsideError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }

    pub fn feedback(msg: impl Into<String>) -> Self {
        Self::Feedback {
            message: msg.into(),
        }
    }

    /// Classify the error for callers deciding between abort and continue.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Processing { .. } | Self::Feedback { .. } => Severity::Recoverable,
            Self::Decode { .. } | Self::Io(_) | Self::Json(_) | Self::Other(_) => Severity::Fatal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }
}
