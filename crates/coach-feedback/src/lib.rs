//! Courtside Coach Feedback
//!
//! Turns a detected play event into short coaching notes:
//! - **Service:** The `FeedbackService` boundary and its outcome types
//! - **Context:** Player details folded into the request
//! - **OpenAI:** Client for any OpenAI-compatible chat completions API
//!
//! Feedback never fails an analysis run. Every failure becomes a
//! placeholder text tagged with the reason.

pub mod context;
pub mod openai;
pub mod service;

pub use context::CoachingContext;
pub use openai::OpenAiFeedback;
pub use service::{
    DisabledFeedback, FeedbackFailure, FeedbackOutcome, FeedbackService, SETUP_PLACEHOLDER,
};
