//! Error taxonomy for the generative client.

use thiserror::Error;

/// Errors surfaced by [`super::GenerativeClient`] implementations.
///
/// Every variant is treated as a phase failure by callers: the two-phase
/// generation flow moves on to its fallback, single-shot flows degrade to a
/// zero-result sentinel. Nothing here reaches the user as a technical error.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the service, including throttling.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response carried no candidates or no text parts.
    #[error("response contained no text")]
    EmptyResponse,
}

impl GeminiError {
    /// Whether the failure looks like rate limiting or transient overload.
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == 429 || *status == 503)
    }
}
