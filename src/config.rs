//! Environment-derived configuration.

use anyhow::Context;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_LANGUAGE: &str = "Spanish";

/// Runtime configuration for the client.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the hosted generative service. Required.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Service base URL, overridable for testing against a local stub.
    pub base_url: String,
    /// Output language for skills and titles.
    pub language: String,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `GEMINI_API_KEY` is required; everything else has a default:
    /// `GEMINI_MODEL`, `GEMINI_BASE_URL`, `TACTICIAN_LANGUAGE`.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY is not set")?;
        Ok(Self {
            api_key,
            model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            base_url: env_or("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            language: env_or("TACTICIAN_LANGUAGE", DEFAULT_LANGUAGE),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_blank() {
        assert_eq!(env_or("TACTICIAN_TEST_UNSET_VAR", "fallback"), "fallback");
        std::env::set_var("TACTICIAN_TEST_BLANK_VAR", "   ");
        assert_eq!(env_or("TACTICIAN_TEST_BLANK_VAR", "fallback"), "fallback");
        std::env::set_var("TACTICIAN_TEST_SET_VAR", "value");
        assert_eq!(env_or("TACTICIAN_TEST_SET_VAR", "fallback"), "value");
    }
}
