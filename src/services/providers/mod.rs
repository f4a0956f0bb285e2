/// Generative text provider abstraction
///
/// The recommendation resolver talks to a text generator through this trait so the
/// concrete backend (Gemini today) can be swapped, and so tests can substitute canned
/// responses or failures.
use std::time::Duration;

use crate::error::AppResult;

pub mod gemini;

pub use gemini::GeminiClient;

/// Trait for generative text providers
///
/// Implementations are constructed once at start-up and shared across concurrent
/// requests, so `generate` must not mutate shared state.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Generates text for `prompt`, giving up after `timeout`
    ///
    /// An empty or missing completion is reported as an error.
    async fn generate(&self, prompt: &str, timeout: Duration) -> AppResult<String>;
}
