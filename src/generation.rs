//! Generation provider trait for chat-completion backends.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that completes a prompt with a chat-completion model.
///
/// Implementations are expected to decode deterministically (temperature 0)
/// so that answers for a fixed index and query are reproducible.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete the given prompt and return the generated text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// The model identifier backing this generator.
    fn name(&self) -> &str;
}
