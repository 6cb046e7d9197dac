use crate::error::Result;

/// A single blocking prompt-to-text call
pub trait CompletionClient {
    /// Sends `prompt` and returns the generated text, trimmed
    fn complete(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}
