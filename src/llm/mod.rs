//! Completion API access.
//!
//! [`CompletionClient`] is the seam between prompt construction and the
//! network: [`OpenAiClient`] talks to the OpenAI completions endpoint and
//! [`MockCompletionClient`] replays canned responses in tests.

pub mod client;
pub mod mock;
pub mod openai;

pub use client::CompletionClient;
pub use mock::MockCompletionClient;
pub use openai::OpenAiClient;
