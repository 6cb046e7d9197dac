use super::client::CompletionClient;
use crate::error::{ApiError, DockerGenError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Client that replays queued responses and records every prompt
pub struct MockCompletionClient {
    responses: Mutex<VecDeque<MockResponse>>,
    prompts: Mutex<Vec<String>>,
}

#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Status { status: u16, message: String },
    Timeout { seconds: u64 },
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        MockResponse::Text(content.into())
    }
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client that answers the first call with `content`
    pub fn with_text(content: impl Into<String>) -> Self {
        let client = Self::new();
        client.add_response(MockResponse::text(content));
        client
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("mock client has no queued response".to_string()))?;

        match response {
            MockResponse::Text(content) => Ok(content.trim().to_string()),
            MockResponse::Status { status, message } => {
                Err(ApiError::Status { status, message }.into())
            }
            MockResponse::Timeout { seconds } => Err(DockerGenError::Timeout { seconds }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
