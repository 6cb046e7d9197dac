use super::client::CompletionClient;
use crate::config::LlmConfig;
use crate::error::{ApiError, AuthError, DockerGenError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Blocking client for the OpenAI `/completions` endpoint
pub struct OpenAiClient {
    endpoint: String,
    api_key: String,
    config: LlmConfig,
    http_client: Client,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Creates a client with the API key taken from the variable named by
    /// `config.api_key_env`. Fails with [`AuthError`] when it is unset or
    /// empty; no request is made.
    pub fn from_env(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AuthError::MissingApiKey {
                var: config.api_key_env.clone(),
            })?;
        Self::new(api_key, config)
    }

    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http_client = Client::builder()
            .user_agent(format!("dockerfile-generator/{}", crate::VERSION))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            config: config.clone(),
            http_client,
            timeout,
        })
    }

    fn url(&self) -> String {
        format!("{}/completions", self.endpoint)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> DockerGenError {
        if e.is_timeout() {
            log::error!("Completion request timed out after {:?}", self.timeout);
            DockerGenError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            log::error!("Cannot connect to {}", self.endpoint);
            ApiError::Transport(format!("connection failed: {}", e)).into()
        } else {
            ApiError::Transport(e.to_string()).into()
        }
    }
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
            frequency_penalty: self.config.frequency_penalty,
            presence_penalty: self.config.presence_penalty,
        };

        log::debug!(
            "Sending completion request: model={}, prompt_length={}",
            self.config.model,
            prompt.len()
        );
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            log::error!("Completion API returned status {}", status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            }
            .into());
        }

        log::info!("Completion received in {:.2}s", start.elapsed().as_secs_f64());
        completion_text(&body)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Extracts the first choice's text from a successful response body
pub fn completion_text(body: &str) -> Result<String> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    if let Some(usage) = &parsed.usage {
        log::debug!(
            "Token usage: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens,
            usage.completion_tokens
        );
    }

    let text = parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(ApiError::EmptyCompletion)?;

    Ok(text)
}

/// The upstream `error.message`, or the raw body when it is not OpenAI-shaped
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn local_config(endpoint: String, timeout_secs: u64) -> LlmConfig {
        LlmConfig {
            endpoint,
            timeout_secs,
            ..LlmConfig::default()
        }
    }

    /// Serves one canned HTTP response and returns the raw request it got
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });

        (endpoint, handle)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    #[test]
    fn test_completion_text_takes_first_choice_trimmed() {
        let body = r#"{"choices":[{"text":"\n\nFROM node:20\n"},{"text":"other"}],"usage":{"prompt_tokens":10,"completion_tokens":5}}"#;
        assert_eq!(completion_text(body).unwrap(), "FROM node:20");
    }

    #[test]
    fn test_completion_text_without_choices_is_api_error() {
        assert!(matches!(
            completion_text(r#"{"choices":[]}"#),
            Err(DockerGenError::Api(ApiError::EmptyCompletion))
        ));
        assert!(matches!(
            completion_text("not json"),
            Err(DockerGenError::Api(ApiError::InvalidBody(_)))
        ));
    }

    #[test]
    fn test_error_message_prefers_openai_envelope() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#),
            "Incorrect API key provided"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_sends_request_and_returns_text() {
        let (endpoint, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"choices":[{"text":"  generated  "}]}"#,
        );
        let client = OpenAiClient::new("sk-test".to_string(), &local_config(endpoint, 10)).unwrap();

        let text = client.complete("build me a container").unwrap();
        assert_eq!(text, "generated");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /v1/completions"));
        assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
        assert!(request.contains(r#""model":"gpt-3.5-turbo-instruct""#));
        assert!(request.contains(r#""prompt":"build me a container""#));
        assert!(request.contains(r#""max_tokens":2816"#));
    }

    #[test]
    fn test_non_success_status_is_api_error() {
        let (endpoint, server) = serve_once(
            "HTTP/1.1 429 Too Many Requests",
            r#"{"error":{"message":"Rate limit reached"}}"#,
        );
        let client = OpenAiClient::new("sk-test".to_string(), &local_config(endpoint, 10)).unwrap();

        match client.complete("prompt") {
            Err(DockerGenError::Api(ApiError::Status { status, message })) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_unanswered_request_times_out() {
        // Accepted by the kernel backlog but never answered
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1", listener.local_addr().unwrap());
        let client = OpenAiClient::new("sk-test".to_string(), &local_config(endpoint, 1)).unwrap();

        assert!(matches!(
            client.complete("prompt"),
            Err(DockerGenError::Timeout { seconds: 1 })
        ));
        drop(listener);
    }

    #[test]
    fn test_missing_api_key_is_auth_error() {
        let config = LlmConfig {
            api_key_env: "DOCKERFILE_GENERATOR_TEST_UNSET_KEY".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(
            OpenAiClient::from_env(&config),
            Err(DockerGenError::Auth(AuthError::MissingApiKey { .. }))
        ));
    }
}
