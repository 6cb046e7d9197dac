use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub scan: ScanConfig,
    pub prompt: PromptConfig,
    pub output: OutputConfig,
}

/// Completion API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI API, without the `/completions` suffix
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub timeout_secs: u64,
}

/// Project scanning limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub ignore_patterns: Vec<String>,
    pub max_file_size: usize,
    pub max_files: usize,
    pub max_snippet_bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Send only variable names, never their values
    pub redact_env_values: bool,
}

/// Target file names, relative to the project directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dockerfile: String,
    pub compose: String,
    pub ecs_task_definition: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.0,
            max_tokens: 2816,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            timeout_secs: 120,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "target".to_string(),
                "build".to_string(),
                "dist".to_string(),
                "__pycache__".to_string(),
                "venv".to_string(),
                ".venv".to_string(),
            ],
            max_file_size: 1024 * 1024, // 1MB
            max_files: 40,
            max_snippet_bytes: 2048,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dockerfile: "Dockerfile".to_string(),
            compose: "docker-compose.yml".to_string(),
            ecs_task_definition: "ecs-task-definition.json".to_string(),
        }
    }
}
