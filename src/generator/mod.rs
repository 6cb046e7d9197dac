use crate::analyzer::ProjectContext;
use crate::config::{OutputConfig, PromptConfig};
use crate::environment::EnvironmentMap;
use crate::error::Result;
use crate::llm::CompletionClient;
use serde::Serialize;

pub mod prompt;
pub mod response;
pub mod writer;

pub use prompt::build_prompt;
pub use response::split_response;
pub use writer::write_artifacts;

/// Which set of artifacts a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenerationMode {
    /// Dockerfile and docker-compose.yml
    Compose,
    /// Dockerfile and an ECS Fargate task definition
    Ecs,
}

impl GenerationMode {
    pub fn from_ecs_flag(ecs: bool) -> Self {
        if ecs {
            GenerationMode::Ecs
        } else {
            GenerationMode::Compose
        }
    }

    pub fn artifacts(&self) -> &'static [ArtifactKind] {
        match self {
            GenerationMode::Compose => &[ArtifactKind::Dockerfile, ArtifactKind::Compose],
            GenerationMode::Ecs => &[ArtifactKind::Dockerfile, ArtifactKind::EcsTaskDefinition],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArtifactKind {
    Dockerfile,
    Compose,
    EcsTaskDefinition,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Dockerfile => "Dockerfile",
            ArtifactKind::Compose => "docker-compose.yml",
            ArtifactKind::EcsTaskDefinition => "AWS ECS Fargate task definition",
        }
    }

    /// Target file name under the configured output names
    pub fn file_name<'a>(&self, output: &'a OutputConfig) -> &'a str {
        match self {
            ArtifactKind::Dockerfile => &output.dockerfile,
            ArtifactKind::Compose => &output.compose,
            ArtifactKind::EcsTaskDefinition => &output.ecs_task_definition,
        }
    }
}

/// A generated file, written once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub content: String,
}

/// Builds the prompt, performs the single completion call and splits the
/// answer into the artifacts `mode` requires.
pub fn generate(
    client: &dyn CompletionClient,
    context: &ProjectContext,
    env: &EnvironmentMap,
    mode: GenerationMode,
    prompt_config: &PromptConfig,
    output: &OutputConfig,
) -> Result<Vec<GeneratedArtifact>> {
    let prompt = build_prompt(context, env, mode, prompt_config, output);
    log::debug!("Built prompt with {} characters", prompt.len());
    log::trace!("Prompt:\n{}", prompt);

    let text = client.complete(&prompt)?;
    log::debug!("{} returned {} characters", client.name(), text.len());

    split_response(&text, mode, output)
}
