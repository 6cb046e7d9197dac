use super::{ArtifactKind, GenerationMode};
use crate::analyzer::{EntryRole, ProjectContext};
use crate::config::{OutputConfig, PromptConfig};
use crate::environment::EnvironmentMap;
use std::fmt::Write;

/// Marker that opens each file section in the model's answer
pub const FILE_MARKER: &str = "### FILE:";

/// Assembles the prompt for one generation run. Pure: the same inputs
/// always produce the same text.
pub fn build_prompt(
    context: &ProjectContext,
    env: &EnvironmentMap,
    mode: GenerationMode,
    prompt_config: &PromptConfig,
    output: &OutputConfig,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a DevOps engineer writing container configuration for an existing software project.\n\n",
    );

    push_project_section(&mut prompt, context);
    push_environment_section(&mut prompt, env, prompt_config);
    push_task_section(&mut prompt, mode, output);

    prompt
}

fn push_project_section(prompt: &mut String, context: &ProjectContext) {
    prompt.push_str("Detected directories:\n");
    if context.directories.is_empty() {
        prompt.push_str(".\n");
    }
    for dir in &context.directories {
        let _ = writeln!(prompt, "{}", dir);
    }

    prompt.push_str("\nDependencies info:\n");
    if context.dependencies.is_empty() {
        prompt.push_str("No dependency manifests detected.\n");
    }
    for summary in &context.dependencies {
        let _ = writeln!(prompt, "- {}", summary);
    }

    if !context.entries.is_empty() {
        prompt.push_str("\nRelevant files:\n");
        for entry in &context.entries {
            let role = match entry.role {
                EntryRole::Manifest => "manifest",
                EntryRole::EntryPoint => "entry point",
            };
            let _ = writeln!(prompt, "--- {} ({}) ---", entry.path.display(), role);
            prompt.push_str(entry.snippet.trim_end());
            prompt.push_str("\n--- end ---\n");
        }
    }
    prompt.push('\n');
}

fn push_environment_section(prompt: &mut String, env: &EnvironmentMap, config: &PromptConfig) {
    if env.is_empty() && env.env_file().is_none() {
        return;
    }

    prompt.push_str("Environment configuration:\n");
    if let Some(name) = env.env_file_name() {
        let _ = writeln!(
            prompt,
            "Add the file {} to the root of the app container, preserving its name.",
            name
        );
    }
    if !env.is_empty() {
        prompt.push_str("Include these environment variables for use within the container:\n");
        for (key, value) in env.iter() {
            if config.redact_env_values {
                let _ = writeln!(prompt, "- {}", key);
            } else {
                let _ = writeln!(prompt, "- {}={}", key, value);
            }
        }
    }
    prompt.push('\n');
}

fn push_task_section(prompt: &mut String, mode: GenerationMode, output: &OutputConfig) {
    prompt.push_str("Generate the following files:\n");
    for (index, kind) in mode.artifacts().iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. {}: {}",
            index + 1,
            kind.file_name(output),
            instructions(*kind)
        );
    }

    let _ = write!(
        prompt,
        "\nResponse format: for each file, write a line \"{} <file name>\" followed by the complete \
         file content in a fenced code block. Do not write anything else.\n",
        FILE_MARKER
    );
}

fn instructions(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Dockerfile => {
            "an appropriate Dockerfile for this project. Apply best practices including a \
             non-root user and a multi-stage build if possible."
        }
        ArtifactKind::Compose => {
            "an appropriate Docker Compose file that builds and runs the Dockerfile above, \
             with any backing services the dependencies imply. Apply best practices."
        }
        ArtifactKind::EcsTaskDefinition => {
            "an AWS ECS Fargate task definition in JSON for the image built from the Dockerfile \
             above, considering best practices."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{ContextEntry, Ecosystem, ManifestSummary};
    use std::path::PathBuf;

    fn sample_context() -> ProjectContext {
        ProjectContext {
            root: PathBuf::from("/srv/app"),
            directories: vec![".".to_string(), "src".to_string()],
            entries: vec![ContextEntry {
                path: PathBuf::from("package.json"),
                role: EntryRole::Manifest,
                snippet: "{\"dependencies\":{\"express\":\"^4\"}}".to_string(),
            }],
            dependencies: vec![ManifestSummary {
                manifest: "package.json".to_string(),
                ecosystem: Ecosystem::Node,
                dependencies: vec!["express".to_string()],
                parse_error: None,
            }],
        }
    }

    fn env_with_vars() -> EnvironmentMap {
        let mut env = EnvironmentMap::new();
        env.insert("PORT", "3000");
        env.insert("API_TOKEN", "abc");
        env
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let context = sample_context();
        let env = env_with_vars();
        let first = build_prompt(&context, &env, GenerationMode::Compose, &PromptConfig::default(), &OutputConfig::default());
        let second = build_prompt(&context, &env, GenerationMode::Compose, &PromptConfig::default(), &OutputConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_compose_prompt_contents() {
        let prompt = build_prompt(
            &sample_context(),
            &env_with_vars(),
            GenerationMode::Compose,
            &PromptConfig::default(),
            &OutputConfig::default(),
        );

        assert!(prompt.contains("Detected directories:\n.\nsrc\n"));
        assert!(prompt.contains("- Node.js dependencies (package.json): express."));
        assert!(prompt.contains("--- package.json (manifest) ---"));
        assert!(prompt.contains("1. Dockerfile:"));
        assert!(prompt.contains("2. docker-compose.yml:"));
        assert!(prompt.contains("non-root user"));
        assert!(!prompt.contains("ECS"));
        // variables are listed in key order
        let token = prompt.find("- API_TOKEN=abc").unwrap();
        let port = prompt.find("- PORT=3000").unwrap();
        assert!(token < port);
        assert!(prompt.contains("### FILE: <file name>"));
    }

    #[test]
    fn test_ecs_prompt_asks_for_task_definition_only() {
        let prompt = build_prompt(
            &sample_context(),
            &EnvironmentMap::new(),
            GenerationMode::Ecs,
            &PromptConfig::default(),
            &OutputConfig::default(),
        );
        assert!(prompt.contains("2. ecs-task-definition.json: an AWS ECS Fargate task definition"));
        assert!(!prompt.contains("docker-compose.yml"));
        assert!(!prompt.contains("Environment configuration"));
    }

    #[test]
    fn test_redacted_prompt_omits_values() {
        let prompt = build_prompt(
            &sample_context(),
            &env_with_vars(),
            GenerationMode::Compose,
            &PromptConfig { redact_env_values: true },
            &OutputConfig::default(),
        );
        assert!(prompt.contains("- API_TOKEN\n"));
        assert!(!prompt.contains("abc"));
    }
}
