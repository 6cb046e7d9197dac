use super::prompt::FILE_MARKER;
use super::{ArtifactKind, GeneratedArtifact, GenerationMode};
use crate::config::OutputConfig;
use crate::error::{ApiError, Result};

/// One `### FILE:` section of the answer
#[derive(Debug)]
struct Section<'a> {
    name: String,
    body: Vec<&'a str>,
}

/// Splits the model's answer into the artifacts `mode` requires.
///
/// Sections are introduced by `### FILE: <name>` lines; answers without
/// any marker fall back to fenced blocks tagged `dockerfile`, `yaml` or
/// `json`. Files always get the configured output names, whatever the
/// model called them.
pub fn split_response(
    text: &str,
    mode: GenerationMode,
    output: &OutputConfig,
) -> Result<Vec<GeneratedArtifact>> {
    let sections = parse_sections(text);

    let found: Vec<(ArtifactKind, String)> = if sections.is_empty() {
        log::debug!("No file markers in response, falling back to fenced blocks");
        fenced_blocks(text)
            .into_iter()
            .filter_map(|(lang, body)| kind_for_language(&lang).map(|kind| (kind, body)))
            .collect()
    } else {
        sections
            .iter()
            .filter_map(|section| match classify(&section.name, output) {
                Some(kind) => Some((kind, strip_fence(&section.body))),
                None => {
                    log::warn!("Ignoring unexpected file '{}' in response", section.name);
                    None
                }
            })
            .collect()
    };

    mode.artifacts()
        .iter()
        .map(|kind| -> Result<GeneratedArtifact> {
            let content = found
                .iter()
                .find(|(found_kind, _)| found_kind == kind)
                .map(|(_, body)| normalize(body))
                .ok_or_else(|| ApiError::MissingArtifact(kind.label().to_string()))?;
            Ok(GeneratedArtifact {
                kind: *kind,
                file_name: kind.file_name(output).to_string(),
                content,
            })
        })
        .collect()
}

fn parse_sections(text: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();

    for line in text.lines() {
        if let Some(name) = marker_name(line) {
            sections.push(Section {
                name,
                body: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.body.push(line);
        }
    }

    sections
}

fn marker_name(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix(FILE_MARKER)?;
    let name = rest.trim().trim_matches(|c: char| c == '`' || c == '*' || c == '"' || c == '\'');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn classify(name: &str, output: &OutputConfig) -> Option<ArtifactKind> {
    let base = name.rsplit('/').next().unwrap_or(name);
    let lower = base.to_ascii_lowercase();

    if base == output.dockerfile || lower == "dockerfile" || lower.ends_with(".dockerfile") {
        Some(ArtifactKind::Dockerfile)
    } else if base == output.compose
        || (lower.contains("compose") && (lower.ends_with(".yml") || lower.ends_with(".yaml")))
    {
        Some(ArtifactKind::Compose)
    } else if base == output.ecs_task_definition || lower.ends_with(".json") || lower.contains("task") {
        Some(ArtifactKind::EcsTaskDefinition)
    } else {
        None
    }
}

fn kind_for_language(lang: &str) -> Option<ArtifactKind> {
    match lang.to_ascii_lowercase().as_str() {
        "dockerfile" | "docker" => Some(ArtifactKind::Dockerfile),
        "yaml" | "yml" => Some(ArtifactKind::Compose),
        "json" => Some(ArtifactKind::EcsTaskDefinition),
        _ => None,
    }
}

/// Content of the first fenced block in `body`, or the whole body if unfenced
fn strip_fence(body: &[&str]) -> String {
    let open = match body.iter().position(|line| line.trim_start().starts_with("```")) {
        Some(index) => index,
        None => return body.join("\n"),
    };
    let close = body[open + 1..]
        .iter()
        .position(|line| line.trim_start().starts_with("```"))
        .map(|offset| open + 1 + offset)
        .unwrap_or(body.len());

    body[open + 1..close].join("\n")
}

/// All fenced blocks with their info string
fn fenced_blocks(text: &str) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        match current.take() {
            None => {
                if let Some(info) = trimmed.strip_prefix("```") {
                    current = Some((info.trim().to_string(), Vec::new()));
                }
            }
            Some((lang, lines)) if trimmed.starts_with("```") => {
                blocks.push((lang, lines.join("\n")));
            }
            Some((lang, mut lines)) => {
                lines.push(line);
                current = Some((lang, lines));
            }
        }
    }

    blocks
}

/// Drops surrounding blank lines and ends the file with one newline
fn normalize(body: &str) -> String {
    let trimmed = body.trim_start_matches(['\n', '\r']).trim_end();
    format!("{}\n", trimmed)
}
