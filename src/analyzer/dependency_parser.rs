use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;

static GEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*gem\s+['"]([^'"]+)['"]"#).expect("valid regex"));
static PACKAGE_REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<PackageReference\s+Include="([^"]+)""#).expect("valid regex"));
static MAVEN_ARTIFACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<dependency>.*?<artifactId>\s*([^<\s]+)\s*</artifactId>").expect("valid regex")
});
static GO_REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:require\s+)?([A-Za-z0-9.\-_/]+\.[A-Za-z0-9.\-_/]+)\s+v\S+").expect("valid regex"));

/// Ecosystems whose manifests are summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ecosystem {
    Node,
    Ruby,
    Python,
    DotNet,
    Rust,
    Go,
    Php,
    Java,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Node => "Node.js",
            Ecosystem::Ruby => "Ruby",
            Ecosystem::Python => "Python",
            Ecosystem::DotNet => "C#",
            Ecosystem::Rust => "Rust",
            Ecosystem::Go => "Go",
            Ecosystem::Php => "PHP",
            Ecosystem::Java => "Java",
        }
    }
}

/// Dependencies declared by one manifest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestSummary {
    /// Manifest path relative to the project root
    pub manifest: String,
    pub ecosystem: Ecosystem,
    pub dependencies: Vec<String>,
    /// Set when the manifest could not be parsed
    pub parse_error: Option<String>,
}

impl fmt::Display for ManifestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parse_error {
            Some(reason) => write!(f, "Could not analyze {}: {}.", self.manifest, reason),
            None if self.dependencies.is_empty() => write!(
                f,
                "{} dependencies ({}): none declared.",
                self.ecosystem.as_str(),
                self.manifest
            ),
            None => write!(
                f,
                "{} dependencies ({}): {}.",
                self.ecosystem.as_str(),
                self.manifest,
                self.dependencies.join(", ")
            ),
        }
    }
}

/// Summarizes a manifest's declared dependencies.
///
/// Returns `None` for files that are not recognised manifests. Parse
/// failures are reported inside the summary rather than as errors.
pub fn summarize_manifest(relative_path: &Path, content: &str) -> Option<ManifestSummary> {
    let filename = relative_path.file_name()?.to_str()?;
    let extension = relative_path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let (ecosystem, parsed) = match filename {
        "package.json" => (Ecosystem::Node, parse_json_keys(content, &["dependencies"])),
        "composer.json" => (Ecosystem::Php, parse_json_keys(content, &["require"])),
        "Gemfile" => (Ecosystem::Ruby, Ok(parse_gemfile(content))),
        "requirements.txt" => (Ecosystem::Python, Ok(parse_requirements(content))),
        "Pipfile" => (Ecosystem::Python, parse_toml_table_keys(content, &["packages"])),
        "pyproject.toml" => (Ecosystem::Python, parse_pyproject(content)),
        "Cargo.toml" => (Ecosystem::Rust, parse_toml_table_keys(content, &["dependencies"])),
        "go.mod" => (Ecosystem::Go, Ok(parse_go_mod(content))),
        "pom.xml" => (Ecosystem::Java, Ok(capture_all(&MAVEN_ARTIFACT_RE, content))),
        _ if extension == "csproj" => (
            Ecosystem::DotNet,
            Ok(capture_all(&PACKAGE_REFERENCE_RE, content)),
        ),
        _ => return None,
    };

    let manifest = relative_path.to_string_lossy().into_owned();
    Some(match parsed {
        Ok(dependencies) => ManifestSummary {
            manifest,
            ecosystem,
            dependencies,
            parse_error: None,
        },
        Err(reason) => {
            log::warn!("Failed to parse {}: {}", manifest, reason);
            ManifestSummary {
                manifest,
                ecosystem,
                dependencies: Vec::new(),
                parse_error: Some(reason),
            }
        }
    })
}

fn parse_json_keys(content: &str, path: &[&str]) -> Result<Vec<String>, String> {
    let parsed: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let mut node = &parsed;
    for key in path {
        match node.get(key) {
            Some(next) => node = next,
            None => return Ok(Vec::new()),
        }
    }
    Ok(node
        .as_object()
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default())
}

fn parse_toml_table_keys(content: &str, path: &[&str]) -> Result<Vec<String>, String> {
    let parsed: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut node = &parsed;
    for key in path {
        match node.get(key) {
            Some(next) => node = next,
            None => return Ok(Vec::new()),
        }
    }
    Ok(node
        .as_table()
        .map(|table| table.keys().cloned().collect())
        .unwrap_or_default())
}

fn parse_pyproject(content: &str) -> Result<Vec<String>, String> {
    let parsed: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut deps = Vec::new();

    // PEP 621
    if let Some(project_deps) = parsed
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        deps.extend(
            project_deps
                .iter()
                .filter_map(|d| d.as_str())
                .map(requirement_name),
        );
    }

    // Poetry
    if let Some(poetry_deps) = parsed
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_table())
    {
        deps.extend(poetry_deps.keys().filter(|name| *name != "python").cloned());
    }

    Ok(deps)
}

fn parse_gemfile(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| GEM_RE.captures(line))
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Requirement lines are kept verbatim, pins included
fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

fn parse_go_mod(content: &str) -> Vec<String> {
    let mut deps = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("require (") {
            in_block = true;
            continue;
        }
        if in_block && trimmed == ")" {
            in_block = false;
            continue;
        }
        if in_block || trimmed.starts_with("require ") {
            if let Some(cap) = GO_REQUIRE_RE.captures(trimmed) {
                deps.push(cap[1].to_string());
            }
        }
    }

    deps
}

fn capture_all(re: &Regex, content: &str) -> Vec<String> {
    re.captures_iter(content).map(|cap| cap[1].to_string()).collect()
}

fn requirement_name(spec: &str) -> String {
    spec.split(&['=', '>', '<', '~', '!', ';', '[', ' '][..])
        .next()
        .unwrap_or(spec)
        .trim()
        .to_string()
}
