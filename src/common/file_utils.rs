use crate::config::ScanConfig;
use crate::error::{DockerGenError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Why a file is worth showing to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Manifest,
    EntryPoint,
}

/// Relevant files and the directory layout found under a project root
#[derive(Debug, Default)]
pub struct ProjectFiles {
    /// Relevant files, sorted by path
    pub files: Vec<PathBuf>,
    /// Directories relative to the root, sorted, `.` for the root itself
    pub directories: Vec<PathBuf>,
}

/// Validates a project path: it must exist and be a directory
pub fn validate_project_path(path: &Path) -> Result<PathBuf> {
    let canonical = match path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            return Err(DockerGenError::InvalidProject {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    if !canonical.is_dir() {
        return Err(DockerGenError::InvalidProject {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(canonical)
}

/// Collects relevant project files and directories based on configuration.
///
/// When more than `max_files` files qualify, the shallowest ones are kept.
pub fn collect_project_files(root: &Path, config: &ScanConfig) -> Result<ProjectFiles> {
    let mut candidates = Vec::new();
    let mut directories = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e, &config.ignore_patterns, root))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                log::warn!("Skipping unreadable path {}: {}", path, e);
                continue;
            }
        };
        let path = entry.path();

        if entry.file_type().is_dir() {
            directories.push(get_relative_path(root, path));
            continue;
        }

        if !entry.file_type().is_file() || file_role(path).is_none() {
            continue;
        }

        if let Ok(metadata) = entry.metadata() {
            if metadata.len() > config.max_file_size as u64 {
                log::debug!("Skipping large file: {}", path.display());
                continue;
            }
        }

        candidates.push(path.to_path_buf());
    }

    if candidates.len() > config.max_files {
        log::info!(
            "Found {} relevant files, keeping the {} closest to the root",
            candidates.len(),
            config.max_files
        );
        candidates.sort_by_key(|p| (p.components().count(), p.clone()));
        candidates.truncate(config.max_files);
        candidates.sort();
    }

    let directories = directories
        .into_iter()
        .map(|d| if d.as_os_str().is_empty() { PathBuf::from(".") } else { d })
        .collect::<Vec<_>>();

    log::debug!(
        "Collected {} relevant files in {} directories",
        candidates.len(),
        directories.len()
    );
    Ok(ProjectFiles {
        files: candidates,
        directories,
    })
}

/// Checks if a directory entry should be ignored
fn is_ignored(entry: &DirEntry, ignore_patterns: &[String], root: &Path) -> bool {
    let relative_path = match entry.path().strip_prefix(root) {
        Ok(rel) => rel,
        Err(_) => return false,
    };

    relative_path.components().any(|component| match component {
        Component::Normal(name) => name
            .to_str()
            .map(|name| name.starts_with('.') || ignore_patterns.iter().any(|p| p == name))
            .unwrap_or(false),
        _ => false,
    })
}

/// Classifies a file as a dependency manifest or an application entry point
pub fn file_role(path: &Path) -> Option<FileRole> {
    let filename = path.file_name().and_then(|name| name.to_str())?;
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    const MANIFESTS: &[&str] = &[
        "package.json",
        "Gemfile",
        "requirements.txt",
        "Pipfile",
        "pyproject.toml",
        "setup.py",
        "Cargo.toml",
        "go.mod",
        "pom.xml",
        "build.gradle",
        "build.gradle.kts",
        "composer.json",
        "mix.exs",
    ];

    const ENTRY_POINTS: &[&str] = &[
        "main.py", "app.py", "manage.py", "wsgi.py", "asgi.py", "server.py",
        "index.js", "server.js", "app.js", "main.js",
        "index.ts", "server.ts", "app.ts", "main.ts",
        "main.go", "main.rs",
        "Program.cs", "Startup.cs",
        "config.ru", "app.rb",
        "index.php",
        "Procfile",
    ];

    if MANIFESTS.contains(&filename) || extension == "csproj" {
        Some(FileRole::Manifest)
    } else if ENTRY_POINTS.contains(&filename) {
        Some(FileRole::EntryPoint)
    } else {
        None
    }
}

/// Reads file content safely with size limits
pub fn read_file_safe(path: &Path, max_size: usize) -> Result<String> {
    let metadata = fs::metadata(path)?;

    if metadata.len() > max_size as u64 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("File too large: {}", path.display()),
        )
        .into());
    }

    Ok(fs::read_to_string(path)?)
}

/// Cuts `content` to at most `max_bytes` on a char boundary, marking the cut
pub fn truncate_snippet(content: &str, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content.to_string();
    }

    let mut end = max_bytes;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n... (truncated)", &content[..end])
}

/// Gets the relative path from root to target
pub fn get_relative_path(root: &Path, target: &Path) -> PathBuf {
    target.strip_prefix(root).unwrap_or(target).to_path_buf()
}
