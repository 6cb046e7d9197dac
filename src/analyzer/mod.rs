//! # Analyzer Module
//!
//! Builds the project context sent to the model:
//! - the directory layout
//! - dependency summaries for recognised manifests
//! - bounded snippets of manifests and entry points

use crate::common::file_utils::{self, FileRole};
use crate::config::ScanConfig;
use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod dependency_parser;

pub use dependency_parser::{summarize_manifest, Ecosystem, ManifestSummary};

/// A relevant file and the part of it shown to the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextEntry {
    /// Path relative to the project root
    pub path: PathBuf,
    pub role: EntryRole,
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryRole {
    Manifest,
    EntryPoint,
}

impl From<FileRole> for EntryRole {
    fn from(role: FileRole) -> Self {
        match role {
            FileRole::Manifest => EntryRole::Manifest,
            FileRole::EntryPoint => EntryRole::EntryPoint,
        }
    }
}

/// Everything the prompt knows about the project, built once per run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectContext {
    pub root: PathBuf,
    /// Directories relative to the root, sorted
    pub directories: Vec<String>,
    /// Relevant files ordered by path
    pub entries: Vec<ContextEntry>,
    /// Manifest summaries in the same order as their entries
    pub dependencies: Vec<ManifestSummary>,
}

/// Scans a project directory and collects its containerization context
pub fn scan_project(root: &Path, config: &ScanConfig) -> Result<ProjectContext> {
    let root = file_utils::validate_project_path(root)?;
    log::info!("Scanning project at {}", root.display());

    let collected = file_utils::collect_project_files(&root, config)?;
    let mut entries = Vec::new();
    let mut dependencies = Vec::new();

    for path in &collected.files {
        let role = match file_utils::file_role(path) {
            Some(role) => role,
            None => continue,
        };
        let relative = file_utils::get_relative_path(&root, path);

        let content = match file_utils::read_file_safe(path, config.max_file_size) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };

        if role == FileRole::Manifest {
            if let Some(summary) = summarize_manifest(&relative, &content) {
                dependencies.push(summary);
            }
        }

        entries.push(ContextEntry {
            snippet: file_utils::truncate_snippet(&content, config.max_snippet_bytes),
            path: relative,
            role: role.into(),
        });
    }

    if entries.is_empty() {
        log::warn!("No manifests or entry points found under {}", root.display());
    }

    let directories = collected
        .directories
        .iter()
        .map(|d| d.to_string_lossy().into_owned())
        .collect();

    Ok(ProjectContext {
        root,
        directories,
        entries,
        dependencies,
    })
}
