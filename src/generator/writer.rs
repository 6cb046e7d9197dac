use super::GeneratedArtifact;
use crate::error::{DockerGenError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each artifact into `dir`, replacing existing files without a
/// backup. Returns the written paths in artifact order.
pub fn write_artifacts(dir: &Path, artifacts: &[GeneratedArtifact]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        if path.exists() {
            log::info!("Overwriting {}", path.display());
        }

        fs::write(&path, artifact.content.as_bytes()).map_err(|source| DockerGenError::Output {
            path: path.clone(),
            source,
        })?;

        log::debug!("Wrote {} bytes to {}", artifact.content.len(), path.display());
        written.push(path);
    }

    Ok(written)
}
