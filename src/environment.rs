//! Merges variables from an env file and the `--env-vars` flag.
//!
//! Env files are read with `dotenvy`, so comments, `export ` prefixes,
//! quoting and multi-line quoted values follow the usual dotenv rules. The
//! flag is a comma-separated list of `KEY=VALUE` pairs. Entries from the
//! flag win over entries from the file.

use crate::error::{ConfigError, DockerGenError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Variables to expose inside the generated container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    vars: BTreeMap<String, String>,
    env_file: Option<PathBuf>,
}

impl EnvironmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a variable, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Variables in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The env file the variables were read from, if any
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Name the env file should keep inside the container
    pub fn env_file_name(&self) -> Option<String> {
        self.env_file
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Builds the environment from an optional env file and an optional
/// `--env-vars` string.
pub fn merge_environment(env_file: Option<&Path>, env_vars: Option<&str>) -> Result<EnvironmentMap> {
    let mut env = EnvironmentMap::new();

    if let Some(path) = env_file {
        for (key, value) in parse_env_file(path)? {
            env.insert(key, value);
        }
        env.env_file = Some(path.to_path_buf());
        log::debug!("Loaded {} variables from {}", env.len(), path.display());
    }

    if let Some(vars) = env_vars {
        for (key, value) in parse_env_vars(vars)? {
            if env.get(&key).is_some() {
                log::debug!("--env-vars overrides {}", key);
            }
            env.insert(key, value);
        }
    }

    Ok(env)
}

/// Reads an env file in dotenv syntax
pub fn parse_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let entries = dotenvy::from_path_iter(path).map_err(|e| env_file_error(path, e))?;
    entries
        .map(|entry| entry.map_err(|e| DockerGenError::from(env_file_error(path, e))))
        .collect()
}

fn env_file_error(path: &Path, error: dotenvy::Error) -> ConfigError {
    match error {
        dotenvy::Error::LineParse(line, _) => ConfigError::MalformedEntry {
            source_name: path.display().to_string(),
            entry: line,
        },
        dotenvy::Error::Io(e) => ConfigError::UnreadableEnvFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
        other => ConfigError::UnreadableEnvFile {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

/// Parses the `KEY=VALUE,KEY2=VALUE2` flag syntax
pub fn parse_env_vars(input: &str) -> Result<Vec<(String, String)>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| split_entry(segment, "--env-vars"))
        .collect()
}

fn split_entry(entry: &str, source_name: &str) -> Result<(String, String)> {
    let malformed = || ConfigError::MalformedEntry {
        source_name: source_name.to_string(),
        entry: entry.to_string(),
    };

    let (key, value) = entry.split_once('=').ok_or_else(malformed)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(malformed().into());
    }

    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_value_overrides_file_value() {
        let temp_dir = TempDir::new().unwrap();
        let env_path = temp_dir.path().join(".env");
        fs::write(&env_path, "DATABASE_URL=postgres://file\n").unwrap();

        let env = merge_environment(Some(&env_path), Some("DATABASE_URL=postgres://cli")).unwrap();
        assert_eq!(env.get("DATABASE_URL"), Some("postgres://cli"));
        assert_eq!(env.len(), 1);
        assert_eq!(env.env_file_name().as_deref(), Some(".env"));
    }

    #[test]
    fn test_malformed_env_vars_is_config_error() {
        let result = merge_environment(None, Some("FOO"));
        match result {
            Err(DockerGenError::Config(ConfigError::MalformedEntry { source_name, entry })) => {
                assert_eq!(source_name, "--env-vars");
                assert_eq!(entry, "FOO");
            }
            other => panic!("expected MalformedEntry, got {:?}", other),
        }
    }

    fn write_env(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_env_file_skips_comments_and_handles_exports_and_quotes() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_env(
            &temp_dir,
            ".env",
            r#"
# database
export DB_HOST=localhost
DB_PASS="s3cr=et"
GREETING='hello world'

EMPTY=
"#,
        );

        let pairs = parse_env_file(&path).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("DB_HOST".to_string(), "localhost".to_string()),
                ("DB_PASS".to_string(), "s3cr=et".to_string()),
                ("GREETING".to_string(), "hello world".to_string()),
                ("EMPTY".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_env_file_drops_inline_comments() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_env(&temp_dir, ".env", "PORT=8080 # http port\n");

        let pairs = parse_env_file(&path).unwrap();
        assert_eq!(pairs, vec![("PORT".to_string(), "8080".to_string())]);
    }

    #[test]
    fn test_env_file_accepts_multiline_quoted_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_env(
            &temp_dir,
            ".env",
            "KEY=\"-----BEGIN-----\nabc\n-----END-----\"\nPORT=1\n",
        );

        let pairs = parse_env_file(&path).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("KEY".to_string(), "-----BEGIN-----\nabc\n-----END-----".to_string()),
                ("PORT".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_env_file_error_names_file_and_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_env(&temp_dir, "app.env", "A=1\nBROKEN\n");

        match parse_env_file(&path) {
            Err(DockerGenError::Config(ConfigError::MalformedEntry { source_name, entry })) => {
                assert!(source_name.ends_with("app.env"));
                assert!(entry.contains("BROKEN"));
            }
            other => panic!("expected MalformedEntry, got {:?}", other),
        }
    }

    #[test]
    fn test_env_vars_value_may_contain_equals_and_empty_segments_are_skipped() {
        let pairs = parse_env_vars("TOKEN=a=b, MODE=prod,,").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("TOKEN".to_string(), "a=b".to_string()),
                ("MODE".to_string(), "prod".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_key_is_malformed() {
        assert!(parse_env_vars("=value").is_err());
    }

    #[test]
    fn test_missing_env_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = merge_environment(Some(&temp_dir.path().join("missing.env")), None);
        assert!(matches!(
            result,
            Err(DockerGenError::Config(ConfigError::UnreadableEnvFile { .. }))
        ));
    }

    #[test]
    fn test_no_sources_yields_empty_map() {
        let env = merge_environment(None, None).unwrap();
        assert!(env.is_empty());
        assert!(env.env_file().is_none());
    }
}
