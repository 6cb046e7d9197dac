//! # dockerfile-generator
//!
//! Scans a project directory, asks an OpenAI completion model for container
//! configuration and writes the answer into the project:
//!
//! - **Project scanning**: directory layout, dependency manifests and entry points
//! - **Environment merging**: `--env-file` plus `--env-vars`, the flag winning on conflicts
//! - **Prompt building**: one deterministic prompt per run
//! - **Generation**: a `Dockerfile` plus either `docker-compose.yml` or an
//!   AWS ECS Fargate task definition
//!
//! ## Example
//!
//! ```rust,no_run
//! use dockerfile_generator::{config::Config, environment, generator, llm::OpenAiClient, scan_project};
//! use dockerfile_generator::generator::GenerationMode;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let project = Path::new("./my-project");
//! let env = environment::merge_environment(None, Some("PORT=8080"))?;
//! let client = OpenAiClient::from_env(&config.llm)?;
//! let context = scan_project(project, &config.scan)?;
//! let artifacts = generator::generate(
//!     &client,
//!     &context,
//!     &env,
//!     GenerationMode::Compose,
//!     &config.prompt,
//!     &config.output,
//! )?;
//! generator::write_artifacts(project, &artifacts)?;
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod common;
pub mod config;
pub mod environment;
pub mod error;
pub mod generator;
pub mod llm;

pub use analyzer::{scan_project, ProjectContext};
pub use environment::{merge_environment, EnvironmentMap};
pub use error::{DockerGenError, Result};
pub use generator::{generate, GeneratedArtifact, GenerationMode};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
