use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dockerfile-generator")]
#[command(version = crate::VERSION)]
#[command(about = "Dockerfile and docker-compose.yml generator using OpenAI")]
#[command(long_about = "Scans a project directory, asks an OpenAI completion model for a Dockerfile and a \
docker-compose.yml (or an AWS ECS Fargate task definition with --ecs) and writes them into the project. \
The API key is read from OPENAI_API_KEY.")]
pub struct Cli {
    /// Project directory
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Path to an environment file to add to the container
    #[arg(long, value_name = "ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Environment variables to add to the container, format 'KEY=VALUE,KEY2=VALUE2'
    #[arg(long, value_name = "ENV_VARS")]
    pub env_vars: Option<String>,

    /// Generate an AWS ECS Fargate task definition instead of docker-compose.yml
    #[arg(long)]
    pub ecs: bool,

    /// Print the generated files instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Completion model to use, overriding the configuration file
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let mut builder = env_logger::Builder::from_default_env();
        if let Some(level) = self.log_level(std::env::var_os("RUST_LOG").is_some()) {
            builder.filter_level(level);
        }
        builder.init();
    }

    /// Level forced by the flags; `RUST_LOG` decides when set and no `-v` is given
    fn log_level(&self, rust_log_set: bool) -> Option<log::LevelFilter> {
        match self.verbose {
            0 if rust_log_set => None,
            0 => Some(log::LevelFilter::Warn),
            1 => Some(log::LevelFilter::Info),
            2 => Some(log::LevelFilter::Debug),
            _ => Some(log::LevelFilter::Trace),
        }
    }
}
