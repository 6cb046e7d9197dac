use clap::Parser;
use colored::*;
use dockerfile_generator::{
    analyzer,
    cli::Cli,
    config, environment,
    generator::{self, GeneratedArtifact, GenerationMode},
    llm::{CompletionClient, OpenAiClient},
    ProjectContext,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::process;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> dockerfile_generator::Result<()> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }

    let env = environment::merge_environment(cli.env_file.as_deref(), cli.env_vars.as_deref())?;
    let client = OpenAiClient::from_env(&config.llm)?;
    let mode = GenerationMode::from_ecs_flag(cli.ecs);

    if !cli.quiet {
        println!("🔍 Analyzing project: {}", cli.project_dir.display());
    }
    let context = analyzer::scan_project(&cli.project_dir, &config.scan)?;

    if !cli.quiet {
        print_context_summary(&context);
        if !env.is_empty() || env.env_file().is_some() {
            println!("Including environment configuration:");
            if let Some(name) = env.env_file_name() {
                println!("  file {} copied to the container root", name.cyan());
            }
            for (key, _) in env.iter() {
                println!("  {}", key.cyan());
            }
        }
    }

    let spinner = waiting_spinner(cli, &client_label(&client, &config.llm.model));
    let result = generator::generate(
        &client,
        &context,
        &env,
        mode,
        &config.prompt,
        &config.output,
    );
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let artifacts = result?;

    if cli.dry_run {
        print_artifacts(&artifacts);
        return Ok(());
    }

    let written = generator::write_artifacts(&context.root, &artifacts)?;
    if !cli.quiet {
        for (artifact, path) in artifacts.iter().zip(&written) {
            println!("✅ {} written to {}", artifact.kind.label(), path.display().to_string().green());
        }
        println!("\n🎉 Generation complete!");
    }

    Ok(())
}

fn client_label(client: &dyn CompletionClient, model: &str) -> String {
    format!("Waiting for {} ({})...", client.name(), model)
}

/// Spinner on stderr while the single request is in flight
fn waiting_spinner(cli: &Cli, message: &str) -> Option<ProgressBar> {
    // Spinner output would interleave with log lines
    if cli.quiet || log::max_level() >= log::LevelFilter::Info {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("  🤖 {msg} {spinner:.magenta}")
    {
        pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn print_context_summary(context: &ProjectContext) {
    println!(
        "✅ Found {} relevant files in {} directories",
        context.entries.len(),
        context.directories.len()
    );
    for summary in &context.dependencies {
        println!("   {}", summary.to_string().dimmed());
    }
}

fn print_artifacts(artifacts: &[GeneratedArtifact]) {
    for artifact in artifacts {
        println!("\n{}", format!("--- {} (dry run) ---", artifact.file_name).bright_cyan());
        print!("{}", artifact.content);
    }
}
