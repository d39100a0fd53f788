mod cli;
mod context;
mod output;
mod script;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::EditorSession;
use rackplan_core::AppConfig;
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn init_logging() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("RACKPLAN_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        // stdout carries JSON responses, so logs go to stderr.
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .init();
    }
    Ok(())
}

fn read_script(path: Option<&std::path::Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.max_depth.is_some() {
        config.max_history_depth = cli.max_depth;
    }
    if cli.rack_height.is_some() {
        config.default_rack_height = cli.rack_height;
    }
    if cli.rack_name.is_some() {
        config.default_rack_name = cli.rack_name.clone();
    }

    match cli.command {
        Commands::Run { script } => {
            let content = match read_script(script.as_deref()) {
                Ok(content) => content,
                Err(e) => output::output_error(&format!("cannot read script: {}", e)),
            };

            let mut session = EditorSession::new(&config);
            let mut failures = 0;
            for (i, line) in content.lines().enumerate() {
                let line_number = Some(i + 1);
                let result =
                    script::parse_line(line).and_then(|action| match action {
                        Some(action) => session.apply(&action).map(Some),
                        None => Ok(None),
                    });
                match result {
                    Ok(Some(data)) => output::output_success(line_number, data),
                    Ok(None) => {}
                    Err(e) => {
                        failures += 1;
                        output::output_failure(line_number, &e.to_string());
                    }
                }
            }
            output::output_success(None, session.summary());

            if failures > 0 {
                tracing::warn!("{} action(s) failed", failures);
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "rackplan",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
