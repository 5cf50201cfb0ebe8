//! Browsing Digest - summarize a day of browsing with a local model.

use clap::Parser;
use digest_cli::commands;
use digest_cli::{Cli, CliError, Config, Formatter};
use digest_domain::LlmProvider;
use digest_llm::Backend;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            let formatter = Formatter::new(!cli.no_color);
            for line in formatter.error_report(&e, None) {
                eprintln!("{}", line);
            }
            return ExitCode::FAILURE;
        }
    };

    let formatter = Formatter::new(config.settings.color);
    let backend = Backend::from_config(&config.backend);
    info!("Using {} backend with model {}", backend.kind(), backend.model());

    match run(&cli, &config, &backend, &formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let hint = backend.setup_hint();
            for line in formatter.error_report(&e, Some(&hint)) {
                eprintln!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> digest_cli::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_cli(cli);
    Ok(config)
}

fn run(cli: &Cli, config: &Config, backend: &Backend, formatter: &Formatter) -> digest_cli::Result<()> {
    if cli.list_models {
        // Listing is informational; a missing backend is reported, not fatal
        if let Err(e) = commands::execute_list_models(backend, formatter) {
            for line in formatter.error_report(&e, Some(&backend.setup_hint())) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    if cli.check_server {
        commands::execute_check_server(backend, formatter);
        return Ok(());
    }

    let input = cli
        .input_file
        .as_deref()
        .ok_or_else(|| CliError::InvalidInput("an input file is required".to_string()))?;
    let digest_config = config.digest_config()?;

    commands::execute_digest(
        backend.clone(),
        digest_config,
        input,
        cli.output.as_deref(),
        formatter,
    )?;
    Ok(())
}
