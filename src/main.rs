use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod backup;
mod cli;
mod config;
mod daywindow;
mod deploy;
mod error;
mod fetch;
mod providers;

use fetch::HttpClient;
use providers::{Entry, Registry};

const EXIT_UNKNOWN_PROVIDER: u8 = 1;
const EXIT_EXTRACTION_FAILED: u8 = 2;
const EXIT_NO_DESTINATION: u8 = 3;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();
    let registry = Registry::new();

    match args.command {
        cli::Command::List => {
            print_providers(&registry);
            ExitCode::SUCCESS
        }
        cli::Command::Run {
            provider,
            backup_dir,
            backup_suffix,
            target,
        } => {
            let Some(entry) = registry.find(&provider) else {
                eprintln!("unknown provider {provider:?}");
                print_providers(&registry);
                return ExitCode::from(EXIT_UNKNOWN_PROVIDER);
            };
            run(entry, backup_dir, backup_suffix, target)
        }
    }
}

fn run(
    entry: &Entry,
    backup_dir: Option<PathBuf>,
    backup_suffix: Option<String>,
    target: Vec<PathBuf>,
) -> ExitCode {
    let provider = &entry.provider;
    log::info!("updating {} ...", provider.description);

    let client = match HttpClient::new() {
        Ok(client) => client,
        Err(err) => {
            log::error!("building http client: {err:#}");
            return ExitCode::from(EXIT_EXTRACTION_FAILED);
        }
    };

    // the download lands in a scratch dir that disappears with this run
    let scratch = match tempfile::TempDir::new() {
        Ok(dir) => dir,
        Err(err) => {
            log::error!("creating scratch dir: {err}");
            return ExitCode::from(EXIT_EXTRACTION_FAILED);
        }
    };
    let download = scratch.path().join(provider.id);

    let image_url = match entry.strategy.fetch_image(provider, &client, &download) {
        Ok(url) => url,
        Err(err) => {
            log::error!("{}: {err}", provider.id);
            return ExitCode::from(EXIT_EXTRACTION_FAILED);
        }
    };
    log::info!("{}: downloaded {image_url}", provider.id);

    if let Some(dir) = backup_dir.as_deref() {
        if let Err(err) = backup::backup_image(&download, provider.id, dir, backup_suffix.as_deref())
        {
            // a failed backup is not worth losing the deployment over
            log::error!("{}: backup failed: {err:#}", provider.id);
        }
    }

    let targets = if target.is_empty() {
        config::default_targets()
    } else {
        target
    };
    let report = deploy::deploy(&download, provider.id, &targets);
    if report.written.is_empty() {
        log::error!("{}: no eligible destination directories", provider.id);
        return ExitCode::from(EXIT_NO_DESTINATION);
    }

    ExitCode::SUCCESS
}

fn print_providers(registry: &Registry) {
    println!("Supported picture-of-the-day providers:");
    for entry in registry.iter() {
        let provider = &entry.provider;
        println!(
            "- {}: {}\n    {}",
            provider.id, provider.description, provider.url
        );
    }
}
