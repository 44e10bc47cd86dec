//! Course cross-reference CLI
//!
//! Local execution entry point.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use course_xref::{
    error::{AppError, Result},
    models::{Config, DestinationKind},
    pipeline,
    services::{SourceCrawler, destination},
    storage::{LocalStorage, ReportStorage},
    utils::http,
};

/// course-xref - Source CMS vs. course database integrity check
#[derive(Parser, Debug)]
#[command(
    name = "course-xref",
    version,
    about = "Cross-reference hosted courses against the source CMS by shared videos"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the source, load the destination and write the integrity report
    Run {
        /// Read the destination from this JSON export instead of the configured backend
        #[arg(long)]
        export: Option<PathBuf>,

        /// Write the report here (default: {output.dir}/{output.report_file})
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Fetch one course page and print the video IDs found on it
    Scan {
        #[arg(long)]
        url: String,
    },

    /// Fetch one directory page and print the courses it lists
    Catalog {
        #[arg(long)]
        url: String,
    },

    /// Validate the configuration file
    Validate,

    /// Print the summary of an existing report
    Show {
        /// Report to read (default: {output.dir}/{output.report_file})
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Storage for an explicit report path, or the configured one.
fn report_storage(config: &Config, path: Option<&Path>) -> LocalStorage {
    match path {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new(""));
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| config.output.report_file.clone());
            LocalStorage::new(dir, file)
        }
        None => LocalStorage::from_config(&config.output),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    log::debug!("Configuration from {}", cli.config.display());

    match cli.command {
        Command::Run { export, output } => {
            if let Some(export) = export {
                config.destination.kind = DestinationKind::Export;
                config.destination.export_path = export;
            }
            config.validate()?;

            let client = http::create_client(&config.http)?;
            let crawler = SourceCrawler::new(client.clone(), &config)?;
            let destination = destination::from_config(&config.destination, &client)?;
            let storage = report_storage(&config, output.as_deref());

            pipeline::run_xref(&config, &crawler, destination.as_ref(), &storage).await?;
        }

        Command::Scan { url } => {
            let client = http::create_client(&config.http)?;
            let crawler = SourceCrawler::new(client, &config)?;

            let video_ids = crawler.scan_course(&url).await?;
            log::info!("{} video(s) on {}", video_ids.len(), url);
            for id in video_ids {
                println!("{id}");
            }
        }

        Command::Catalog { url } => {
            let client = http::create_client(&config.http)?;
            let crawler = SourceCrawler::new(client, &config)?;

            let page = crawler.scan_directory(&url).await?;
            log::info!(
                "{} course(s) on {} ({} headings without a link)",
                page.entries.len(),
                url,
                page.dropped_headings
            );
            for entry in page.entries {
                println!("{}\t{}", entry.title, entry.url);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} directory page(s), destination: {:?})",
                config.source.directory_urls.len(),
                config.destination.kind
            );
        }

        Command::Show { path } => {
            let storage = report_storage(&config, path.as_deref());
            match storage.load_report().await? {
                Some(report) => pipeline::print_summary(&report),
                None => {
                    return Err(AppError::config(format!(
                        "no report at {}",
                        storage.report_path().display()
                    )));
                }
            }
        }
    }

    Ok(())
}
