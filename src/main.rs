use std::process::ExitCode;

use anyhow::{Context, Result};

use book_catalog::{Catalog, Cli, ConfigManager, Reporter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        return Ok(ExitCode::from(2));
    }

    let config = ConfigManager::load_config(&cli)
        .await
        .context("Failed to load configuration")?;
    let reporter = Reporter::for_terminal(&config.output);

    let path = config
        .catalog
        .path
        .as_deref()
        .context("No catalog file given; pass --catalog or set catalog.path")?;

    let catalog = match Catalog::open(path) {
        Ok(catalog) => catalog,
        Err(error) => {
            reporter.report_load_error(&error);
            return Ok(ExitCode::FAILURE);
        }
    };
    reporter.report_catalog_loaded(&catalog);

    if cli.list {
        reporter.report_ids(&catalog);
    }

    let summary = reporter.report_queries(&catalog, cli.ids.as_slice());
    if summary.has_errors() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
