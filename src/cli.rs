use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show errors
    Quiet,
    /// Show query results
    #[default]
    Normal,
    /// Also show catalog statistics
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// How query results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per result
    #[default]
    Human,
    /// One JSON object per queried id
    Json,
}

/// Look up books in an XML catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "book-catalog")]
#[command(about = "Check whether books exist in an XML catalog and print their details")]
#[command(version)]
pub struct Cli {
    /// Book ids to look up
    #[arg(help = "Book ids to look up (e.g. bk101)")]
    pub ids: Vec<String>,

    /// Catalog file to load
    #[arg(short = 'c', long = "catalog", help = "Path to the XML catalog file")]
    pub catalog: Option<PathBuf>,

    /// List every book id in the catalog
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Also print error debug details
    #[arg(long = "debug", conflicts_with = "quiet")]
    pub debug: bool,

    /// Prefix output lines with the time of day
    #[arg(long = "timestamps")]
    pub timestamps: bool,

    /// Configuration file (TOML or JSON)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.ids.is_empty() && !self.list {
            return Err("Nothing to do: pass one or more book ids or --list".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_basic_cli_parsing() {
        let args = vec!["book-catalog", "--catalog", "books.xml", "bk101", "bk102"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("books.xml")));
        assert_eq!(cli.ids, vec!["bk101", "bk102"]);
        assert_eq!(cli.output_format, None);
        assert!(!cli.list);
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::try_parse_from(["book-catalog", "-f", "json", "bk101"]).unwrap();
        assert_eq!(cli.output_format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["book-catalog", "-v", "-q", "bk101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_requires_work() {
        let cli = Cli::try_parse_from(["book-catalog"]).unwrap();
        assert!(cli.validate().is_err());

        let cli = Cli::try_parse_from(["book-catalog", "--list"]).unwrap();
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_validate_leaves_missing_catalog_to_loader() {
        let cli =
            Cli::try_parse_from(["book-catalog", "-c", "/no/such/catalog.xml", "bk101"]).unwrap();
        assert!(cli.validate().is_ok());
    }
}
