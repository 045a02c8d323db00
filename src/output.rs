//! Query Output and Reporting
//!
//! Renders catalog query results as human-readable or JSON lines and hands them
//! to an injected [`OutputSink`]. Nothing here writes to a process-wide logger;
//! the binary passes a stdout/stderr sink and tests pass a capturing one.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{BookInfo, Catalog};
use crate::cli::{OutputFormat, VerbosityLevel};
use crate::config::OutputConfig;
use crate::error::{LoadError, MalformedRecordError, RecordResult};

/// Destination for rendered output lines
pub type OutputSink = Arc<dyn Fn(&str) + Send + Sync>;

pub fn stdout_sink() -> OutputSink {
    Arc::new(|line: &str| println!("{}", line))
}

pub fn stderr_sink() -> OutputSink {
    Arc::new(|line: &str| eprintln!("{}", line))
}

/// JSON shape of one query result
#[derive(Debug, Serialize)]
struct QueryReport<'a> {
    id: &'a str,
    exists: bool,
    info: Option<&'a BookInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Counts from a batch of queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuerySummary {
    pub queried: usize,
    pub found: usize,
    pub malformed: usize,
}

impl QuerySummary {
    pub fn has_errors(&self) -> bool {
        self.malformed > 0
    }
}

/// Formats query results and sends them to the configured sinks
pub struct Reporter {
    sink: OutputSink,
    error_sink: OutputSink,
    format: OutputFormat,
    verbosity: VerbosityLevel,
    show_colors: bool,
    show_timestamps: bool,
}

impl Reporter {
    /// Create a reporter writing results and errors to the same sink
    pub fn new(sink: OutputSink, format: OutputFormat, verbosity: VerbosityLevel) -> Self {
        Self {
            error_sink: sink.clone(),
            sink,
            format,
            verbosity,
            show_colors: false,
            show_timestamps: false,
        }
    }

    /// Create a reporter with additional options
    pub fn with_options(
        sink: OutputSink,
        error_sink: OutputSink,
        format: OutputFormat,
        verbosity: VerbosityLevel,
        show_colors: bool,
        show_timestamps: bool,
    ) -> Self {
        Self {
            sink,
            error_sink,
            format,
            verbosity,
            show_colors,
            show_timestamps,
        }
    }

    /// Results to stdout, errors to stderr, colours only on a terminal
    pub fn for_terminal(config: &OutputConfig) -> Self {
        let format: OutputFormat = config.format.into();
        Self::with_options(
            stdout_sink(),
            stderr_sink(),
            format,
            config.verbosity(),
            format == OutputFormat::Human && atty::is(atty::Stream::Stdout),
            config.timestamps,
        )
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn stamp(&self, line: &str) -> String {
        if self.show_timestamps {
            format!("[{}] {}", chrono::Utc::now().format("%H:%M:%S"), line)
        } else {
            line.to_string()
        }
    }

    fn emit(&self, line: &str) {
        (self.sink)(&self.stamp(line));
    }

    fn emit_error(&self, line: &str) {
        (self.error_sink)(&self.stamp(line));
    }

    /// Announce a freshly loaded catalog (verbose and above)
    pub fn report_catalog_loaded(&self, catalog: &Catalog) {
        if self.verbosity < VerbosityLevel::Verbose || self.format == OutputFormat::Json {
            return;
        }
        let source = catalog
            .source()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        self.emit(&format!(
            "Loaded catalog {}: {} book{}",
            source,
            catalog.book_count(),
            if catalog.book_count() == 1 { "" } else { "s" }
        ));
    }

    /// Report a catalog that failed to load
    pub fn report_load_error(&self, error: &LoadError) {
        let mut line = format!("{} {}", self.colorize("ERROR", "31"), error);
        if self.verbosity == VerbosityLevel::Debug {
            line.push_str(&format!("\nDebug: {:?}", error));
        }
        self.emit_error(&line);
    }

    /// Report the existence and info results for one id
    pub fn report_query(&self, id: &str, exists: bool, info: &RecordResult<Option<BookInfo>>) {
        match self.format {
            OutputFormat::Human => self.report_query_human(id, exists, info),
            OutputFormat::Json => self.report_query_json(id, exists, info),
        }
    }

    fn report_query_human(&self, id: &str, exists: bool, info: &RecordResult<Option<BookInfo>>) {
        if self.verbosity > VerbosityLevel::Quiet {
            let verdict = if exists {
                self.colorize("true", "32")
            } else {
                self.colorize("false", "33")
            };
            self.emit(&format!("exists({}): {}", id, verdict));
        }

        match info {
            Ok(Some(book)) if self.verbosity > VerbosityLevel::Quiet => {
                self.emit(&format!("info({}): {}", id, book));
            }
            Ok(None) if self.verbosity > VerbosityLevel::Quiet => {
                self.emit(&format!("info({}): {{}}", id));
            }
            Ok(_) => {}
            Err(error) => self.report_record_error(id, error),
        }
    }

    fn report_query_json(&self, id: &str, exists: bool, info: &RecordResult<Option<BookInfo>>) {
        let (book, error) = match info {
            Ok(book) => (book.as_ref(), None),
            Err(error) => (None, Some(error.to_string())),
        };
        if error.is_none() && self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let report = QueryReport {
            id,
            exists,
            info: book,
            error,
        };
        match serde_json::to_string(&report) {
            Ok(json) => self.emit(&json),
            Err(e) => self.emit_error(&format!("JSON serialization error: {}", e)),
        }
    }

    fn report_record_error(&self, id: &str, error: &MalformedRecordError) {
        let mut line = format!("{} info({}): {}", self.colorize("ERROR", "31"), id, error);
        if self.verbosity == VerbosityLevel::Debug {
            line.push_str(&format!("\nDebug: {:?}", error));
        }
        self.emit_error(&line);
    }

    /// Run both queries for every id and report each result
    pub fn report_queries<S: AsRef<str>>(&self, catalog: &Catalog, ids: &[S]) -> QuerySummary {
        let mut summary = QuerySummary::default();
        for id in ids {
            let id = id.as_ref();
            let exists = catalog.exists(id);
            let info = catalog.info(id);

            summary.queried += 1;
            if exists {
                summary.found += 1;
            }
            if info.is_err() {
                summary.malformed += 1;
            }
            self.report_query(id, exists, &info);
        }
        summary
    }

    /// List the ids of all books in the catalog
    pub fn report_ids(&self, catalog: &Catalog) {
        let ids = catalog.book_ids();
        match self.format {
            OutputFormat::Human => {
                for id in &ids {
                    self.emit(id);
                }
            }
            OutputFormat::Json => match serde_json::to_string(&ids) {
                Ok(json) => self.emit(&json),
                Err(e) => self.emit_error(&format!("JSON serialization error: {}", e)),
            },
        }
    }
}
