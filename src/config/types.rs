//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::convert::TryFrom;
use std::net::SocketAddr;
use std::path::PathBuf;

use strum_macros::EnumString;
use structopt::StructOpt;

use crate::config::constants::{
    CERT_PROGRAM_PATH, DB_PATH, DEFAULT_TABLE_NAME, DEFAULT_THREADS, STDIN_INPUT,
};
use crate::error_handling::ConfigError;
use crate::run::parse_snapshot_date;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace, including per-query DNS tracing
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Survey domains from a file with 20 workers
/// tlsa_survey -t 20 -i zones.txt -o ./stats.db
///
/// # Read from stdin and query a specific resolver
/// cat zones.txt | tlsa_survey -s 127.0.0.1:53
///
/// # Re-validate the endpoints recorded in an earlier snapshot
/// tlsa_survey -v -i stats.2014-08-01.host.db -o ./revalidated.db
/// ```
#[derive(Debug, StructOpt)]
#[structopt(
    name = "tlsa_survey",
    about = "Surveys DANE/TLSA records for web, mail and XMPP services of a list of domains."
)]
pub struct Opt {
    /// Number of worker tasks
    #[structopt(short = "t", long = "threads", default_value = "10")]
    pub threads: usize,

    /// Nameserver to query, like 1.2.3.4:53 (default: system resolver)
    #[structopt(short = "s", long = "server")]
    pub server: Option<String>,

    /// Input file with one domain per line, `-` for stdin
    #[structopt(short = "i", long = "input", default_value = "-", parse(from_os_str))]
    pub input: PathBuf,

    /// Output database path (SQLite file)
    #[structopt(short = "o", long = "output", default_value = "./stats.db", parse(from_os_str))]
    pub output: PathBuf,

    /// Program that prints the server certificates as PEM
    #[structopt(short = "c", long = "cert", default_value = "./get_serv_cert.sh", parse(from_os_str))]
    pub cert: PathBuf,

    /// Enable debug logging (same as --log-level debug)
    #[structopt(short = "d", long = "debug")]
    pub debug: bool,

    /// Only re-validate endpoints from a snapshot named like $X.$YEAR-$MONTH-$DAY.$Y.$Z
    #[structopt(short = "v", long = "valid")]
    pub validate_only: bool,

    /// Table holding the outcome rows
    #[structopt(long = "table", default_value = "tlsa_rdata")]
    pub table: String,

    /// Log level: error|warn|info|debug|trace
    #[structopt(
        long = "log-level",
        default_value = "info",
        possible_values = &["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[structopt(long = "log-format", default_value = "plain", possible_values = &["plain", "json"])]
    pub log_format: LogFormat,
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without going through [`Opt`].
///
/// # Examples
///
/// ```no_run
/// use tlsa_survey::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: PathBuf::from("zones.txt"),
///     threads: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Input path, `-` for stdin
    pub input: PathBuf,

    /// Output SQLite database
    pub db_path: PathBuf,

    /// External certificate retrieval program
    pub cert_program: PathBuf,

    /// Number of worker tasks
    pub threads: usize,

    /// Explicit nameserver; `None` uses the system resolver configuration
    pub nameserver: Option<SocketAddr>,

    /// Outcome table name
    pub table: String,

    /// Re-validate a previous snapshot instead of surveying the input list
    pub validate_only: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(STDIN_INPUT),
            db_path: PathBuf::from(DB_PATH),
            cert_program: PathBuf::from(CERT_PROGRAM_PATH),
            threads: DEFAULT_THREADS,
            nameserver: None,
            table: DEFAULT_TABLE_NAME.to_string(),
            validate_only: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl TryFrom<Opt> for Config {
    type Error = ConfigError;

    fn try_from(opt: Opt) -> Result<Self, Self::Error> {
        let nameserver = opt.server.as_deref().map(parse_server).transpose()?;
        let log_level = if opt.debug {
            LogLevel::Debug
        } else {
            opt.log_level
        };

        Ok(Config {
            input: opt.input,
            db_path: opt.output,
            cert_program: opt.cert,
            threads: opt.threads,
            nameserver,
            table: opt.table,
            validate_only: opt.validate_only,
            log_level,
            log_format: opt.log_format,
        })
    }
}

impl Config {
    /// Returns true when domains are read from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == STDIN_INPUT
    }

    /// Checks the combination of options before any resource is opened.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the thread count is zero, the table name is
    /// not a plain identifier, the input file is missing or (in validate-only
    /// mode) misnamed, or the certificate program does not exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_run_limits()?;
        if self.validate_only && self.reads_stdin() {
            return Err(ConfigError::InvalidSnapshotName(self.input.clone()));
        }
        if !self.reads_stdin() && !self.input.is_file() {
            return Err(ConfigError::MissingInput(self.input.clone()));
        }
        if self.validate_only {
            parse_snapshot_date(&self.input)?;
        }
        if !self.cert_program.is_file() {
            return Err(ConfigError::MissingCertProgram(self.cert_program.clone()));
        }
        Ok(())
    }

    /// The checks every run needs regardless of where its input comes from:
    /// at least one worker, and a table name safe to interpolate into SQL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThreadCount` or
    /// `ConfigError::InvalidTableName`.
    pub fn validate_run_limits(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreadCount);
        }
        if !is_valid_table_name(&self.table) {
            return Err(ConfigError::InvalidTableName(self.table.clone()));
        }
        Ok(())
    }
}

/// Parses a nameserver override given as `IP:PORT`.
///
/// IPv6 addresses use the bracketed form, e.g. `[2001:db8::53]:53`.
pub fn parse_server(s: &str) -> Result<SocketAddr, ConfigError> {
    if !s.contains(':') {
        return Err(ConfigError::InvalidServer(s.to_string()));
    }
    s.parse::<SocketAddr>()
        .map_err(|_| ConfigError::InvalidServer(s.to_string()))
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
