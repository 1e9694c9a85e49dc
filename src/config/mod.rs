//! Configuration management for the daylog engine.
//!
//! Configuration is an explicit value: it is loaded once from environment
//! variables, validated, and passed into [`DocumentRepository`] at
//! construction. Nothing reads the environment after that.
//!
//! # Environment Variables
//!
//! - `DAYLOG_DIR`: Directory holding the `YYYY-MM-DD.md` day files. Unset means
//!   storage is not configured and every repository operation is a no-op.
//! - `DAYLOG_TEMPLATE`: Path of a template file for new day files
//! - `DAYLOG_TIME_PRECISION`: `minutes` (default) or `seconds`
//! - `DAYLOG_UTC_OFFSET`: Fixed offset such as `+09:00`; defaults to the local offset
//! - `DAYLOG_LOG_FORMAT`: `text` (default) or `json`
//! - `DAYLOG_LOG_LEVEL`: Default log level when `RUST_LOG` is unset
//!
//! [`DocumentRepository`]: crate::repository::DocumentRepository

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_NOTE_TEMPLATE, ENV_VAR_DAYLOG_DIR, ENV_VAR_DAYLOG_LOG_FORMAT,
    ENV_VAR_DAYLOG_LOG_LEVEL, ENV_VAR_DAYLOG_TEMPLATE, ENV_VAR_DAYLOG_TIME_PRECISION,
    ENV_VAR_DAYLOG_UTC_OFFSET, LOG_FORMAT_JSON, LOG_FORMAT_TEXT, TEMPLATE_DATE_PLACEHOLDER,
};
use crate::document::TimePrecision;
use crate::errors::{AppError, AppResult};
use chrono::{FixedOffset, Local, Offset};
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Configuration for the daylog engine.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use daylog::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     journal_dir: Some(PathBuf::from("/path/to/journal")),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Config {
    /// Directory where day files are stored; `None` when not configured.
    pub journal_dir: Option<PathBuf>,

    /// Template for new day files. Every `{{date}}` is replaced with the
    /// creation timestamp.
    pub template: String,

    /// Precision of the time token written for new entries.
    pub time_precision: TimePrecision,

    /// Offset used to decide "today" and to stamp new files.
    pub utc_offset: FixedOffset,

    /// Log output format, `text` or `json`.
    pub log_format: String,

    /// Default log level.
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "journal_dir",
                &self.journal_dir.as_ref().map(|_| "[REDACTED_PATH]"),
            )
            .field("template", &format_args!("<{} bytes>", self.template.len()))
            .field("time_precision", &self.time_precision)
            .field("utc_offset", &self.utc_offset)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            journal_dir: None,
            template: DEFAULT_NOTE_TEMPLATE.to_string(),
            time_precision: TimePrecision::default(),
            utc_offset: local_offset(),
            log_format: LOG_FORMAT_TEXT.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with defaults.
    ///
    /// Paths are expanded with `shellexpand`, so `~` and `$VAR` references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a path cannot be expanded, the template
    /// file cannot be read, or a precision or offset value does not parse.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use daylog::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Storage configured: {}", config.journal_dir.is_some()),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let journal_dir = match non_empty_var(ENV_VAR_DAYLOG_DIR) {
            Some(raw) => Some(expand_path(&raw)?),
            None => None,
        };

        let template = match non_empty_var(ENV_VAR_DAYLOG_TEMPLATE) {
            Some(raw) => {
                let path = expand_path(&raw)?;
                fs::read_to_string(&path).map_err(|e| {
                    AppError::Config(format!("Failed to read template file: {}", e))
                })?
            }
            None => DEFAULT_NOTE_TEMPLATE.to_string(),
        };

        let time_precision = match non_empty_var(ENV_VAR_DAYLOG_TIME_PRECISION) {
            Some(raw) => raw.parse::<TimePrecision>().map_err(AppError::Config)?,
            None => TimePrecision::default(),
        };

        let utc_offset = match non_empty_var(ENV_VAR_DAYLOG_UTC_OFFSET) {
            Some(raw) => parse_utc_offset(&raw)?,
            None => local_offset(),
        };

        let log_format = non_empty_var(ENV_VAR_DAYLOG_LOG_FORMAT)
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_else(|| LOG_FORMAT_TEXT.to_string());
        let log_level =
            non_empty_var(ENV_VAR_DAYLOG_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Config {
            journal_dir,
            template,
            time_precision,
            utc_offset,
            log_format,
            log_level,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the journal directory is set but not
    /// absolute, the template is empty or lacks the `{{date}}` placeholder,
    /// or the log format is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use daylog::Config;
    /// use std::path::PathBuf;
    ///
    /// let relative = Config {
    ///     journal_dir: Some(PathBuf::from("notes")),
    ///     ..Config::default()
    /// };
    /// assert!(relative.validate().is_err());
    ///
    /// let unconfigured = Config::default();
    /// assert!(unconfigured.validate().is_ok());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if let Some(dir) = &self.journal_dir {
            if dir.as_os_str().is_empty() {
                return Err(AppError::Config(
                    "Journal directory path is empty".to_string(),
                ));
            }
            if !dir.is_absolute() {
                return Err(AppError::Config(
                    "Journal directory must be an absolute path".to_string(),
                ));
            }
        }

        if self.template.trim().is_empty() {
            return Err(AppError::Config("Note template is empty".to_string()));
        }
        if !self.template.contains(TEMPLATE_DATE_PLACEHOLDER) {
            return Err(AppError::Config(format!(
                "Note template must contain the {} placeholder",
                TEMPLATE_DATE_PLACEHOLDER
            )));
        }

        if self.log_format != LOG_FORMAT_TEXT && self.log_format != LOG_FORMAT_JSON {
            return Err(AppError::Config(format!(
                "Unknown log format '{}', expected '{}' or '{}'",
                self.log_format, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            )));
        }

        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn expand_path(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// Parses `+HH:MM`, `-HHMM`, `+HH`, `Z` or `UTC`.
///
/// # Errors
///
/// Returns `AppError::Config` for anything else, including offsets of a day
/// or more.
pub fn parse_utc_offset(raw: &str) -> AppResult<FixedOffset> {
    let invalid = || {
        AppError::Config(format!(
            "Invalid UTC offset '{}', expected a value like +09:00",
            raw
        ))
    };

    let value = raw.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, digits) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    let digits = digits.replace(':', "");
    if !(digits.len() == 2 || digits.len() == 4) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = if digits.len() == 4 {
        digits[2..].parse().map_err(|_| invalid())?
    } else {
        0
    };
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
