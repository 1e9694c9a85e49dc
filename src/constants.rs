//! Constants used throughout the application.
//!
//! This module contains all constants used in the daylog engine, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daylog";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Plain-text daily journal with timestamped entries";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the directory holding the day files.
pub const ENV_VAR_DAYLOG_DIR: &str = "DAYLOG_DIR";
/// Environment variable pointing at a template file for new day files.
pub const ENV_VAR_DAYLOG_TEMPLATE: &str = "DAYLOG_TEMPLATE";
/// Environment variable selecting `minutes` or `seconds` entry timestamps.
pub const ENV_VAR_DAYLOG_TIME_PRECISION: &str = "DAYLOG_TIME_PRECISION";
/// Environment variable with the fixed UTC offset (e.g. `+09:00`).
pub const ENV_VAR_DAYLOG_UTC_OFFSET: &str = "DAYLOG_UTC_OFFSET";
/// Environment variable selecting the log output format.
pub const ENV_VAR_DAYLOG_LOG_FORMAT: &str = "DAYLOG_LOG_FORMAT";
/// Environment variable selecting the default log level.
pub const ENV_VAR_DAYLOG_LOG_LEVEL: &str = "DAYLOG_LOG_LEVEL";

// Document Template
/// Placeholder replaced by the creation timestamp when a day file is created.
pub const TEMPLATE_DATE_PLACEHOLDER: &str = "{{date}}";
/// Template used when no template file is configured.
pub const DEFAULT_NOTE_TEMPLATE: &str = r#"---
date: "{{date}}"
tags:
- "daily"
fileClass: "DailyLog"
sleep_time: null
wake_time: null
morning: []
lunch: []
dinner: []
snacks: []
reading_min: 0
exercise_min: 0
---

## Memo

## Journal
"#;

// Document Structure
/// Delimiter line opening and closing the frontmatter block.
pub const FRONTMATTER_DELIMITER: &str = "---";
/// Alternative YAML document-end marker accepted as a closing delimiter.
pub const FRONTMATTER_END_ALT: &str = "...";
/// Literal word a level-2 header title must end with to own the journal.
pub const JOURNAL_TITLE_SUFFIX: &str = "Journal";
/// Header written when a document has no journal section yet.
pub const JOURNAL_HEADER: &str = "## Journal";
/// Bullet marker written for every entry.
pub const ENTRY_BULLET: &str = "-";
/// Indentation of entry continuation lines.
pub const ENTRY_CONTINUATION_INDENT: &str = "    ";

// Frontmatter Keys
/// Wake-up time key (`HH:MM` or null).
pub const FIELD_WAKE_TIME: &str = "wake_time";
/// Bed time key (`HH:MM` or null).
pub const FIELD_SLEEP_TIME: &str = "sleep_time";
/// Breakfast list key.
pub const FIELD_MORNING: &str = "morning";
/// Lunch list key.
pub const FIELD_LUNCH: &str = "lunch";
/// Dinner list key.
pub const FIELD_DINNER: &str = "dinner";
/// Snacks list key.
pub const FIELD_SNACKS: &str = "snacks";
/// Exercise list key.
pub const FIELD_EXERCISE: &str = "exercise";

// File System Parameters
/// File extension for day files.
pub const DAY_FILE_EXTENSION: &str = ".md";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Timestamp format substituted for the template placeholder.
pub const TEMPLATE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
/// Entry time format at minute precision.
pub const TIME_FORMAT_MINUTES: &str = "%H:%M";
/// Entry time format at second precision.
pub const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";

// Repository
/// Default number of day files per page when loading entries.
pub const DEFAULT_PAGE_SIZE: usize = 50;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "daylog";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
