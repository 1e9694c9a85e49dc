//! Command-line interface for the daylog binary.

pub mod commands;

use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DATE_FORMAT_COMPACT, DEFAULT_PAGE_SIZE, TIME_FORMAT_MINUTES,
    TIME_FORMAT_SECONDS,
};
use crate::document::FieldValue;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::str::FromStr;

/// Plain-text daily journal with timestamped entries
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Log output format: text or json (overrides DAYLOG_LOG_FORMAT)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the dates that have a day file, most recent first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the entries of one day, or a page of entries across days
    Show {
        /// Day to show (YYYY-MM-DD or YYYYMMDD); defaults to today
        #[arg(short, long, value_parser = parse_date, conflicts_with = "page")]
        date: Option<NaiveDate>,
        /// Show the N-th page of day files instead of a single day
        #[arg(long)]
        page: Option<usize>,
        /// Day files per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Append an entry to a day's journal
    Add {
        /// Entry text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Day of the entry (YYYY-MM-DD or YYYYMMDD); defaults to today
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Time of the entry (HH:MM or HH:MM:SS); defaults to now
        #[arg(short, long, value_parser = parse_time)]
        time: Option<NaiveTime>,
    },
    /// Replace the text of the entry at INDEX
    Edit {
        /// Position of the entry as printed by `show`
        index: usize,
        /// New entry text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Remove the entry at INDEX
    Delete {
        /// Position of the entry as printed by `show`
        index: usize,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Print a frontmatter field
    Get {
        key: String,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a frontmatter field, creating the day file if needed
    Set {
        key: String,
        /// New value; several values are joined with spaces unless --list is given
        values: Vec<String>,
        /// Store the values as a list
        #[arg(long, conflicts_with = "null")]
        list: bool,
        /// Store null
        #[arg(long, conflicts_with = "values")]
        null: bool,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

impl Commands {
    /// True for commands that write to the journal directory.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Commands::Add { .. }
                | Commands::Edit { .. }
                | Commands::Delete { .. }
                | Commands::Set { .. }
        )
    }
}

/// Builds the value a `set` command stores.
pub fn field_value(values: &[String], list: bool, null: bool) -> FieldValue {
    if null {
        FieldValue::Null
    } else if list {
        FieldValue::List(values.to_vec())
    } else {
        FieldValue::Scalar(values.join(" "))
    }
}

/// Parses a date in `YYYY-MM-DD` or `YYYYMMDD` form.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::from_str(raw)
        .or_else(|_| NaiveDate::parse_from_str(raw, DATE_FORMAT_COMPACT))
        .map_err(|_| format!("Invalid date format '{}': expected YYYY-MM-DD or YYYYMMDD", raw))
}

/// Parses a time of day in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT_MINUTES)
        .or_else(|_| NaiveTime::parse_from_str(raw, TIME_FORMAT_SECONDS))
        .map_err(|_| format!("Invalid time format '{}': expected HH:MM or HH:MM:SS", raw))
}
