//! Execution of parsed subcommands against a repository.

use super::{field_value, Commands};
use crate::constants::{ENTRY_CONTINUATION_INDENT, TIME_FORMAT_MINUTES, TIME_FORMAT_SECONDS};
use crate::document::{normalize_content, JournalEntry};
use crate::errors::{AppError, AppResult, StorageError};
use crate::repository::DocumentRepository;
use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// Runs `command`, writing its output to `out`.
///
/// # Errors
///
/// Returns `StorageError::Unavailable` for a mutating command when no
/// journal directory is configured; otherwise whatever the repository
/// returns.
pub async fn run<W: Write>(
    command: &Commands,
    repository: &DocumentRepository,
    out: &mut W,
) -> AppResult<()> {
    if command.is_mutating() && !repository.is_storage_configured() {
        return Err(StorageError::Unavailable.into());
    }
    debug!(?command, "running command");

    match command {
        Commands::List { json } => {
            let dates = repository.list_dates().await;
            if *json {
                write_json(out, &dates)?;
            } else {
                for date in dates {
                    writeln!(out, "{}", date)?;
                }
            }
        }
        Commands::Show {
            date,
            page,
            page_size,
            json,
        } => {
            let entries = match page {
                Some(page) => {
                    repository
                        .load_page(page.saturating_mul(*page_size), *page_size)
                        .await?
                }
                None => {
                    let date = date.unwrap_or_else(|| repository.today());
                    repository.get_entries_for_date(date).await?
                }
            };
            if *json {
                write_json(out, &entries)?;
            } else {
                write_entries(out, &entries)?;
            }
        }
        Commands::Add { text, date, time } => {
            let now = repository.entry_now("");
            let entry = JournalEntry::new(
                date.unwrap_or(now.date),
                time.unwrap_or(now.time),
                normalize_content(&text.join(" ")),
            );
            repository.add_entry(entry.clone()).await?;
            writeln!(out, "Added entry at {} on {}", format_time(&entry), entry.date)?;
        }
        Commands::Edit { index, text, date } => {
            let date = resolve(repository, *date);
            repository
                .update_entry(date, *index, text.join(" "))
                .await?;
            writeln!(out, "Updated entry {} on {}", index, date)?;
        }
        Commands::Delete { index, date } => {
            let date = resolve(repository, *date);
            repository.delete_entry(date, *index).await?;
            writeln!(out, "Deleted entry {} on {}", index, date)?;
        }
        Commands::Get { key, date, json } => {
            let date = resolve(repository, *date);
            let value = repository.get_field_value(date, key).await?;
            if *json {
                write_json(out, &value)?;
            } else if let Some(value) = value {
                match value.as_list() {
                    Some(items) => {
                        for item in items {
                            writeln!(out, "{}", item)?;
                        }
                    }
                    None => writeln!(out, "{}", value)?,
                }
            }
        }
        Commands::Set {
            key,
            values,
            list,
            null,
            date,
        } => {
            let date = resolve(repository, *date);
            let value = field_value(values, *list, *null);
            repository.set_field_value(date, key, value.clone()).await?;
            writeln!(out, "Set {} = {} on {}", key, value, date)?;
        }
    }
    Ok(())
}

fn resolve(repository: &DocumentRepository, date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| repository.today())
}

fn format_time(entry: &JournalEntry) -> String {
    let format = if entry.time.second() == 0 {
        TIME_FORMAT_MINUTES
    } else {
        TIME_FORMAT_SECONDS
    };
    entry.time.format(format).to_string()
}

/// Prints entries with their index within the day, grouped under a date line.
fn write_entries<W: Write>(out: &mut W, entries: &[JournalEntry]) -> AppResult<()> {
    let mut current: Option<NaiveDate> = None;
    let mut index = 0;
    for entry in entries {
        if current != Some(entry.date) {
            if current.is_some() {
                writeln!(out)?;
            }
            writeln!(out, "{}", entry.date)?;
            current = Some(entry.date);
            index = 0;
        }
        let mut lines = entry.content.lines();
        writeln!(
            out,
            "[{}] {} {}",
            index,
            format_time(entry),
            lines.next().unwrap_or_default()
        )?;
        for line in lines {
            writeln!(out, "{}{}", ENTRY_CONTINUATION_INDENT, line)?;
        }
        index += 1;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    writeln!(out, "{}", json)?;
    Ok(())
}
