/*!
# Daylog

Daylog keeps a journal as one markdown file per day. Each file carries a YAML
frontmatter block of tracker fields (sleep, meals, exercise) and a `## Journal`
section holding timestamped bullet entries:

```text
---
date: "2025-12-29T06:00:00+09:00"
wake_time: "07:00"
---

## Memo
Anything the user writes here is left alone.

## Journal
- 09:00 Woke up
- 12:39 Lunch #food
```

The files stay hand-editable. Every edit re-renders only the Journal section
(or only the frontmatter block) and copies all other bytes through unchanged.

## Architecture

- `document`: parsing and surgical rewriting of a single day file
- `repository`: async CRUD over the journal directory, with per-date locking
  and change detection
- `trackers`: typed views over the frontmatter tracker fields
- `config`: configuration loading and validation
- `errors`: error handling infrastructure
- `logging`: tracing subscriber setup
- `cli`: command-line interface handling using clap

## Usage Example

```rust,no_run
use daylog::{AppResult, Config, DocumentRepository};

#[tokio::main]
async fn main() -> AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let repository = DocumentRepository::new(&config);
    repository.add_entry(repository.entry_now("Woke up")).await?;

    for entry in repository.get_entries_for_date(repository.today()).await? {
        println!("{}", entry);
    }
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Day file parsing and rewriting
pub mod document;
/// Error types and utilities for error handling
pub mod errors;
/// Tracing subscriber setup
pub mod logging;
/// Async access to the journal directory
pub mod repository;
/// Typed tracker views over frontmatter fields
pub mod trackers;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use document::{DailyDocument, FieldValue, JournalEntry, TimePrecision};
pub use errors::{AppError, AppResult};
pub use repository::DocumentRepository;
