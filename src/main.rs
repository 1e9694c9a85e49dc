/*!
# Daylog - A Plain-Text Daily Journal

Daylog keeps one markdown file per day and edits only the `## Journal`
section and the frontmatter block of each file, so the files stay safe to
edit by hand.

## Usage

```
daylog [OPTIONS] <COMMAND>

Commands:
  list    List the dates that have a day file, most recent first
  show    Show the entries of one day, or a page of entries across days
  add     Append an entry to a day's journal
  edit    Replace the text of the entry at INDEX
  delete  Remove the entry at INDEX
  get     Print a frontmatter field
  set     Set a frontmatter field, creating the day file if needed
```

## Configuration

- `DAYLOG_DIR`: absolute directory holding the day files
- `DAYLOG_TEMPLATE`: template file for new day files
- `DAYLOG_TIME_PRECISION`: `minutes` or `seconds`
- `DAYLOG_UTC_OFFSET`: fixed offset such as `+09:00`
- `DAYLOG_LOG_FORMAT`, `DAYLOG_LOG_LEVEL`, `RUST_LOG`: logging
*/

use clap::Parser;
use daylog::cli::{commands, CliArgs};
use daylog::config::Config;
use daylog::constants::{TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use daylog::errors::AppResult;
use daylog::logging::init_tracing;
use daylog::repository::{ensure_journal_directory_exists, DocumentRepository};
use tracing::{debug, error, info, Instrument};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let args = CliArgs::parse();

    let mut config = Config::load()?;
    if let Some(format) = &args.log_format {
        config.log_format = format.to_ascii_lowercase();
    }
    config.validate()?;
    init_tracing(&config.log_format, &config.log_level)?;

    let span = tracing::info_span!(TRACING_ROOT_SPAN_NAME, service = TRACING_SERVICE_NAME);
    async move {
        debug!(?config, "configuration loaded");

        if let Some(dir) = &config.journal_dir {
            if args.command.is_mutating() {
                ensure_journal_directory_exists(dir)?;
            }
        } else {
            info!("no journal directory configured");
        }

        let repository = DocumentRepository::new(&config);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        commands::run(&args.command, &repository, &mut out).await
    }
    .instrument(span)
    .await
}
