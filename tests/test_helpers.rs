#![allow(dead_code)]

use assert_cmd::Command;
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use daylog::{Config, DocumentRepository, JournalEntry};
use std::fs;
use std::path::Path;

/// Creates a `Command` for the `daylog` binary with a clean environment and
/// `DAYLOG_DIR` pointing at `journal_dir`.
pub fn base_daylog_command(journal_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("daylog").expect("daylog binary not built");
    configure_daylog_command(&mut cmd);
    cmd.env("DAYLOG_DIR", journal_dir);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_daylog_command(cmd: &mut Command) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("DAYLOG_UTC_OFFSET", "+09:00");
}

/// Configuration rooted at `journal_dir` with a fixed offset.
pub fn test_config(journal_dir: &Path) -> Config {
    Config {
        journal_dir: Some(journal_dir.to_path_buf()),
        utc_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
        ..Config::default()
    }
}

pub fn test_repository(journal_dir: &Path) -> DocumentRepository {
    DocumentRepository::new(&test_config(journal_dir))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn entry(date: NaiveDate, h: u32, m: u32, content: &str) -> JournalEntry {
    JournalEntry::new(date, NaiveTime::from_hms_opt(h, m, 0).unwrap(), content)
}

/// Writes a day file and returns its path.
pub fn write_day_file(journal_dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = journal_dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

pub fn read_day_file(journal_dir: &Path, name: &str) -> String {
    fs::read_to_string(journal_dir.join(name)).unwrap()
}

/// The two-day corpus used by several scenarios.
pub fn write_two_day_corpus(journal_dir: &Path) {
    write_day_file(
        journal_dir,
        "2025-12-29.md",
        "---\n\
         date: \"2025-12-29T06:00:00+09:00\"\n\
         wake_time: null\n\
         morning: []\n\
         reading_min: 15\n\
         ---\n\
         \n\
         ## Memo\n\
         Dentist at 3.\n\
         \n\
         ## Journal\n\
         - 09:00 Woke up\n\
         - 23:10 Went to bed\n",
    );
    write_day_file(
        journal_dir,
        "2025-12-28.md",
        "---\ndate: \"2025-12-28T06:00:00+09:00\"\n---\n\n## Journal\n",
    );
}
