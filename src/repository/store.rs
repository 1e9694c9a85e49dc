//! Byte-level persistence for day files.
//!
//! The repository only ever sees three primitives: list the names in the
//! journal directory, load one file's bytes, and save one file's bytes.
//! [`FileSystemStore`] is the production implementation; tests substitute
//! their own [`DocumentStore`] to inject failures or concurrent edits.

use crate::constants::{DATE_FORMAT_ISO, DAY_FILE_EXTENSION};
use crate::errors::{AppError, AppResult, StorageError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, Permissions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[cfg(unix)]
use crate::constants::{DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS};

static DAY_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})\.md$")
        .unwrap_or_else(|e| panic!("invalid day file name pattern: {e}"))
});

/// Load/save/list primitives the repository is built on.
///
/// Names are bare file names (`2025-12-29.md`), never paths.
pub trait DocumentStore: Send + Sync {
    /// Every name in the store, in no particular order.
    fn list_names(&self) -> AppResult<Vec<String>>;

    /// The bytes stored under `name`, or `None` if there is no such file.
    fn load(&self, name: &str) -> AppResult<Option<Vec<u8>>>;

    /// Replaces the bytes stored under `name`.
    ///
    /// Implementations must never leave a partially written file behind.
    fn save(&self, name: &str, bytes: &[u8]) -> AppResult<()>;

    /// Location of `name`, used in error messages and logs.
    fn locate(&self, name: &str) -> PathBuf {
        PathBuf::from(name)
    }
}

/// Reference to one physical day file and the date its name encodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayFile {
    /// Date parsed from the file name.
    pub date: NaiveDate,
    /// File name, `YYYY-MM-DD.md`.
    pub name: String,
}

impl DayFile {
    /// The day file for `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        DayFile {
            date,
            name: format!("{}{}", date.format(DATE_FORMAT_ISO), DAY_FILE_EXTENSION),
        }
    }

    /// Parses a file name; anything but an exact `YYYY-MM-DD.md` name of a
    /// real calendar date is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use daylog::repository::DayFile;
    ///
    /// let file = DayFile::parse("2025-12-29.md").unwrap();
    /// assert_eq!(file.date.to_string(), "2025-12-29");
    ///
    /// assert!(DayFile::parse("20251229.md").is_none());
    /// assert!(DayFile::parse("2025-12-29.md.bak").is_none());
    /// assert!(DayFile::parse("2025-02-30.md").is_none());
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        let captures = DAY_FILE_NAME.captures(name)?;
        let date = NaiveDate::parse_from_str(captures.get(1)?.as_str(), DATE_FORMAT_ISO).ok()?;
        Some(DayFile {
            date,
            name: name.to_string(),
        })
    }
}

/// BLAKE3 fingerprint of a file's bytes, hex encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Stores day files as plain files in one directory.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    /// A store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSystemStore { root: root.into() }
    }

    /// The journal directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentStore for FileSystemStore {
    fn list_names(&self) -> AppResult<Vec<String>> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = dir_entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn load(&self, name: &str) -> AppResult<Option<Vec<u8>>> {
        match fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, name: &str, bytes: &[u8]) -> AppResult<()> {
        ensure_journal_directory_exists(&self.root)?;
        let path = self.root.join(name);
        write_atomically(&path, bytes).map_err(|source| {
            AppError::Storage(StorageError::WriteFailed {
                path: path.clone(),
                source,
            })
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved day file");
        Ok(())
    }

    fn locate(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Ensures the journal directory exists, creating it with owner-only
/// permissions if necessary.
///
/// # Errors
///
/// Returns `AppError::Config` if `journal_dir` is not absolute and
/// `AppError::Io` if the directory cannot be created.
pub fn ensure_journal_directory_exists(journal_dir: &Path) -> AppResult<()> {
    if !journal_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Journal directory path must be absolute: {}",
            journal_dir.display()
        )));
    }

    if !journal_dir.exists() {
        fs::create_dir_all(journal_dir).map_err(|e| {
            AppError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create journal directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            fs::set_permissions(journal_dir, Permissions::from_mode(DEFAULT_DIR_PERMISSIONS))
                .map_err(|e| {
                    AppError::Io(io::Error::new(
                        e.kind(),
                        format!(
                            "Failed to set secure permissions on journal directory: {}",
                            e
                        ),
                    ))
                })?;
        }
        debug!(path = %journal_dir.display(), "created journal directory");
    }
    Ok(())
}

/// Writes `bytes` to a temporary file next to `path`, syncs it and renames
/// it over `path`. An existing file keeps its permissions; a new one gets
/// owner read/write only.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;

    let permissions = existing_permissions(path)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        fs::set_permissions(temp.path(), permissions)?;
    }
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn existing_permissions(path: &Path) -> io::Result<Option<Permissions>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default_file_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn default_file_permissions() -> Option<Permissions> {
    Some(Permissions::from_mode(DEFAULT_FILE_PERMISSIONS))
}

#[cfg(not(unix))]
fn default_file_permissions() -> Option<Permissions> {
    None
}
