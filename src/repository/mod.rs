//! The document repository: the async CRUD facade over the day files.
//!
//! Every file access runs on tokio's blocking pool, so callers on the async
//! side never block on I/O. A mutation is one blocking task that loads the
//! file, applies the edit to a freshly parsed [`DailyDocument`], re-checks
//! the file's fingerprint and saves. Mutations of the same date are
//! serialized through [`DateLocks`]; a fingerprint mismatch means something
//! outside this process changed the file, and the write is refused with
//! `StorageError::ConcurrentModification`.
//!
//! Without a configured journal directory the repository degrades to an
//! empty journal: reads return nothing and mutations do nothing.

pub mod locks;
pub mod store;

pub use locks::DateLocks;
pub use store::{
    content_hash, ensure_journal_directory_exists, DayFile, DocumentStore, FileSystemStore,
};

use crate::config::Config;
use crate::document::{
    append_journal_section, normalize_content, DailyDocument, FieldValue, JournalEntry,
    TimePrecision,
};
use crate::errors::{AppError, AppResult, DocumentError, StorageError};
use crate::trackers::{ExerciseLog, MealLog, SleepLog};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Async facade over the journal directory.
///
/// Cloning is cheap and clones share the same store and lock table.
#[derive(Clone)]
pub struct DocumentRepository {
    store: Option<Arc<dyn DocumentStore>>,
    settings: Arc<Settings>,
    locks: Arc<DateLocks>,
}

/// What a blocking write task needs besides the store.
#[derive(Debug)]
struct Settings {
    template: String,
    precision: TimePrecision,
    utc_offset: FixedOffset,
}

impl Settings {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.utc_offset)
    }

    fn create_document(&self, date: NaiveDate) -> Result<DailyDocument, DocumentError> {
        DailyDocument::create(date, &self.template, self.now(), self.precision)
    }
}

#[derive(Debug)]
enum Mutation {
    Add(JournalEntry),
    Update { index: usize, content: String },
    Delete { index: usize },
    SetFields(Vec<(String, FieldValue)>),
}

impl Mutation {
    fn name(&self) -> &'static str {
        match self {
            Mutation::Add(_) => "add_entry",
            Mutation::Update { .. } => "update_entry",
            Mutation::Delete { .. } => "delete_entry",
            Mutation::SetFields(_) => "set_fields",
        }
    }

    fn apply(self, doc: &DailyDocument) -> Result<DailyDocument, DocumentError> {
        match self {
            Mutation::Add(entry) => Ok(doc.add_entry(&entry)),
            Mutation::Update { index, content } => doc.update_entry(index, content),
            Mutation::Delete { index } => doc.delete_entry(index),
            Mutation::SetFields(updates) => Ok(doc.set_field_values(updates)),
        }
    }
}

impl DocumentRepository {
    /// Creates a repository over `config.journal_dir`.
    ///
    /// With no journal directory configured the repository is inert.
    pub fn new(config: &Config) -> Self {
        let store = config
            .journal_dir
            .as_ref()
            .map(|dir| Arc::new(FileSystemStore::new(dir)) as Arc<dyn DocumentStore>);
        Self::build(store, config)
    }

    /// Creates a repository over a custom store.
    pub fn with_store(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self::build(Some(store), config)
    }

    fn build(store: Option<Arc<dyn DocumentStore>>, config: &Config) -> Self {
        DocumentRepository {
            store,
            settings: Arc::new(Settings {
                template: config.template.clone(),
                precision: config.time_precision,
                utc_offset: config.utc_offset,
            }),
            locks: Arc::new(DateLocks::new()),
        }
    }

    /// True when a store is available.
    pub fn is_storage_configured(&self) -> bool {
        self.store.is_some()
    }

    /// The current time at the configured offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.settings.now()
    }

    /// Today's date at the configured offset.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// A new entry for today, stamped with the current time at the
    /// configured precision.
    pub fn entry_now(&self, content: &str) -> JournalEntry {
        let now = self.now();
        JournalEntry::new(
            now.date_naive(),
            self.settings.precision.truncate(now.time()),
            normalize_content(content),
        )
    }

    /// Dates that have a day file, most recent first.
    ///
    /// A missing or unreadable directory yields an empty list.
    pub async fn list_dates(&self) -> Vec<NaiveDate> {
        let Some(store) = self.store.clone() else {
            debug!("storage is not configured, no dates to list");
            return Vec::new();
        };

        match run_blocking(move || store.list_names()).await {
            Ok(names) => {
                let mut dates: Vec<NaiveDate> = names
                    .iter()
                    .filter_map(|name| DayFile::parse(name))
                    .map(|file| file.date)
                    .collect();
                dates.sort_unstable_by(|a, b| b.cmp(a));
                dates.dedup();
                dates
            }
            Err(e) => {
                warn!(error = %e, "failed to list the journal directory");
                Vec::new()
            }
        }
    }

    /// Parses the day file for `date`.
    ///
    /// Returns `None` when the file does not exist or is not UTF-8 text.
    pub async fn load_document(&self, date: NaiveDate) -> AppResult<Option<DailyDocument>> {
        let Some(store) = self.store.clone() else {
            return Ok(None);
        };
        let precision = self.settings.precision;
        run_blocking(move || read_document(store.as_ref(), date, precision)).await
    }

    /// Entries of one day, in file order.
    pub async fn get_entries_for_date(&self, date: NaiveDate) -> AppResult<Vec<JournalEntry>> {
        Ok(self
            .load_document(date)
            .await?
            .map(|doc| doc.entries().to_vec())
            .unwrap_or_default())
    }

    /// Entries of `dates[offset..offset + limit]`, one whole file at a time.
    ///
    /// Files are read concurrently; the result keeps the order of `dates` and
    /// each file's entries stay in file order.
    pub async fn load_entries(
        &self,
        dates: &[NaiveDate],
        offset: usize,
        limit: usize,
    ) -> AppResult<Vec<JournalEntry>> {
        let page: Vec<NaiveDate> = dates.iter().skip(offset).take(limit).copied().collect();
        debug!(offset, limit, files = page.len(), "loading entry page");

        let loads = page.iter().map(|date| self.get_entries_for_date(*date));
        let mut entries = Vec::new();
        for result in join_all(loads).await {
            entries.extend(result?);
        }
        Ok(entries)
    }

    /// One page of entries over all day files, most recent file first.
    pub async fn load_page(&self, offset: usize, limit: usize) -> AppResult<Vec<JournalEntry>> {
        let dates = self.list_dates().await;
        self.load_entries(&dates, offset, limit).await
    }

    /// Appends `entry` to the day file for `entry.date`.
    ///
    /// A missing or zero-byte file is first created from the template. A
    /// file that is not UTF-8 text gets a new Journal section appended at
    /// the byte level; nothing already in it is rewritten.
    pub async fn add_entry(&self, entry: JournalEntry) -> AppResult<()> {
        self.mutate(entry.date, Mutation::Add(entry)).await
    }

    /// Replaces the content of the entry at `index` in the current parse of
    /// the day file.
    pub async fn update_entry(
        &self,
        date: NaiveDate,
        index: usize,
        content: impl Into<String>,
    ) -> AppResult<()> {
        let content = content.into();
        self.mutate(date, Mutation::Update { index, content }).await
    }

    /// Removes the entry at `index` in the current parse of the day file.
    pub async fn delete_entry(&self, date: NaiveDate, index: usize) -> AppResult<()> {
        self.mutate(date, Mutation::Delete { index }).await
    }

    /// Reads one frontmatter field of the day file.
    pub async fn get_field_value(
        &self,
        date: NaiveDate,
        key: &str,
    ) -> AppResult<Option<FieldValue>> {
        Ok(self
            .load_document(date)
            .await?
            .and_then(|doc| doc.get_field_value(key).cloned()))
    }

    /// Sets one frontmatter field, creating the day file if needed.
    pub async fn set_field_value(
        &self,
        date: NaiveDate,
        key: &str,
        value: impl Into<FieldValue>,
    ) -> AppResult<()> {
        self.set_field_values(date, vec![(key.to_string(), value.into())])
            .await
    }

    /// Sets several frontmatter fields in a single write.
    pub async fn set_field_values(
        &self,
        date: NaiveDate,
        updates: Vec<(String, FieldValue)>,
    ) -> AppResult<()> {
        if updates.is_empty() {
            return Ok(());
        }
        self.mutate(date, Mutation::SetFields(updates)).await
    }

    /// Every parseable day file, most recent first.
    pub async fn documents(&self) -> AppResult<Vec<DailyDocument>> {
        let dates = self.list_dates().await;
        let loads = dates.iter().map(|date| self.load_document(*date));
        let mut documents = Vec::with_capacity(dates.len());
        for result in join_all(loads).await {
            documents.extend(result?);
        }
        Ok(documents)
    }

    pub async fn sleep_logs(&self) -> AppResult<Vec<SleepLog>> {
        Ok(self
            .documents()
            .await?
            .iter()
            .map(SleepLog::from_document)
            .collect())
    }

    pub async fn meal_logs(&self) -> AppResult<Vec<MealLog>> {
        Ok(self
            .documents()
            .await?
            .iter()
            .map(MealLog::from_document)
            .collect())
    }

    pub async fn exercise_logs(&self) -> AppResult<Vec<ExerciseLog>> {
        Ok(self
            .documents()
            .await?
            .iter()
            .map(ExerciseLog::from_document)
            .collect())
    }

    pub async fn save_sleep_log(&self, log: &SleepLog) -> AppResult<()> {
        self.set_field_values(log.date, log.to_fields()).await
    }

    pub async fn save_meal_log(&self, log: &MealLog) -> AppResult<()> {
        self.set_field_values(log.date, log.to_fields()).await
    }

    pub async fn save_exercise_log(&self, log: &ExerciseLog) -> AppResult<()> {
        self.set_field_values(log.date, log.to_fields()).await
    }

    async fn mutate(&self, date: NaiveDate, mutation: Mutation) -> AppResult<()> {
        let Some(store) = self.store.clone() else {
            warn!(%date, operation = mutation.name(), "storage is not configured, nothing was written");
            return Ok(());
        };

        let guard = self.locks.acquire(date).await;
        let settings = Arc::clone(&self.settings);
        run_blocking(move || {
            let _guard = guard;
            apply_mutation(store.as_ref(), &settings, date, mutation)
        })
        .await
    }
}

/// Runs `task` on the blocking pool. The task runs to completion even if
/// the returned future is dropped.
async fn run_blocking<T, F>(task: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::Task(e.to_string()))?
}

fn read_document(
    store: &dyn DocumentStore,
    date: NaiveDate,
    precision: TimePrecision,
) -> AppResult<Option<DailyDocument>> {
    let file = DayFile::for_date(date);
    let Some(bytes) = store.load(&file.name)? else {
        return Ok(None);
    };
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(DailyDocument::parse(date, text, precision))),
        Err(_) => {
            warn!(path = %store.locate(&file.name).display(), "day file is not valid UTF-8, reading it as empty");
            Ok(None)
        }
    }
}

/// One read-modify-write cycle. Nothing is saved unless the edit succeeds,
/// changes the bytes, and the file still has the fingerprint it was read
/// with.
fn apply_mutation(
    store: &dyn DocumentStore,
    settings: &Settings,
    date: NaiveDate,
    mutation: Mutation,
) -> AppResult<()> {
    let file = DayFile::for_date(date);
    let path = store.locate(&file.name);
    let operation = mutation.name();

    let original = store.load(&file.name)?;
    let fingerprint = original.as_deref().map(content_hash);

    let updated: Vec<u8> = match original {
        Some(bytes) if !bytes.is_empty() => match String::from_utf8(bytes) {
            Ok(text) => {
                let doc = DailyDocument::parse(date, text, settings.precision);
                mutation.apply(&doc)?.as_bytes().to_vec()
            }
            Err(e) => match mutation {
                Mutation::Add(entry) => {
                    warn!(path = %path.display(), "day file is not valid UTF-8, appending a new Journal section");
                    append_journal_section(e.as_bytes(), &entry, settings.precision)
                }
                _ => return Err(DocumentError::NotText { path }.into()),
            },
        },
        // Missing or zero bytes: a fresh file from the template.
        _ => {
            let doc = settings.create_document(date)?;
            mutation.apply(&doc)?.as_bytes().to_vec()
        }
    };

    if fingerprint.as_deref() == Some(content_hash(&updated).as_str()) {
        debug!(%date, operation, "edit left the day file unchanged, skipping write");
        return Ok(());
    }

    let current = store.load(&file.name)?;
    if current.as_deref().map(content_hash) != fingerprint {
        warn!(%date, operation, path = %path.display(), "day file changed on disk during the edit");
        return Err(StorageError::ConcurrentModification { path }.into());
    }

    store.save(&file.name, &updated)?;
    info!(%date, operation, "day file updated");
    Ok(())
}
