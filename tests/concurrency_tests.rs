mod test_helpers;

use daylog::errors::AppResult;
use daylog::repository::{DocumentStore, FileSystemStore};
use daylog::DocumentRepository;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;
use test_helpers::{date, entry, read_day_file, test_config, test_repository, write_two_day_corpus};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_to_one_day_are_all_kept() {
    let dir = tempdir().unwrap();
    write_two_day_corpus(dir.path());
    let repo = test_repository(dir.path());
    let day = date(2025, 12, 29);

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.add_entry(entry(day, 10, i, &format!("note {}", i)))
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let entries = repo.get_entries_for_date(day).await.unwrap();
    assert_eq!(entries.len(), 22);
    for i in 0..20 {
        let content = format!("note {}", i);
        assert_eq!(
            entries.iter().filter(|e| e.content == content).count(),
            1,
            "{} missing or duplicated",
            content
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mixed_mutations_on_one_day() {
    let dir = tempdir().unwrap();
    write_two_day_corpus(dir.path());
    let repo = test_repository(dir.path());
    let day = date(2025, 12, 29);

    let add = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.add_entry(entry(day, 12, 0, "Lunch")).await })
    };
    let field = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.set_field_value(day, "wake_time", "07:00").await })
    };
    let update = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.update_entry(day, 0, "Woke up early").await })
    };
    add.await.unwrap().unwrap();
    field.await.unwrap().unwrap();
    update.await.unwrap().unwrap();

    let text = read_day_file(dir.path(), "2025-12-29.md");
    assert!(text.contains("wake_time: \"07:00\"\n"));
    assert!(text.contains("- 09:00 Woke up early\n"));
    assert!(text.contains("- 12:00 Lunch\n"));
    assert!(text.contains("- 23:10 Went to bed\n"));
}

#[tokio::test]
async fn test_dropped_caller_still_completes_write() {
    let dir = tempdir().unwrap();
    write_two_day_corpus(dir.path());
    let repo = test_repository(dir.path());
    let day = date(2025, 12, 29);

    let handle = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.add_entry(entry(day, 13, 0, "Walk")).await })
    };
    tokio::task::yield_now().await;
    handle.abort();
    let _ = handle.await;

    // A later mutation of the same day waits for any write still in flight.
    repo.add_entry(entry(day, 14, 0, "Nap")).await.unwrap();

    let text = read_day_file(dir.path(), "2025-12-29.md");
    assert!(text.ends_with("- 14:00 Nap\n"));
    assert!(text.matches("## Journal").count() == 1);
}

/// Store that rewrites the file behind the repository's back between the
/// first read of a mutation and its pre-write check.
struct InterferingStore {
    inner: FileSystemStore,
    loads: AtomicUsize,
    saves: AtomicUsize,
    external_edit: String,
}

impl DocumentStore for InterferingStore {
    fn list_names(&self) -> AppResult<Vec<String>> {
        self.inner.list_names()
    }

    fn load(&self, name: &str) -> AppResult<Option<Vec<u8>>> {
        let bytes = self.inner.load(name)?;
        if self.loads.fetch_add(1, Ordering::SeqCst) == 0 {
            std::fs::write(self.inner.locate(name), &self.external_edit)?;
        }
        Ok(bytes)
    }

    fn save(&self, name: &str, bytes: &[u8]) -> AppResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(name, bytes)
    }

    fn locate(&self, name: &str) -> PathBuf {
        self.inner.locate(name)
    }
}

#[tokio::test]
async fn test_external_edit_during_mutation_is_detected() {
    let dir = tempdir().unwrap();
    write_two_day_corpus(dir.path());
    let external_edit = "## Journal\n- 09:00 edited elsewhere\n".to_string();
    let store = Arc::new(InterferingStore {
        inner: FileSystemStore::new(dir.path()),
        loads: AtomicUsize::new(0),
        saves: AtomicUsize::new(0),
        external_edit: external_edit.clone(),
    });
    let repo = DocumentRepository::with_store(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        &test_config(dir.path()),
    );

    let err = repo
        .add_entry(entry(date(2025, 12, 29), 12, 0, "Lunch"))
        .await
        .unwrap_err();

    assert!(err.is_concurrent_modification());
    assert!(err.to_string().contains("2025-12-29.md"));
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    assert_eq!(read_day_file(dir.path(), "2025-12-29.md"), external_edit);

    // The next attempt sees the external edit and builds on it.
    repo.add_entry(entry(date(2025, 12, 29), 12, 0, "Lunch"))
        .await
        .unwrap();
    assert_eq!(
        read_day_file(dir.path(), "2025-12-29.md"),
        "## Journal\n- 09:00 edited elsewhere\n- 12:00 Lunch\n"
    );
}
