//! # Store Registry
//!
//! [`DataManager`] owns every registered [`FileStorage`] together with the
//! collection loaded from it, and a set of *dirty* storage ids: collections
//! whose in-memory state may differ from what is on disk.
//!
//! Per storage id the lifecycle is:
//!
//! ```text
//! Unloaded ──load──▶ Loaded (dirty) ──save/flush──▶ Saved (clean)
//!                        ▲                               │
//!                        └──────── load / collection_mut ┘
//! ```
//!
//! Loading marks an id dirty straight away. Callers receive `&mut T` and the
//! registry cannot see what they do with it, so every loaded collection is
//! assumed modified until it is written back. [`DataManager::save_all_unsaved`]
//! is what the exit path and the signal watcher call.

use super::fs::FileStorage;
use super::Collection;
use crate::error::{Result, RolodexError};
use log::{debug, error, info};
use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Type-erased view of a registered storage and its cached collection.
trait Slot: Send {
    fn kind(&self) -> &'static str;
    fn path(&self) -> &Path;
    fn flush(&self) -> Result<()>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Entry<T: Collection> {
    storage: FileStorage<T>,
    data: Option<T>,
}

impl<T: Collection> Slot for Entry<T> {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn path(&self) -> &Path {
        self.storage.path()
    }

    fn flush(&self) -> Result<()> {
        match &self.data {
            Some(data) => self.storage.save(data),
            None => Ok(()),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Outcome of [`DataManager::save_all_unsaved`].
#[derive(Debug, Default)]
pub struct FlushReport {
    pub saved: Vec<String>,
    pub failed: Vec<(String, RolodexError)>,
}

impl FlushReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Default)]
pub struct DataManager {
    storages: HashMap<String, Box<dyn Slot>>,
    dirty: BTreeSet<String>,
}

impl DataManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` as the storage for collections of type `T` at `path`.
    pub fn add_storage<T: Collection>(
        &mut self,
        id: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<()> {
        let id = id.into();
        if self.storages.contains_key(&id) {
            return Err(RolodexError::duplicate(format!(
                "Storage with ID {} already exists",
                id
            )));
        }
        let entry = Entry::<T> {
            storage: FileStorage::new(path),
            data: None,
        };
        debug!("registered storage {} ({}) at {}", id, T::KIND, entry.path().display());
        self.storages.insert(id, Box::new(entry));
        Ok(())
    }

    /// Reads the collection for `id` from disk, replacing any cached copy,
    /// and marks `id` dirty.
    pub fn load<T: Collection>(&mut self, id: &str) -> Result<&mut T> {
        let data = self.entry_mut::<T>(id)?.storage.load()?;
        self.dirty.insert(id.to_string());
        let entry = self.entry_mut::<T>(id)?;
        Ok(entry.data.insert(data))
    }

    /// The cached collection for `id`, loading it on first access. Marks `id`
    /// dirty.
    pub fn collection_mut<T: Collection>(&mut self, id: &str) -> Result<&mut T> {
        if self.entry_mut::<T>(id)?.data.is_none() {
            return self.load(id);
        }
        self.dirty.insert(id.to_string());
        let entry = self.entry_mut::<T>(id)?;
        entry
            .data
            .as_mut()
            .ok_or_else(|| RolodexError::UnknownStorage(id.to_string()))
    }

    /// Writes `data` through to disk, caches it, and clears the dirty flag.
    pub fn save<T: Collection>(&mut self, id: &str, data: T) -> Result<()> {
        let entry = self.entry_mut::<T>(id)?;
        entry.storage.save(&data)?;
        entry.data = Some(data);
        self.dirty.remove(id);
        debug!("saved storage {}", id);
        Ok(())
    }

    /// Writes the cached collection for `id` if it is dirty.
    pub fn flush(&mut self, id: &str) -> Result<()> {
        let slot = self
            .storages
            .get(id)
            .ok_or_else(|| RolodexError::UnknownStorage(id.to_string()))?;
        if !self.dirty.contains(id) {
            return Ok(());
        }
        slot.flush()?;
        self.dirty.remove(id);
        debug!("flushed storage {}", id);
        Ok(())
    }

    /// Flushes every dirty storage. Failures are collected rather than
    /// returned early so one broken file does not block the others.
    ///
    /// Two flushes never overlap: this takes `&mut self`, and the shared
    /// registry sits behind a `Mutex`. An id stays dirty until its write
    /// succeeds, so a flush cut short by a panic is simply repeated by the
    /// next call.
    pub fn save_all_unsaved(&mut self) -> FlushReport {
        let mut report = FlushReport::default();
        let pending: Vec<String> = self.dirty.iter().cloned().collect();
        for id in pending {
            match self.flush(&id) {
                Ok(()) => report.saved.push(id),
                Err(err) => {
                    error!("failed to save storage {}: {}", id, err);
                    report.failed.push((id, err));
                }
            }
        }

        if !report.saved.is_empty() {
            info!("saved {} storage(s): {}", report.saved.len(), report.saved.join(", "));
        }
        report
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.dirty.contains(id)
    }

    fn entry_mut<T: Collection>(&mut self, id: &str) -> Result<&mut Entry<T>> {
        let slot = self
            .storages
            .get_mut(id)
            .ok_or_else(|| RolodexError::UnknownStorage(id.to_string()))?;
        let expected = slot.kind();
        slot.as_any_mut()
            .downcast_mut::<Entry<T>>()
            .ok_or_else(|| RolodexError::StorageType {
                id: id.to_string(),
                expected,
                requested: T::KIND,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_book::AddressBook;
    use crate::model::{Note, Record};
    use crate::notebook::Notebook;
    use serde::{Deserialize, Serialize, Serializer};
    use std::fs;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> DataManager {
        let mut manager = DataManager::new();
        manager
            .add_storage::<AddressBook>("contacts", dir.path().join("addressbook.json"))
            .unwrap();
        manager
            .add_storage::<Notebook>("notes", dir.path().join("notebook.json"))
            .unwrap();
        manager
    }

    #[test]
    fn duplicate_storage_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);
        let err = manager
            .add_storage::<Notebook>("contacts", dir.path().join("other.json"))
            .unwrap_err();
        assert!(matches!(err, RolodexError::Duplicate(_)));
    }

    #[test]
    fn unknown_storage_id_fails_everywhere() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);
        assert!(matches!(
            manager.load::<AddressBook>("missing"),
            Err(RolodexError::UnknownStorage(_))
        ));
        assert!(matches!(
            manager.save("missing", AddressBook::new()),
            Err(RolodexError::UnknownStorage(_))
        ));
        assert!(matches!(
            manager.flush("missing"),
            Err(RolodexError::UnknownStorage(_))
        ));
    }

    #[test]
    fn wrong_collection_type_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);
        assert!(matches!(
            manager.load::<Notebook>("contacts"),
            Err(RolodexError::StorageType { .. })
        ));
    }

    #[test]
    fn first_load_is_empty_and_marks_dirty() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);
        assert!(!manager.is_dirty("contacts"));

        let book = manager.load::<AddressBook>("contacts").unwrap();
        assert!(book.is_empty());
        assert!(manager.is_dirty("contacts"));
        assert!(!manager.is_dirty("notes"));
    }

    #[test]
    fn save_writes_through_and_clears_dirty() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);
        let mut book = manager.load::<AddressBook>("contacts").unwrap().clone();
        book.add_record(Record::new("Ann").unwrap()).unwrap();

        manager.save("contacts", book.clone()).unwrap();
        assert!(!manager.is_dirty("contacts"));

        let reloaded = manager.load::<AddressBook>("contacts").unwrap();
        assert_eq!(*reloaded, book);
    }

    #[test]
    fn save_all_unsaved_flushes_mutations_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);
        manager
            .load::<Notebook>("notes")
            .unwrap()
            .add_note(Note::new("todo", "buy milk").unwrap())
            .unwrap();

        let report = manager.save_all_unsaved();
        assert_eq!(report.saved, vec!["notes".to_string()]);
        assert!(report.is_clean());
        assert!(!manager.is_dirty("notes"));
        assert!(!dir.path().join("addressbook.json").exists());

        let again = manager.save_all_unsaved();
        assert!(again.saved.is_empty());
        assert!(again.failed.is_empty());

        let on_disk = FileStorage::<Notebook>::new(dir.path().join("notebook.json"))
            .load()
            .unwrap();
        assert_eq!(on_disk.find_by_name("todo").unwrap().text, "buy milk");
    }

    #[test]
    fn collection_mut_loads_on_first_use_and_keeps_cache() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);
        manager
            .collection_mut::<AddressBook>("contacts")
            .unwrap()
            .add_record(Record::new("Ann").unwrap())
            .unwrap();
        manager.flush("contacts").unwrap();
        assert!(!manager.is_dirty("contacts"));

        let book = manager.collection_mut::<AddressBook>("contacts").unwrap();
        assert!(book.find("Ann").is_some());
        assert!(manager.is_dirty("contacts"));
    }

    #[test]
    fn failed_flush_is_reported_and_stays_dirty() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");

        let mut manager = manager(&dir);
        manager
            .add_storage::<Notebook>("broken", blocker.join("notebook.json"))
            .unwrap();
        manager.load::<Notebook>("broken").unwrap();
        manager.load::<Notebook>("notes").unwrap();
        fs::write(&blocker, "a file where a directory should be").unwrap();

        let report = manager.save_all_unsaved();
        assert_eq!(report.saved, vec!["notes".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken");
        assert!(manager.is_dirty("broken"));
    }

    #[test]
    fn corrupt_file_surfaces_on_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("addressbook.json"), "{").unwrap();
        let mut manager = manager(&dir);
        assert!(matches!(
            manager.load::<AddressBook>("contacts"),
            Err(RolodexError::CorruptStorage { .. })
        ));
        assert!(!manager.is_dirty("contacts"));
    }

    static PANICKED_ONCE: AtomicBool = AtomicBool::new(false);

    /// Serializes normally except on its first write, which panics.
    #[derive(Debug, Default, Deserialize)]
    struct Fragile;

    impl Serialize for Fragile {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            if !PANICKED_ONCE.swap(true, Ordering::SeqCst) {
                panic!("write interrupted");
            }
            serializer.serialize_unit()
        }
    }

    impl Collection for Fragile {
        const KIND: &'static str = "fragile";

        fn empty() -> Self {
            Self
        }
    }

    #[test]
    fn flush_interrupted_by_panic_is_retried_on_next_call() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);
        manager
            .add_storage::<Fragile>("fragile", dir.path().join("fragile.json"))
            .unwrap();
        manager.load::<AddressBook>("contacts").unwrap();
        manager.load::<Fragile>("fragile").unwrap();

        let interrupted = panic::catch_unwind(AssertUnwindSafe(|| manager.save_all_unsaved()));
        assert!(interrupted.is_err());
        assert!(!manager.is_dirty("contacts"));
        assert!(manager.is_dirty("fragile"));

        let report = manager.save_all_unsaved();
        assert!(report.is_clean());
        assert_eq!(report.saved, vec!["fragile".to_string()]);
        assert!(dir.path().join("fragile.json").exists());
    }
}
