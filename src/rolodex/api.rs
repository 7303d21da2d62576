//! # API Facade
//!
//! [`RolodexApi`] is the single entry point for every rolodex operation. It
//! owns the shared store registry, picks the right collection for each call
//! and dispatches to the command layer.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Terminal I/O**: no stdout, stderr or exit codes
//!
//! Every method takes the registry lock for the duration of the command. The
//! signal watcher in [`crate::shutdown`] takes the same lock, so a shutdown
//! flush never observes a half-applied command.

use crate::address_book::AddressBook;
use crate::commands::{self, CmdResult};
use crate::config::RolodexConfig;
use crate::error::Result;
use crate::notebook::Notebook;
use crate::shutdown::{self, SharedManager};
use crate::store::manager::{DataManager, FlushReport};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::path::Path;
use std::sync::{Arc, MutexGuard};

pub const ADDRESS_BOOK: &str = "address_book";
pub const NOTEBOOK: &str = "notebook";

pub struct RolodexApi {
    manager: SharedManager,
}

impl RolodexApi {
    /// Registers both collections under `data_dir` and loads them.
    ///
    /// Missing files start empty. A corrupt file fails here, before any
    /// command can run and later overwrite it.
    pub fn open(data_dir: &Path, config: &RolodexConfig) -> Result<Self> {
        let mut manager = DataManager::new();
        manager.add_storage::<AddressBook>(ADDRESS_BOOK, config.address_book_path(data_dir))?;
        manager.add_storage::<Notebook>(NOTEBOOK, config.notebook_path(data_dir))?;

        let contacts = manager.load::<AddressBook>(ADDRESS_BOOK)?.len();
        let notes = manager.load::<Notebook>(NOTEBOOK)?.len();
        info!(
            "event=open data_dir={} contacts={} notes={}",
            data_dir.display(),
            contacts,
            notes
        );

        Ok(Self {
            manager: shutdown::shared(manager),
        })
    }

    /// The shared registry, for handing to the signal watcher.
    pub fn manager(&self) -> SharedManager {
        Arc::clone(&self.manager)
    }

    // --- contacts ---

    pub fn add_contact(&self, name: &str, phone: Option<&str>) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::add(book, name, phone))
    }

    pub fn change_phone(&self, name: &str, old: &str, new: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::change(book, name, old, new))
    }

    pub fn show_phone(&self, name: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::show_phone(book, name))
    }

    pub fn remove_phone(&self, name: &str, phone: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::remove_phone(book, name, phone))
    }

    pub fn all_contacts(&self) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::all(book))
    }

    pub fn delete_contact(&self, name: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::delete(book, name))
    }

    pub fn add_birthday(&self, name: &str, birthday: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::add_birthday(book, name, birthday))
    }

    pub fn show_birthday(&self, name: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::show_birthday(book, name))
    }

    /// Upcoming birthdays relative to the local calendar date.
    pub fn birthdays(&self) -> Result<CmdResult> {
        self.birthdays_on(Local::now().date_naive())
    }

    pub fn birthdays_on(&self, today: NaiveDate) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::birthdays(book, today))
    }

    pub fn add_email(&self, name: &str, email: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::add_email(book, name, email))
    }

    pub fn add_address(&self, name: &str, address: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::add_address(book, name, address))
    }

    pub fn search_contacts(&self, term: &str) -> Result<CmdResult> {
        self.with_book(|book| commands::contacts::search(book, term))
    }

    // --- notes ---

    pub fn add_note(&self, name: &str, text: &str) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::add(notebook, name, text))
    }

    pub fn edit_note(&self, name: &str, text: &str) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::edit(notebook, name, text))
    }

    pub fn delete_note(&self, name: &str) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::delete(notebook, name))
    }

    pub fn find_notes(&self, text: &str) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::find(notebook, text))
    }

    pub fn all_notes(&self) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::all(notebook))
    }

    pub fn add_tags(&self, name: &str, tags: &[String]) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::add_tags(notebook, name, tags))
    }

    pub fn find_notes_by_tag(&self, tag: &str) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::find_by_tag(notebook, tag))
    }

    pub fn sort_notes_by_tag(&self, tag: &str) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::sort_by_tag(notebook, tag))
    }

    pub fn remove_tag(&self, name: &str, tag: &str) -> Result<CmdResult> {
        self.with_notebook(|notebook| commands::notes::remove_tag(notebook, name, tag))
    }

    // --- persistence ---

    /// Writes every dirty collection to disk.
    pub fn save_all(&self) -> FlushReport {
        let report = self.lock().save_all_unsaved();
        for (id, err) in &report.failed {
            warn!("event=save_all status=error storage={} error={}", id, err);
        }
        report
    }

    fn with_book<F>(&self, f: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut AddressBook) -> Result<CmdResult>,
    {
        let mut guard = self.lock();
        f(guard.collection_mut::<AddressBook>(ADDRESS_BOOK)?)
    }

    fn with_notebook<F>(&self, f: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut Notebook) -> Result<CmdResult>,
    {
        let mut guard = self.lock();
        f(guard.collection_mut::<Notebook>(NOTEBOOK)?)
    }

    fn lock(&self) -> MutexGuard<'_, DataManager> {
        match self.manager.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("registry lock poisoned, continuing with recovered state");
                poisoned.into_inner()
            }
        }
    }
}
