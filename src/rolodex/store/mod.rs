//! # Storage Layer
//!
//! Rolodex keeps each collection (the address book, the notebook) as one JSON
//! file holding a full snapshot. There is no incremental format: every save
//! rewrites the whole file.
//!
//! ## Pieces
//!
//! - [`Collection`]: implemented by every type that can be persisted. It names
//!   the collection kind written into the file and supplies the empty value
//!   used on first run.
//! - [`fs::FileStorage`]: reads and writes one collection type to one path.
//! - [`manager::DataManager`]: the registry. Maps storage ids to file storages,
//!   caches the loaded collections and remembers which of them are dirty, so
//!   everything can be flushed in one go on exit or on a termination signal.
//!
//! ## File Format
//!
//! ```text
//! <data dir>/
//! ├── addressbook.json    # {"kind": "address-book", "version": 1, "data": {...}}
//! ├── notebook.json       # {"kind": "notebook", "version": 1, "data": {...}}
//! ├── config.json
//! └── logs/
//! ```
//!
//! A missing file loads as an empty collection. A file that is present but
//! cannot be decoded, holds a different kind of collection, or breaks the
//! collection's own rules (see [`check_entries`]) is a
//! [`RolodexError::CorruptStorage`](crate::error::RolodexError::CorruptStorage)
//! error and is never silently replaced.

use crate::error::{Result, RolodexError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;

pub mod fs;
pub mod manager;

/// A keyed collection that can be persisted as a single snapshot.
pub trait Collection: Serialize + DeserializeOwned + Send + 'static {
    /// Tag written into the file envelope and checked on load.
    const KIND: &'static str;

    /// The value a storage yields before anything has been saved.
    fn empty() -> Self;
}

/// Whole-collection rules for id-keyed data read back from disk: no key is
/// above the id counter (ids are handed out as `last_id + 1`, so a lower
/// counter would overwrite an entry) and no two entries share a name.
pub(crate) fn check_entries<'a>(
    last_id: u64,
    entries: impl IntoIterator<Item = (u64, &'a str)>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for (id, name) in entries {
        if id > last_id {
            return Err(RolodexError::validation(format!(
                "id {} is above the id counter {}",
                id, last_id
            )));
        }
        if !seen.insert(name) {
            return Err(RolodexError::duplicate(format!(
                "name '{}' is used by more than one entry",
                name
            )));
        }
    }
    Ok(())
}
