use super::Collection;
use crate::error::{Result, RolodexError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    kind: &'a str,
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    kind: String,
    version: u32,
    data: T,
}

/// File-backed storage for one collection type.
pub struct FileStorage<T: Collection> {
    path: PathBuf,
    _collection: PhantomData<fn() -> T>,
}

impl<T: Collection> FileStorage<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _collection: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a full snapshot of `data`, replacing the file atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(RolodexError::Io)?;
        }

        let envelope = EnvelopeRef {
            kind: T::KIND,
            version: FORMAT_VERSION,
            data,
        };
        let content = serde_json::to_string_pretty(&envelope).map_err(RolodexError::Serialization)?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| T::KIND.to_string());
        let tmp_file = dir.join(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(RolodexError::Io)?;
        if let Err(err) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(RolodexError::Io(err));
        }

        debug!("saved {} to {}", T::KIND, self.path.display());
        Ok(())
    }

    /// Reads the stored collection, or an empty one if nothing was saved yet.
    pub fn load(&self) -> Result<T> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no {} file at {}, starting empty", T::KIND, self.path.display());
                return Ok(T::empty());
            }
            Err(err) => return Err(RolodexError::Io(err)),
        };

        let envelope: Envelope<T> =
            serde_json::from_str(&content).map_err(|err| self.corrupt(err.to_string()))?;
        if envelope.kind != T::KIND {
            return Err(self.corrupt(format!(
                "expected {} data, found {}",
                T::KIND,
                envelope.kind
            )));
        }
        if envelope.version > FORMAT_VERSION {
            return Err(self.corrupt(format!(
                "format version {} is newer than supported version {}",
                envelope.version, FORMAT_VERSION
            )));
        }

        debug!("loaded {} from {}", T::KIND, self.path.display());
        Ok(envelope.data)
    }

    fn corrupt(&self, reason: String) -> RolodexError {
        RolodexError::CorruptStorage {
            path: self.path.clone(),
            reason,
        }
    }
}
