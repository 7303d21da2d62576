use crate::error::{Result, RolodexError};
use crate::fields::Tag;
use crate::model::Note;
use crate::store::{check_entries, Collection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Notes keyed by surrogate id, with the same id discipline as the address book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNotebook")]
pub struct Notebook {
    last_id: u64,
    notes: BTreeMap<u64, Note>,
}

#[derive(Deserialize)]
struct RawNotebook {
    last_id: u64,
    notes: BTreeMap<u64, Note>,
}

impl TryFrom<RawNotebook> for Notebook {
    type Error = RolodexError;

    fn try_from(raw: RawNotebook) -> Result<Self> {
        check_entries(
            raw.last_id,
            raw.notes.iter().map(|(id, n)| (*id, n.name.as_str())),
        )?;
        Ok(Self {
            last_id: raw.last_id,
            notes: raw.notes,
        })
    }
}

impl Notebook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_note(&mut self, note: Note) -> Result<u64> {
        if self.find_by_name(&note.name).is_some() {
            return Err(RolodexError::duplicate(format!(
                "Your notebook already contains a note with name '{}'",
                note.name
            )));
        }
        self.last_id += 1;
        self.notes.insert(self.last_id, note);
        Ok(self.last_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Note> {
        let name = name.trim();
        self.notes.values().find(|n| n.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Note> {
        let name = name.trim();
        self.notes
            .values_mut()
            .find(|n| n.name == name)
            .ok_or_else(|| missing_note(name))
    }

    pub fn edit_note(&mut self, name: &str, text: &str) -> Result<&Note> {
        let note = self.get_mut(name)?;
        note.edit(text);
        Ok(&*note)
    }

    pub fn delete_note(&mut self, name: &str) -> Result<Note> {
        let name = name.trim();
        let id = self
            .notes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
            .ok_or_else(|| missing_note(name))?;
        self.notes.remove(&id).ok_or_else(|| missing_note(name))
    }

    /// Case-insensitive substring search over note names and bodies.
    /// An empty result means nothing matched.
    pub fn find_by_text(&self, text: &str) -> Vec<&Note> {
        let needle = text.to_lowercase();
        self.notes
            .values()
            .filter(|n| {
                n.name.to_lowercase().contains(&needle) || n.text.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<&Note> {
        self.notes.values().filter(|n| n.has_tag(tag)).collect()
    }

    pub fn sort_notes_by_tag(&self, tag: &str) -> Vec<&Note> {
        let mut notes = self.find_by_tag(tag);
        notes.sort_by(|a, b| a.name.cmp(&b.name));
        notes
    }

    pub fn add_tags_to_note(&mut self, name: &str, tags: Vec<Tag>) -> Result<&Note> {
        let note = self.get_mut(name)?;
        note.add_tags(tags);
        Ok(&*note)
    }

    pub fn remove_tag_from_note(&mut self, name: &str, tag: &str) -> Result<&Note> {
        let note = self.get_mut(name)?;
        note.remove_tag(tag)?;
        Ok(&*note)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &Note)> {
        self.notes.iter().map(|(id, n)| (*id, n))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }
}

impl Collection for Notebook {
    const KIND: &'static str = "notebook";

    fn empty() -> Self {
        Self::new()
    }
}

fn missing_note(name: &str) -> RolodexError {
    RolodexError::not_found(format!(
        "Note with name '{}' was not found in your notebook",
        name
    ))
}
