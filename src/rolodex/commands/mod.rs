//! # Command Layer
//!
//! One function per user-facing command. Each takes already-split arguments and
//! the collection it works on, and returns a [`CmdResult`] or a typed error.
//! Nothing here prints or knows about the registry; the API facade supplies the
//! collection and the CLI renders the result.

use crate::address_book::UpcomingBirthday;
use crate::model::{Note, Record};

pub mod contacts;
pub mod notes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A note together with its surrogate id, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedNote {
    pub id: u64,
    pub note: Note,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub contacts: Vec<Record>,
    pub notes: Vec<ListedNote>,
    pub birthdays: Vec<UpcomingBirthday>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn message(message: CmdMessage) -> Self {
        let mut result = Self::default();
        result.add_message(message);
        result
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_contacts(mut self, contacts: Vec<Record>) -> Self {
        self.contacts = contacts;
        self
    }

    pub fn with_notes(mut self, notes: Vec<ListedNote>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_birthdays(mut self, birthdays: Vec<UpcomingBirthday>) -> Self {
        self.birthdays = birthdays;
        self
    }
}
