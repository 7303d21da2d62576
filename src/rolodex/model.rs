use crate::error::{Result, RolodexError};
use crate::fields::{Address, Birthday, Email, Name, Phone, Tag};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

const NOT_SET: &str = "not set";

/// A contact: a name plus whatever reachability details have been recorded.
///
/// Phones keep their insertion order and are unique within the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: Name,
    phones: Vec<Phone>,
    birthday: Option<Birthday>,
    email: Option<Email>,
    address: Option<Address>,
}

impl Record {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: Name::parse(name)?,
            phones: Vec::new(),
            birthday: None,
            email: None,
            address: None,
        })
    }

    /// Read-only so a record held through `find_mut` cannot be renamed onto
    /// another contact's name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn add_phone(&mut self, phone: &str) -> Result<()> {
        let phone = phone.trim();
        if self.find_phone(phone).is_ok() {
            return Err(RolodexError::duplicate(format!(
                "Phone {} already exists in contacts",
                phone
            )));
        }
        self.phones.push(Phone::parse(phone)?);
        Ok(())
    }

    /// Replaces `old` in place. The new value goes through the phone validator
    /// and may not collide with another phone on this record.
    pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<()> {
        let position = self.phone_position(old)?;
        let replacement = Phone::parse(new)?;
        let collides = self
            .phones
            .iter()
            .enumerate()
            .any(|(i, p)| i != position && *p == replacement);
        if collides {
            return Err(RolodexError::duplicate(format!(
                "Phone {} already exists in contacts",
                replacement
            )));
        }
        self.phones[position] = replacement;
        Ok(())
    }

    pub fn remove_phone(&mut self, phone: &str) -> Result<Phone> {
        let position = self.phone_position(phone)?;
        Ok(self.phones.remove(position))
    }

    pub fn find_phone(&self, phone: &str) -> Result<&Phone> {
        let position = self.phone_position(phone)?;
        Ok(&self.phones[position])
    }

    fn phone_position(&self, phone: &str) -> Result<usize> {
        let phone = phone.trim();
        self.phones
            .iter()
            .position(|p| p.as_str() == phone)
            .ok_or_else(|| RolodexError::not_found(format!("Phone {} not found in contacts", phone)))
    }

    pub fn show_phones(&self) -> String {
        self.phones
            .iter()
            .map(Phone::as_str)
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn set_birthday(&mut self, birthday: &str) -> Result<()> {
        self.birthday = Some(Birthday::parse(birthday)?);
        Ok(())
    }

    /// The birthday rendered as `DD.MM.YYYY`, or `None` when unset.
    pub fn birthday(&self) -> Option<String> {
        self.birthday.map(|b| b.to_string())
    }

    pub fn birthday_date(&self) -> Option<NaiveDate> {
        self.birthday.map(|b| b.date())
    }

    pub fn set_email(&mut self, email: &str) -> Result<()> {
        self.email = Some(Email::parse(email)?);
        Ok(())
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_ref().map(Email::as_str)
    }

    pub fn set_address(&mut self, address: &str) -> Result<()> {
        self.address = Some(Address::parse(address)?);
        Ok(())
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_ref().map(Address::as_str)
    }

    /// Case-insensitive substring match over every text field.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        let contains = |value: &str| value.to_lowercase().contains(&term);

        contains(self.name.as_str())
            || self.phones.iter().any(|p| p.as_str().contains(&term))
            || self.email().is_some_and(contains)
            || self.address().is_some_and(contains)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Contact name: {}, phones: {}, birthday: {}, email: {}, address: {}",
            self.name,
            self.show_phones(),
            self.birthday().as_deref().unwrap_or(NOT_SET),
            self.email().unwrap_or(NOT_SET),
            self.address().unwrap_or(NOT_SET),
        )
    }
}

/// A named piece of text with free-form tags.
///
/// Tags may repeat; `remove_tag` drops the first occurrence only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Note {
    pub fn new(name: &str, text: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RolodexError::validation(
                "You need to specify name of your note",
            ));
        }
        if text.trim().is_empty() {
            return Err(RolodexError::validation(
                "You need to specify text of your note",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            text: text.to_string(),
            tags: Vec::new(),
        })
    }

    pub fn edit(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn add_tags(&mut self, tags: impl IntoIterator<Item = Tag>) {
        self.tags.extend(tags);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.as_str() == tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> Result<Tag> {
        let position = self
            .tags
            .iter()
            .position(|t| t.as_str() == tag)
            .ok_or_else(|| {
                RolodexError::not_found(format!("Tag '{}' not found in note '{}'", tag, self.name))
            })?;
        Ok(self.tags.remove(position))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.tags.iter().map(Tag::as_str).collect();
        write!(
            f,
            "name: {}; text: {}; tags: [{}]",
            self.name,
            self.text,
            tags.join(", ")
        )
    }
}
