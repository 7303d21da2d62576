//! # Address Book
//!
//! [`AddressBook`] keys contacts by a surrogate id handed out at insertion.
//! Ids only ever grow: deleting a record never frees its id, so a `BTreeMap`
//! iterated in key order is also insertion order.
//!
//! Contact names are unique. The check lives here, in [`AddressBook::add_record`],
//! rather than being left to callers.
//!
//! ## Upcoming birthdays
//!
//! [`AddressBook::upcoming_birthdays`] looks [`BIRTHDAY_WINDOW_DAYS`] days ahead
//! of a given day (inclusive on both ends). Each birthday is moved into the
//! current year, or the next one if it already passed, and if it lands on a
//! weekend the congratulation moves to the following Monday.

use crate::error::{Result, RolodexError};
use crate::model::Record;
use crate::store::{check_entries, Collection};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingBirthday {
    pub name: String,
    pub congratulation_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAddressBook")]
pub struct AddressBook {
    last_id: u64,
    records: BTreeMap<u64, Record>,
}

/// On-disk shape, checked before it becomes an [`AddressBook`].
#[derive(Deserialize)]
struct RawAddressBook {
    last_id: u64,
    records: BTreeMap<u64, Record>,
}

impl TryFrom<RawAddressBook> for AddressBook {
    type Error = RolodexError;

    fn try_from(raw: RawAddressBook) -> Result<Self> {
        check_entries(
            raw.last_id,
            raw.records.iter().map(|(id, r)| (*id, r.name().as_str())),
        )?;
        Ok(Self {
            last_id: raw.last_id,
            records: raw.records,
        })
    }
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` under a fresh id. Fails if a contact with the same
    /// name already exists.
    pub fn add_record(&mut self, record: Record) -> Result<u64> {
        if self.find(record.name().as_str()).is_some() {
            return Err(RolodexError::duplicate(format!(
                "Contact with name \"{}\" already exists",
                record.name()
            )));
        }
        self.last_id += 1;
        self.records.insert(self.last_id, record);
        Ok(self.last_id)
    }

    /// Looks a contact up by name. Surrounding whitespace is ignored, the
    /// same way it is when the name is stored.
    pub fn find(&self, name: &str) -> Option<&Record> {
        let name = name.trim();
        self.records.values().find(|r| r.name().as_str() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> {
        let name = name.trim();
        self.records.values_mut().find(|r| r.name().as_str() == name)
    }

    /// Like [`find_mut`](Self::find_mut) but reports a miss as `NotFound`.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Record> {
        self.find_mut(name).ok_or_else(|| missing_contact(name))
    }

    pub fn delete(&mut self, name: &str) -> Result<Record> {
        let name = name.trim();
        let id = self
            .records
            .iter()
            .find(|(_, r)| r.name().as_str() == name)
            .map(|(id, _)| *id)
            .ok_or_else(|| missing_contact(name))?;
        self.records.remove(&id).ok_or_else(|| missing_contact(name))
    }

    pub fn search(&self, term: &str) -> Vec<&Record> {
        self.records.values().filter(|r| r.matches(term)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &Record)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Contacts whose next birthday falls within the window starting at `today`,
    /// in insertion order.
    pub fn upcoming_birthdays(&self, today: NaiveDate) -> Vec<UpcomingBirthday> {
        self.records
            .values()
            .filter_map(|record| {
                let birthday = record.birthday_date()?;
                let mut candidate = in_year(birthday, today.year());
                if candidate < today {
                    candidate = in_year(birthday, today.year() + 1);
                }
                if (candidate - today).num_days() > BIRTHDAY_WINDOW_DAYS {
                    return None;
                }
                Some(UpcomingBirthday {
                    name: record.name().to_string(),
                    congratulation_date: congratulation_date(candidate),
                })
            })
            .collect()
    }
}

impl Collection for AddressBook {
    const KIND: &'static str = "address-book";

    fn empty() -> Self {
        Self::new()
    }
}

fn missing_contact(name: &str) -> RolodexError {
    RolodexError::not_found(format!("Contact with name \"{}\" not found", name))
}

/// The birthday's day and month in `year`. 29 February falls back to
/// 1 March in non-leap years.
fn in_year(birthday: NaiveDate, year: i32) -> NaiveDate {
    birthday
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(birthday)
}

fn congratulation_date(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}
