//! Address book commands.

use crate::address_book::AddressBook;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, RolodexError};
use crate::model::Record;
use chrono::NaiveDate;

/// Creates the contact if needed, then attaches `phone` when given.
///
/// A new contact is only inserted once its phone has validated, so a typo
/// does not leave a phoneless contact behind.
pub fn add(book: &mut AddressBook, name: &str, phone: Option<&str>) -> Result<CmdResult> {
    let name = name.trim();
    if let Some(record) = book.find_mut(name) {
        let Some(phone) = phone else {
            return Err(RolodexError::duplicate(format!(
                "Contact with name \"{}\" already exists",
                name
            )));
        };
        record.add_phone(phone)?;
        return Ok(CmdResult::message(CmdMessage::success("Contact updated.")));
    }

    let mut record = Record::new(name)?;
    if let Some(phone) = phone {
        record.add_phone(phone)?;
    }
    book.add_record(record)?;
    Ok(CmdResult::message(CmdMessage::success("Contact added.")))
}

pub fn change(book: &mut AddressBook, name: &str, old: &str, new: &str) -> Result<CmdResult> {
    book.get_mut(name)?.edit_phone(old, new)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Old phone {} was replaced by new phone {} for contact {}.",
        old.trim(),
        new.trim(),
        name
    ))))
}

pub fn show_phone(book: &AddressBook, name: &str) -> Result<CmdResult> {
    let record = find(book, name)?;
    if record.phones().is_empty() {
        return Ok(CmdResult::message(CmdMessage::warning(format!(
            "Contact {} has no phones",
            name
        ))));
    }
    Ok(CmdResult::message(CmdMessage::info(record.show_phones())))
}

pub fn remove_phone(book: &mut AddressBook, name: &str, phone: &str) -> Result<CmdResult> {
    let removed = book.get_mut(name)?.remove_phone(phone)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Phone {} successfully removed from contact {}",
        removed, name
    ))))
}

pub fn all(book: &AddressBook) -> Result<CmdResult> {
    if book.is_empty() {
        return Ok(CmdResult::message(CmdMessage::info(
            "There are no contacts in the list",
        )));
    }
    let contacts = book.iter().map(|(_, r)| r.clone()).collect();
    Ok(CmdResult::default().with_contacts(contacts))
}

pub fn delete(book: &mut AddressBook, name: &str) -> Result<CmdResult> {
    book.delete(name)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Contact with name \"{}\" successfully deleted",
        name
    ))))
}

pub fn add_birthday(book: &mut AddressBook, name: &str, birthday: &str) -> Result<CmdResult> {
    let record = book.get_mut(name)?;
    record.set_birthday(birthday)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Birthday {} successfully added to contact {}",
        birthday.trim(),
        name
    ))))
}

pub fn show_birthday(book: &AddressBook, name: &str) -> Result<CmdResult> {
    let record = find(book, name)?;
    let message = match record.birthday() {
        Some(birthday) => format!("{}'s birthday is {}", name, birthday),
        None => format!("{}'s birthday is not set", name),
    };
    Ok(CmdResult::message(CmdMessage::info(message)))
}

pub fn birthdays(book: &AddressBook, today: NaiveDate) -> Result<CmdResult> {
    let upcoming = book.upcoming_birthdays(today);
    if upcoming.is_empty() {
        return Ok(CmdResult::message(CmdMessage::info(
            "No contacts with upcoming birthdays",
        )));
    }
    Ok(CmdResult::default().with_birthdays(upcoming))
}

pub fn add_email(book: &mut AddressBook, name: &str, email: &str) -> Result<CmdResult> {
    let record = book.get_mut(name)?;
    record.set_email(email)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Email {} successfully added to contact {}",
        email.trim(),
        name
    ))))
}

pub fn add_address(book: &mut AddressBook, name: &str, address: &str) -> Result<CmdResult> {
    let record = book.get_mut(name)?;
    record.set_address(address)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Address successfully added to contact {}",
        name
    ))))
}

pub fn search(book: &AddressBook, term: &str) -> Result<CmdResult> {
    if term.trim().is_empty() {
        return Err(RolodexError::validation("You need to specify a search term"));
    }
    let found: Vec<Record> = book.search(term.trim()).into_iter().cloned().collect();
    if found.is_empty() {
        return Ok(CmdResult::message(CmdMessage::info("Nothing found")));
    }
    Ok(CmdResult::default().with_contacts(found))
}

fn find<'a>(book: &'a AddressBook, name: &str) -> Result<&'a Record> {
    book.find(name).ok_or_else(|| {
        RolodexError::not_found(format!("There is no contact with name {}", name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    fn book() -> AddressBook {
        let mut book = AddressBook::new();
        add(&mut book, "Ann", Some("0501234567")).unwrap();
        book
    }

    fn text(result: &CmdResult) -> &str {
        &result.messages[0].content
    }

    #[test]
    fn add_creates_then_updates() {
        let mut book = AddressBook::new();
        let created = add(&mut book, "Ann", Some("0501234567")).unwrap();
        assert_eq!(text(&created), "Contact added.");
        assert_eq!(created.messages[0].level, MessageLevel::Success);

        let updated = add(&mut book, "Ann", Some("0507654321")).unwrap();
        assert_eq!(text(&updated), "Contact updated.");
        assert_eq!(
            book.find("Ann").unwrap().show_phones(),
            "0501234567; 0507654321"
        );
    }

    #[test]
    fn add_without_phone_creates_bare_contact() {
        let mut book = AddressBook::new();
        add(&mut book, "Ann", None).unwrap();
        assert!(book.find("Ann").unwrap().phones().is_empty());

        let err = add(&mut book, "Ann", None).unwrap_err();
        assert!(matches!(err, RolodexError::Duplicate(_)));
    }

    #[test]
    fn add_with_padded_name_updates_the_existing_contact() {
        let mut book = book();
        let result = add(&mut book, " Ann ", Some("0677654321")).unwrap();
        assert_eq!(text(&result), "Contact updated.");
        assert_eq!(book.len(), 1);
        assert_eq!(
            book.find("Ann").unwrap().show_phones(),
            "0501234567; 0677654321"
        );
        change(&mut book, "Ann ", "0677654321", "0670000000").unwrap();
        remove_phone(&mut book, " Ann", "0670000000").unwrap();
    }

    #[test]
    fn add_with_invalid_phone_inserts_nothing() {
        let mut book = AddressBook::new();
        let err = add(&mut book, "Ann", Some("123")).unwrap_err();
        assert!(matches!(err, RolodexError::Validation(_)));
        assert!(book.is_empty());
    }

    #[test]
    fn add_duplicate_phone_fails() {
        let mut book = book();
        let err = add(&mut book, "Ann", Some(" 0501234567 ")).unwrap_err();
        assert!(matches!(err, RolodexError::Duplicate(_)));
    }

    #[test]
    fn change_replaces_phone() {
        let mut book = book();
        let result = change(&mut book, "Ann", "0501234567", "0670000000").unwrap();
        assert_eq!(
            text(&result),
            "Old phone 0501234567 was replaced by new phone 0670000000 for contact Ann."
        );
        assert_eq!(book.find("Ann").unwrap().show_phones(), "0670000000");
    }

    #[test]
    fn change_on_missing_contact_is_not_found() {
        let mut book = book();
        assert!(matches!(
            change(&mut book, "Bob", "0501234567", "0670000000"),
            Err(RolodexError::NotFound(_))
        ));
    }

    #[test]
    fn remove_phone_removes_only_that_phone() {
        let mut book = book();
        add(&mut book, "Ann", Some("0670000000")).unwrap();
        remove_phone(&mut book, "Ann", "0501234567").unwrap();
        assert_eq!(book.find("Ann").unwrap().show_phones(), "0670000000");
    }

    #[test]
    fn show_phone_and_birthday() {
        let mut book = book();
        assert_eq!(text(&show_phone(&book, "Ann").unwrap()), "0501234567");
        assert_eq!(
            text(&show_birthday(&book, "Ann").unwrap()),
            "Ann's birthday is not set"
        );

        add_birthday(&mut book, "Ann", "01.01.1990").unwrap();
        assert_eq!(
            text(&show_birthday(&book, "Ann").unwrap()),
            "Ann's birthday is 01.01.1990"
        );
    }

    #[test]
    fn add_birthday_rejects_bad_format() {
        let mut book = book();
        assert!(matches!(
            add_birthday(&mut book, "Ann", "1990-01-01"),
            Err(RolodexError::Validation(_))
        ));
    }

    #[test]
    fn all_lists_contacts_in_insertion_order() {
        let mut book = book();
        add(&mut book, "Bob", None).unwrap();
        let result = all(&book).unwrap();
        let names: Vec<&str> = result.contacts.iter().map(|r| r.name().as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);

        let empty = all(&AddressBook::new()).unwrap();
        assert!(empty.contacts.is_empty());
        assert_eq!(text(&empty), "There are no contacts in the list");
    }

    #[test]
    fn delete_reports_missing_contact() {
        let mut book = book();
        assert!(matches!(
            delete(&mut book, "Bob"),
            Err(RolodexError::NotFound(_))
        ));
        let result = delete(&mut book, "Ann").unwrap();
        assert_eq!(text(&result), "Contact with name \"Ann\" successfully deleted");
        assert!(book.is_empty());
    }

    #[test]
    fn birthdays_lists_upcoming() {
        let mut book = book();
        add_birthday(&mut book, "Ann", "04.05.1990").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let result = birthdays(&book, today).unwrap();
        assert_eq!(result.birthdays.len(), 1);
        assert_eq!(
            result.birthdays[0].congratulation_date,
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
        );

        let later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let none = birthdays(&book, later).unwrap();
        assert_eq!(text(&none), "No contacts with upcoming birthdays");
    }

    #[test]
    fn email_and_address_are_validated() {
        let mut book = book();
        add_email(&mut book, "Ann", "ann@example.com").unwrap();
        assert!(add_email(&mut book, "Ann", "nope").is_err());
        add_address(&mut book, "Ann", "1 Main Street").unwrap();
        assert!(add_address(&mut book, "Ann", &"x".repeat(81)).is_err());

        let record = book.find("Ann").unwrap();
        assert_eq!(record.email(), Some("ann@example.com"));
        assert_eq!(record.address(), Some("1 Main Street"));
    }

    #[test]
    fn search_finds_by_any_field() {
        let mut book = book();
        add_email(&mut book, "Ann", "ann@example.com").unwrap();
        assert_eq!(search(&book, "EXAMPLE").unwrap().contacts.len(), 1);
        assert_eq!(text(&search(&book, "zzz").unwrap()), "Nothing found");
        assert!(search(&book, " ").is_err());
    }
}
