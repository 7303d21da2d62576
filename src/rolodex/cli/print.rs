use colored::Colorize;
use rolodex::address_book::UpcomingBirthday;
use rolodex::commands::{CmdMessage, CmdResult, ListedNote, MessageLevel};
use rolodex::error::RolodexError;
use rolodex::fields::DATE_FORMAT;
use rolodex::model::Record;
use rolodex::store::manager::FlushReport;
use unicode_width::UnicodeWidthStr;

const NOT_SET: &str = "-";

pub(super) fn print_result(result: &CmdResult) {
    if !result.contacts.is_empty() {
        print!("{}", render_contacts(&result.contacts));
    }
    if !result.notes.is_empty() {
        print!("{}", render_notes(&result.notes));
    }
    if !result.birthdays.is_empty() {
        print!("{}", render_birthdays(&result.birthdays));
    }
    print_messages(&result.messages);
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_error(err: &RolodexError) {
    print_messages(&[CmdMessage::error(format!("Error: {}", err))]);
}

pub(super) fn print_flush_report(report: &FlushReport) {
    let mut messages = Vec::new();
    for (id, err) in &report.failed {
        messages.push(CmdMessage::error(format!("Error: could not save {}: {}", id, err)));
    }
    if report.is_clean() {
        messages.push(CmdMessage::success("All changes saved."));
    }
    print_messages(&messages);
}

fn render_contacts(records: &[Record]) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            let phones = if r.phones().is_empty() {
                NOT_SET.to_string()
            } else {
                r.show_phones()
            };
            [
                r.name().to_string(),
                phones,
                r.birthday().unwrap_or_else(|| NOT_SET.to_string()),
                r.email().unwrap_or(NOT_SET).to_string(),
                r.address().unwrap_or(NOT_SET).to_string(),
            ]
        })
        .collect();
    render_table(["Name", "Phones", "Birthday", "Email", "Address"], &rows)
}

fn render_notes(notes: &[ListedNote]) -> String {
    let rows: Vec<[String; 4]> = notes
        .iter()
        .map(|listed| {
            let tags: Vec<String> = listed.note.tags.iter().map(|t| format!("#{}", t)).collect();
            [
                format!("{}.", listed.id),
                listed.note.name.clone(),
                listed.note.text.clone(),
                tags.join(" "),
            ]
        })
        .collect();
    render_table(["#", "Name", "Text", "Tags"], &rows)
}

fn render_birthdays(birthdays: &[UpcomingBirthday]) -> String {
    let rows: Vec<[String; 2]> = birthdays
        .iter()
        .map(|b| {
            [
                b.name.clone(),
                b.congratulation_date
                    .format(&format!("{} (%A)", DATE_FORMAT))
                    .to_string(),
            ]
        })
        .collect();
    render_table(["Name", "Congratulate on"], &rows)
}

/// Left-aligned columns sized by display width, so wide characters line up.
fn render_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths: [usize; N] = headers.map(|h| h.width());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut output = format!("{}\n", render_row(&header_cells, &widths).bold());
    for row in rows {
        output.push_str(&render_row(row, &widths));
        output.push('\n');
    }
    output
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            if i == last {
                cell.clone()
            } else {
                pad_to_width(cell, *width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rolodex::fields::Tag;
    use rolodex::model::Note;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn contacts_align_by_display_width() {
        plain();
        let mut ann = Record::new("Анна").unwrap();
        ann.add_phone("0501234567").unwrap();
        let mut bob = Record::new("Bob").unwrap();
        bob.set_email("bob@example.com").unwrap();

        let output = render_contacts(&[ann, bob]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name  Phones"));
        assert!(lines[1].starts_with("Анна  0501234567  -"));
        assert!(lines[2].starts_with("Bob   -           -"));
        assert!(lines[2].contains("bob@example.com"));
    }

    #[test]
    fn notes_show_id_and_tags() {
        plain();
        let mut note = Note::new("shopping", "milk").unwrap();
        note.add_tags(vec![Tag::parse("home").unwrap()]);
        let output = render_notes(&[ListedNote { id: 7, note }]);
        let row = output.lines().nth(1).unwrap();
        assert!(row.starts_with("7."));
        assert!(row.contains("shopping"));
        assert!(row.ends_with("#home"));
    }

    #[test]
    fn birthdays_include_weekday() {
        plain();
        let output = render_birthdays(&[UpcomingBirthday {
            name: "Ann".into(),
            congratulation_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        }]);
        assert!(output.contains("06.05.2024 (Monday)"));
    }

    #[test]
    fn pad_to_width_counts_columns_not_bytes() {
        assert_eq!(pad_to_width("日本", 6), "日本  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }
}
