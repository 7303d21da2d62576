//! Notebook commands.

use crate::commands::{CmdMessage, CmdResult, ListedNote};
use crate::error::{Result, RolodexError};
use crate::fields::Tag;
use crate::model::Note;
use crate::notebook::Notebook;

pub fn add(notebook: &mut Notebook, name: &str, text: &str) -> Result<CmdResult> {
    let note = Note::new(name, text)?;
    let name = note.name.clone();
    notebook.add_note(note)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "New note with name '{}' has been successfully added to your notebook",
        name
    ))))
}

pub fn edit(notebook: &mut Notebook, name: &str, text: &str) -> Result<CmdResult> {
    if text.trim().is_empty() {
        return Err(RolodexError::validation("You need to specify text note to edit"));
    }
    notebook.edit_note(name, text)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Note with name '{}' has been successfully edited",
        name
    ))))
}

pub fn delete(notebook: &mut Notebook, name: &str) -> Result<CmdResult> {
    notebook.delete_note(name)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Note with name '{}' has been successfully deleted",
        name
    ))))
}

pub fn find(notebook: &Notebook, text: &str) -> Result<CmdResult> {
    if text.trim().is_empty() {
        return Err(RolodexError::validation("You need to specify search pattern"));
    }
    let found = listed(notebook, notebook.find_by_text(text));
    Ok(listing(found, "Nothing found".to_string()))
}

pub fn all(notebook: &Notebook) -> Result<CmdResult> {
    let notes = notebook
        .iter()
        .map(|(id, note)| ListedNote {
            id,
            note: note.clone(),
        })
        .collect();
    Ok(listing(
        notes,
        "You don't have notes at the moment".to_string(),
    ))
}

pub fn add_tags(notebook: &mut Notebook, name: &str, tags: &[String]) -> Result<CmdResult> {
    if tags.is_empty() {
        return Err(RolodexError::validation(
            "You need to specify note name and at least one tag",
        ));
    }
    let parsed = tags
        .iter()
        .map(|t| Tag::parse(t))
        .collect::<Result<Vec<_>>>()?;
    let rendered: Vec<String> = parsed.iter().map(Tag::to_string).collect();
    notebook.add_tags_to_note(name, parsed)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Tags {} were added to note '{}'",
        rendered.join(", "),
        name
    ))))
}

pub fn find_by_tag(notebook: &Notebook, tag: &str) -> Result<CmdResult> {
    let found = listed(notebook, notebook.find_by_tag(tag));
    Ok(listing(found, format!("No notes found with tag '{}'", tag)))
}

pub fn sort_by_tag(notebook: &Notebook, tag: &str) -> Result<CmdResult> {
    let found = listed(notebook, notebook.sort_notes_by_tag(tag));
    Ok(listing(found, format!("No notes found with tag '{}'", tag)))
}

pub fn remove_tag(notebook: &mut Notebook, name: &str, tag: &str) -> Result<CmdResult> {
    notebook.remove_tag_from_note(name, tag)?;
    Ok(CmdResult::message(CmdMessage::success(format!(
        "Tag '{}' was removed from note '{}'",
        tag, name
    ))))
}

/// Pairs query results with their ids, keeping the query's order.
fn listed(notebook: &Notebook, notes: Vec<&Note>) -> Vec<ListedNote> {
    notes
        .into_iter()
        .filter_map(|note| {
            notebook
                .iter()
                .find(|(_, candidate)| std::ptr::eq(*candidate, note))
                .map(|(id, _)| ListedNote {
                    id,
                    note: note.clone(),
                })
        })
        .collect()
}

fn listing(notes: Vec<ListedNote>, empty_message: String) -> CmdResult {
    if notes.is_empty() {
        return CmdResult::message(CmdMessage::info(empty_message));
    }
    CmdResult::default().with_notes(notes)
}
