use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rolodex", bin_name = "rolodex", version)]
#[command(about = "Interactive address book and notebook", long_about = None)]
pub struct Cli {
    /// Directory holding the data files (overrides ROLODEX_HOME)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// One line of input. The first token selects the command, the way a
/// multicall binary is selected by its name.
#[derive(Parser, Debug)]
#[command(multicall = true, disable_help_subcommand = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Say hello
    Hello,

    /// Add a contact, or another phone to an existing one
    Add {
        name: String,
        phone: Option<String>,
    },

    /// Replace one of a contact's phones
    Change {
        name: String,
        old_phone: String,
        new_phone: String,
    },

    /// Show a contact's phones
    Phone { name: String },

    /// Remove one phone from a contact
    RemovePhone { name: String, phone: String },

    /// List all contacts
    All,

    /// Delete a contact
    Remove { name: String },

    /// Set a contact's birthday (DD.MM.YYYY)
    AddBirthday { name: String, birthday: String },

    /// Show a contact's birthday
    ShowBirthday { name: String },

    /// Birthdays in the next 7 days
    Birthdays,

    /// Set a contact's email
    AddEmail { name: String, email: String },

    /// Set a contact's address
    AddAddress {
        name: String,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        address: Vec<String>,
    },

    /// Find contacts by any field
    Search { term: String },

    /// Add a note
    AddNote {
        name: String,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Replace a note's text
    EditNote {
        name: String,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Delete a note
    DeleteNote { name: String },

    /// Find notes by name or text
    FindNote { term: String },

    /// List all notes
    ShowAllNotes,

    /// Tag a note
    AddTags {
        name: String,
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Notes carrying a tag
    FindNoteByTag { tag: String },

    /// Notes carrying a tag, ordered by name
    SortNotesByTag { tag: String },

    /// Remove a tag from a note
    RemoveTag { name: String, tag: String },

    /// Write all changes to disk
    Save,

    /// Save and quit
    #[command(alias = "close")]
    Exit,

    /// Show this help
    Help,
}

/// How a line failed to parse.
#[derive(Debug)]
pub enum LineError {
    /// The first token is not a command.
    UnknownCommand(String),
    /// A known command with bad arguments, or an explicit `--help`.
    Usage(clap::Error),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, LineError> {
    let mut args = split_args(line);
    let Some(first) = args.first_mut() else {
        return Ok(None);
    };
    *first = first.to_lowercase();

    if Line::command().find_subcommand(first.as_str()).is_none() {
        return Err(LineError::UnknownCommand(first.clone()));
    }
    Line::try_parse_from(args)
        .map(|line| Some(line.command))
        .map_err(LineError::Usage)
}

/// Splits on whitespace. Double quotes group words into one argument and
/// are removed; an unterminated quote runs to the end of the line.
pub fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut started = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    args.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        args.push(current);
    }
    args
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandGroup {
    Contacts,
    Notes,
    Session,
}

impl CommandGroup {
    fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Contacts => "Contacts:",
            CommandGroup::Notes => "Notes:",
            CommandGroup::Session => "Session:",
        }
    }

    fn for_command(name: &str) -> Self {
        match name {
            "hello" | "save" | "exit" | "help" => CommandGroup::Session,
            n if n.contains("note") || n.contains("tag") => CommandGroup::Notes,
            _ => CommandGroup::Contacts,
        }
    }

    fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Contacts,
            CommandGroup::Notes,
            CommandGroup::Session,
        ]
    }
}

/// The grouped command list shown by `help`.
pub fn grouped_help() -> String {
    let cmd = Line::command();
    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    let mut output = String::new();
    for group in CommandGroup::all() {
        output.push_str(group.heading());
        output.push('\n');
        for sc in subcommands
            .iter()
            .filter(|sc| CommandGroup::for_command(sc.get_name()) == *group)
        {
            let mut usage = sc.get_name().to_string();
            for arg in sc.get_positionals() {
                let id = arg.get_id().as_str();
                let rendered = if arg.is_required_set() {
                    format!(" <{}>", id)
                } else {
                    format!(" [{}]", id)
                };
                usage.push_str(&rendered);
                if matches!(arg.get_num_args(), Some(range) if range.max_values() > 1) {
                    usage.push_str("...");
                }
            }
            if sc.get_all_aliases().next().is_some() {
                let aliases: Vec<&str> = sc.get_all_aliases().collect();
                usage.push_str(&format!(" (or {})", aliases.join(", ")));
            }
            let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
            output.push_str(&format!("  {:<40} {}\n", usage, about));
        }
        output.push('\n');
    }
    output
}
