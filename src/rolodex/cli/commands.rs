//! Startup and the read loop.
//!
//! `run()` blocks SIGINT and SIGTERM, resolves the data directory, loads
//! config, starts logging, opens the API and starts the signal watcher, then
//! reads one command per line until `exit`, `close` or end of input. Command
//! errors are printed and the loop carries on; only startup errors end the
//! process with status 1.

use super::print::{print_error, print_flush_report, print_messages, print_result};
use super::setup::{grouped_help, parse_line, Cli, LineError, ReplCommand};
use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use log::{debug, info};
use rolodex::api::RolodexApi;
use rolodex::commands::{CmdMessage, CmdResult};
use rolodex::config::RolodexConfig;
use rolodex::error::{Result, RolodexError};
use rolodex::logging::init_logging;
use rolodex::shutdown;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "ROLODEX_HOME";
const GREETING: &str = "Welcome to the assistant bot!";
const PROMPT: &str = "Enter a command: ";
const FAREWELL: &str = "Good bye!";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let signals = shutdown::block_signals()?;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let config = RolodexConfig::load(&data_dir)?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    init_logging(level, &config.log_dir(&data_dir))?;

    let api = RolodexApi::open(&data_dir, &config)?;
    signals.watch(api.manager(), |signal, report| {
        println!();
        print_flush_report(&report);
        println!("{}", FAREWELL);
        info!("event=exit reason={}", signal);
        std::process::exit(0);
    })?;

    run_loop(&api, io::stdin().lock(), console::user_attended())
}

fn run_loop(api: &RolodexApi, mut input: impl BufRead, interactive: bool) -> Result<()> {
    if interactive {
        println!("{}", GREETING.bold());
    }

    let mut line = String::new();
    loop {
        if interactive {
            print!("{}", PROMPT);
            io::stdout().flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("event=eof");
            farewell(api);
            return Ok(());
        }

        if handle_line(api, &line) == Flow::Exit {
            return Ok(());
        }
    }
}

fn handle_line(api: &RolodexApi, line: &str) -> Flow {
    let command = match parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Flow::Continue,
        Err(LineError::UnknownCommand(name)) => {
            debug!("event=unknown_command name={}", name);
            print_messages(&[CmdMessage::error("Invalid command.")]);
            return Flow::Continue;
        }
        Err(LineError::Usage(err)) => {
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => print!("{}", err),
                _ => print!("{}", err.to_string().red()),
            }
            return Flow::Continue;
        }
    };

    debug!("event=command command={:?}", command);
    match dispatch(api, command) {
        Ok(flow) => flow,
        Err(err) => {
            debug!("event=command_failed error={}", err);
            print_error(&err);
            Flow::Continue
        }
    }
}

fn dispatch(api: &RolodexApi, command: ReplCommand) -> Result<Flow> {
    let result: CmdResult = match command {
        ReplCommand::Hello => CmdResult::message(CmdMessage::info("How can I help you?")),
        ReplCommand::Add { name, phone } => api.add_contact(&name, phone.as_deref())?,
        ReplCommand::Change {
            name,
            old_phone,
            new_phone,
        } => api.change_phone(&name, &old_phone, &new_phone)?,
        ReplCommand::Phone { name } => api.show_phone(&name)?,
        ReplCommand::RemovePhone { name, phone } => api.remove_phone(&name, &phone)?,
        ReplCommand::All => api.all_contacts()?,
        ReplCommand::Remove { name } => api.delete_contact(&name)?,
        ReplCommand::AddBirthday { name, birthday } => api.add_birthday(&name, &birthday)?,
        ReplCommand::ShowBirthday { name } => api.show_birthday(&name)?,
        ReplCommand::Birthdays => api.birthdays()?,
        ReplCommand::AddEmail { name, email } => api.add_email(&name, &email)?,
        ReplCommand::AddAddress { name, address } => api.add_address(&name, &address.join(" "))?,
        ReplCommand::Search { term } => api.search_contacts(&term)?,
        ReplCommand::AddNote { name, text } => api.add_note(&name, &text.join(" "))?,
        ReplCommand::EditNote { name, text } => api.edit_note(&name, &text.join(" "))?,
        ReplCommand::DeleteNote { name } => api.delete_note(&name)?,
        ReplCommand::FindNote { term } => api.find_notes(&term)?,
        ReplCommand::ShowAllNotes => api.all_notes()?,
        ReplCommand::AddTags { name, tags } => api.add_tags(&name, &tags)?,
        ReplCommand::FindNoteByTag { tag } => api.find_notes_by_tag(&tag)?,
        ReplCommand::SortNotesByTag { tag } => api.sort_notes_by_tag(&tag)?,
        ReplCommand::RemoveTag { name, tag } => api.remove_tag(&name, &tag)?,
        ReplCommand::Save => {
            print_flush_report(&api.save_all());
            return Ok(Flow::Continue);
        }
        ReplCommand::Exit => {
            farewell(api);
            return Ok(Flow::Exit);
        }
        ReplCommand::Help => {
            print!("{}", grouped_help());
            return Ok(Flow::Continue);
        }
    };
    print_result(&result);
    Ok(Flow::Continue)
}

fn farewell(api: &RolodexApi) {
    let report = api.save_all();
    if !report.is_clean() {
        print_flush_report(&report);
    }
    println!("{}", FAREWELL);
    info!("event=exit reason=command");
}

/// `--data-dir`, then `ROLODEX_HOME`, then the platform data directory.
fn resolve_data_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "rolodex", "rolodex")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            RolodexError::Config(format!(
                "could not determine a data directory; pass --data-dir or set {}",
                HOME_ENV
            ))
        })
}
