//! Line-oriented console front end: parses commands and drives the controller.

use std::path::PathBuf;

use thiserror::Error;

use crate::api_client::PortfolioApi;
use crate::controller::{AdminController, AuthState, Category};
use crate::errors::AdminError;

pub const HELP: &str = "\
Commands:
  login <username> <password>       start an admin session
  logout                            end the session
  category <name>                   projects | mathematics | algorithms | resume
  set <field> <value...>            edit a text field of the active form
  entry <field> <index> <value...>  edit one entry of a list field
  add <field>                       append an empty entry to a list field
  remove <field> <index>            remove one entry from a list field
  submit                            create a record from the draft
  delete <position>                 ask to delete a listed record
  confirm | cancel                  answer the open delete question
  refresh                           re-fetch all lists
  show                              print the active view
  resume show|delete|url            inspect or remove the stored resume
  resume upload <path>              upload a resume file
  resume download <path>            save the stored resume locally
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: String, password: String },
    Logout,
    Category(Category),
    Set { field: String, value: String },
    Entry { field: String, index: usize, value: String },
    Add { field: String },
    Remove { field: String, index: usize },
    Submit,
    Delete { position: usize },
    Confirm,
    Cancel,
    Refresh,
    Show,
    ResumeShow,
    ResumeUpload(PathBuf),
    ResumeDelete,
    ResumeDownload(PathBuf),
    ResumeUrl,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Splits off the first whitespace-delimited word.
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(i) => (&input[..i], input[i..].trim_start()),
        None => (input, ""),
    }
}

fn required<'a>(word: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if word.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(word)
    }
}

fn index(word: &str, usage: &'static str) -> Result<usize, ParseError> {
    word.parse().map_err(|_| ParseError::Usage(usage))
}

/// Parses one input line. Blank lines yield `Ok(None)`.
/// Trailing values (`set`, `entry`) keep their inner spacing verbatim.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let (verb, rest) = next_word(line.trim_end_matches(['\r', '\n']));
    if verb.is_empty() {
        return Ok(None);
    }

    let cmd = match verb.to_ascii_lowercase().as_str() {
        "login" => {
            const USAGE: &str = "login <username> <password>";
            let (username, rest) = next_word(rest);
            let (password, _) = next_word(rest);
            Command::Login {
                username: required(username, USAGE)?.to_string(),
                password: required(password, USAGE)?.to_string(),
            }
        }
        "logout" => Command::Logout,
        "category" | "tab" => {
            const USAGE: &str = "category <projects|mathematics|algorithms|resume>";
            let (name, _) = next_word(rest);
            let category = required(name, USAGE)?
                .parse()
                .map_err(|_| ParseError::Usage(USAGE))?;
            Command::Category(category)
        }
        "set" => {
            const USAGE: &str = "set <field> <value...>";
            let (field, value) = next_word(rest);
            Command::Set {
                field: required(field, USAGE)?.to_string(),
                value: value.to_string(),
            }
        }
        "entry" => {
            const USAGE: &str = "entry <field> <index> <value...>";
            let (field, rest) = next_word(rest);
            let (idx, value) = next_word(rest);
            Command::Entry {
                field: required(field, USAGE)?.to_string(),
                index: index(idx, USAGE)?,
                value: value.to_string(),
            }
        }
        "add" => {
            const USAGE: &str = "add <field>";
            let (field, _) = next_word(rest);
            Command::Add {
                field: required(field, USAGE)?.to_string(),
            }
        }
        "remove" => {
            const USAGE: &str = "remove <field> <index>";
            let (field, rest) = next_word(rest);
            let (idx, _) = next_word(rest);
            Command::Remove {
                field: required(field, USAGE)?.to_string(),
                index: index(idx, USAGE)?,
            }
        }
        "submit" => Command::Submit,
        "delete" => {
            const USAGE: &str = "delete <position>";
            let (pos, _) = next_word(rest);
            Command::Delete {
                position: index(pos, USAGE)?,
            }
        }
        "confirm" | "yes" => Command::Confirm,
        "cancel" | "no" => Command::Cancel,
        "refresh" => Command::Refresh,
        "show" | "ls" => Command::Show,
        "resume" => {
            const USAGE: &str = "resume show|upload <path>|delete|download <path>|url";
            let (sub, rest) = next_word(rest);
            match sub.to_ascii_lowercase().as_str() {
                "" | "show" => Command::ResumeShow,
                "upload" => Command::ResumeUpload(PathBuf::from(required(rest, USAGE)?)),
                "delete" => Command::ResumeDelete,
                "download" => Command::ResumeDownload(PathBuf::from(required(rest, USAGE)?)),
                "url" => Command::ResumeUrl,
                _ => return Err(ParseError::Usage(USAGE)),
            }
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

/// What the front end should do after a command ran.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub output: Option<String>,
    pub quit: bool,
}

impl Outcome {
    fn print(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            quit: false,
        }
    }
}

/// Runs one command. Views are re-rendered after every state change, the
/// way the page re-renders after a state update.
pub async fn execute<A: PortfolioApi>(
    ctl: &mut AdminController<A>,
    cmd: Command,
) -> Result<Outcome, AdminError> {
    let outcome = match cmd {
        Command::Login { username, password } => {
            ctl.login(&username, &password).await?;
            Outcome::print(ctl.render())
        }
        Command::Logout => {
            let nav = ctl.logout()?;
            Outcome::print(format!("Logged out. Navigating to {}\n\n{}", nav.route(), ctl.render()))
        }
        Command::Category(category) => {
            ctl.select_category(category).await?;
            Outcome::print(ctl.render())
        }
        Command::Set { field, value } => {
            ctl.set_field(&field, &value)?;
            Outcome::print(ctl.render())
        }
        Command::Entry {
            field,
            index,
            value,
        } => {
            ctl.set_entry(&field, index, &value)?;
            Outcome::print(ctl.render())
        }
        Command::Add { field } => {
            ctl.add_entry(&field)?;
            Outcome::print(ctl.render())
        }
        Command::Remove { field, index } => {
            ctl.remove_entry(&field, index)?;
            Outcome::print(ctl.render())
        }
        Command::Submit => {
            ctl.submit().await?;
            Outcome::print(ctl.render())
        }
        Command::Delete { position } => {
            ctl.request_delete(position)?;
            Outcome::print(ctl.render())
        }
        Command::Confirm => {
            ctl.confirm_delete().await?;
            Outcome::print(ctl.render())
        }
        Command::Cancel => {
            ctl.cancel_delete()?;
            Outcome::print(ctl.render())
        }
        Command::Refresh => {
            if ctl.auth_state() == AuthState::LoggedOut {
                return Err(AdminError::NotAuthenticated);
            }
            ctl.refresh().await;
            Outcome::print(ctl.render())
        }
        Command::Show => Outcome::print(ctl.render()),
        Command::ResumeShow => {
            ctl.select_category(Category::Resume).await?;
            Outcome::print(ctl.render())
        }
        Command::ResumeUpload(path) => {
            ctl.upload_resume(&path).await?;
            Outcome::default()
        }
        Command::ResumeDelete => {
            ctl.delete_resume().await?;
            Outcome::default()
        }
        Command::ResumeDownload(path) => {
            let written = ctl.download_resume(&path).await?;
            Outcome::print(format!("Saved {written} bytes to {}", path.display()))
        }
        Command::ResumeUrl => Outcome::print(ctl.resume_download_url()?),
        Command::Help => Outcome::print(HELP),
        Command::Quit => Outcome {
            output: None,
            quit: true,
        },
    };
    Ok(outcome)
}
