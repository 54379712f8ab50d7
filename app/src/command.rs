//! Console commands and the actions they send.

use crate::form::{FormError, parse_form};
use crate::types::TodoAction;
use std::str::FromStr;
use thiserror::Error;
use todo_sync_core::todo::{TodoFields, TodoId};
use todo_sync_core::view::{DueBucket, ParseBucketError, Scope};

/// Help text listing every command
pub const HELP: &str = "\
commands:
  list                                   reload from the store
  all | completed                        switch scope
  bucket <month/yy | No Due Date | off>  drill into a due bucket
  add [<title> [| desc [| month/year]]]  open the form (and save right away)
  edit <id>                              open the form for a todo
  save <title> [| desc [| month/year]]   save the open form
  cancel                                 close the form
  done <id> | undo <id>                  set completion
  rm <id>                                delete a todo
  help | quit";

/// Invalid console input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unrecognised command word
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),

    /// A required argument is missing
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// Bucket key did not parse
    #[error(transparent)]
    Bucket(#[from] ParseBucketError),

    /// Form fields were rejected
    #[error(transparent)]
    Form(#[from] FormError),

    /// Due date was not written as month/year
    #[error("due date must be month/year, got {0:?}")]
    DueDate(String),
}

/// One parsed console line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reload
    List,
    /// Switch scope
    Scope(Scope),
    /// Select or clear a bucket
    Bucket(Option<DueBucket>),
    /// Open the empty form, optionally saving `fields` right away
    Add(Option<TodoFields>),
    /// Open the form for a todo
    Edit(TodoId),
    /// Save the open form
    Save(TodoFields),
    /// Close the form
    Cancel,
    /// Set the completion flag
    Complete(TodoId, bool),
    /// Delete a todo
    Remove(TodoId),
    /// Print help
    Help,
    /// Leave
    Quit,
}

impl Command {
    /// Actions to send, in order
    #[must_use]
    pub fn into_actions(self) -> Vec<TodoAction> {
        match self {
            Self::List => vec![TodoAction::Load],
            Self::Scope(scope) => vec![TodoAction::SelectScope { scope }],
            Self::Bucket(bucket) => vec![TodoAction::SelectBucket { bucket }],
            Self::Add(None) => vec![TodoAction::BeginAdd],
            Self::Add(Some(fields)) => vec![TodoAction::BeginAdd, TodoAction::Submit { fields }],
            Self::Edit(id) => vec![TodoAction::StartEdit { id }],
            Self::Save(fields) => vec![TodoAction::Submit { fields }],
            Self::Cancel => vec![TodoAction::DismissModal],
            Self::Complete(id, completed) => vec![TodoAction::ToggleComplete { id, completed }],
            Self::Remove(id) => vec![TodoAction::Remove { id }],
            Self::Help | Self::Quit => Vec::new(),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let id = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(TodoId::new(rest))
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Self::List),
            "all" => Ok(Self::Scope(Scope::All)),
            "completed" => Ok(Self::Scope(Scope::Completed)),
            "bucket" => match rest {
                "" => Err(CommandError::MissingArgument("bucket")),
                "off" => Ok(Self::Bucket(None)),
                key => Ok(Self::Bucket(Some(key.parse()?))),
            },
            "add" if rest.is_empty() => Ok(Self::Add(None)),
            "add" => Ok(Self::Add(Some(parse_fields(rest)?))),
            "save" => Ok(Self::Save(parse_fields(rest)?)),
            "edit" => Ok(Self::Edit(id("edit")?)),
            "cancel" => Ok(Self::Cancel),
            "done" => Ok(Self::Complete(id("done")?, true)),
            "undo" => Ok(Self::Complete(id("undo")?, false)),
            "rm" | "delete" => Ok(Self::Remove(id("rm")?)),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Parse `title [| description [| month/year]]` into form fields
fn parse_fields(text: &str) -> Result<TodoFields, CommandError> {
    let mut parts = text.split('|').map(str::trim);
    let title = parts.next().unwrap_or_default();
    let description = parts.next().unwrap_or_default();

    let (month, year) = match parts.next().filter(|due| !due.is_empty()) {
        Some(due) => due
            .split_once('/')
            .ok_or_else(|| CommandError::DueDate(due.to_string()))?,
        None => ("", ""),
    };

    Ok(parse_form([
        ("title", title),
        ("description", description),
        ("due_month", month),
        ("due_year", year),
    ])?)
}
