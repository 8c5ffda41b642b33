//! Commands understood by the interactive session.

use crate::controller::Action;
use crate::params::{DATE, parameter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(Action),
    Show,
    Url,
    Zones(Option<String>),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  date [VALUE]            set the date/time (e.g. 2024-01-15T10:30); empty clears everything
  set NAME VALUE          select a value for a format parameter (also NAME=VALUE)
  unset NAME              clear a format parameter
  reset                   clear every parameter except the date
  show                    redraw the playground
  url                     print the shareable query string
  zones [FILTER]          list supported time zones
  help                    show this help
  quit                    leave (Ctrl-D works too)";

/// Validate a format parameter name and build the edit for it.
pub fn set_param(name: &str, value: &str) -> Result<Action, String> {
    if name == DATE {
        return Ok(Action::SetDate(value.to_string()));
    }
    if parameter(name).is_none() {
        return Err(format!("unknown parameter: {}", name));
    }
    Ok(Action::SetParam {
        name: name.to_string(),
        value: value.to_string(),
    })
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match word {
        "date" => Ok(Command::Edit(Action::SetDate(rest.to_string()))),
        "set" => {
            let (name, value) = rest
                .split_once('=')
                .or_else(|| rest.split_once(char::is_whitespace))
                .ok_or_else(|| "usage: set NAME VALUE".to_string())?;
            set_param(name.trim(), value.trim()).map(Command::Edit)
        }
        "unset" if !rest.is_empty() => set_param(rest, "").map(Command::Edit),
        "unset" => Err("usage: unset NAME".to_string()),
        "reset" => Ok(Command::Edit(Action::Reset)),
        "show" | "" => Ok(Command::Show),
        "url" => Ok(Command::Url),
        "zones" => Ok(Command::Zones((!rest.is_empty()).then(|| rest.to_string()))),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: {} (try `help`)", other)),
    }
}
