//! Interactive editing over a line-based command stream.
//!
//! Each `set` is one keystroke in the current editing session; `commit`
//! ends the session the way leaving an input field would. The location
//! printed after every change is what a user would share.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;
use urlfilter::{Edit, FilterView, MemoryHistory, Navigator};

use crate::dataset::Record;
use crate::render::Table;

pub const HELP: &str = "\
commands:
  set <key> [value]    edit one criterion (empty value clears it)
  type <key> <value>   edit one character at a time, as typing would
                       (the value is everything after one space past the key,
                       spaces included)
  clear <key>          clear one criterion
  clear-all            clear every criterion
  commit               end the current editing session
  back | forward       navigate history
  show                 print the table
  url                  print the current location
  history              print the history entries
  keys                 list criterion keys
  help                 this text
  quit                 exit";

/// One session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: String },
    Type { key: String, value: String },
    Clear { key: String },
    ClearAll,
    Commit,
    Back,
    Forward,
    Show,
    Url,
    History,
    Keys,
    Help,
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start().trim_end_matches(['\r', '\n']);
        let (word, rest) = split_word(line);

        let key_and_value = |command: &'static str| {
            let (key, value) = split_word(rest.trim_start());
            if key.is_empty() {
                return Err(CommandError::MissingArgument {
                    command,
                    argument: "a key",
                });
            }
            Ok((key.to_string(), value.to_string()))
        };

        match word {
            "set" => {
                let (key, value) = key_and_value("set")?;
                Ok(Command::Set { key, value })
            }
            "type" => {
                let (key, value) = key_and_value("type")?;
                if value.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "type",
                        argument: "a value",
                    });
                }
                Ok(Command::Type { key, value })
            }
            "clear" => {
                let (key, _) = key_and_value("clear")?;
                Ok(Command::Clear { key })
            }
            "clear-all" => Ok(Command::ClearAll),
            "commit" => Ok(Command::Commit),
            "back" => Ok(Command::Back),
            "forward" => Ok(Command::Forward),
            "show" => Ok(Command::Show),
            "url" => Ok(Command::Url),
            "history" => Ok(Command::History),
            "keys" => Ok(Command::Keys),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Splits off the first word. The rest starts after exactly one separator.
fn split_word(s: &str) -> (&str, &str) {
    s.split_once(char::is_whitespace).unwrap_or((s, ""))
}

/// Formats a query string as a location.
pub fn location(query: &str) -> String {
    if query.is_empty() {
        "(no query)".to_string()
    } else {
        format!("?{query}")
    }
}

/// A command loop driving a mounted view.
pub struct Session<'a, 'd> {
    view: &'a mut FilterView<'d, Record, MemoryHistory>,
    table: &'a Table,
    prompt: bool,
}

impl<'a, 'd> Session<'a, 'd> {
    pub fn new(view: &'a mut FilterView<'d, Record, MemoryHistory>, table: &'a Table) -> Self {
        Session {
            view,
            table,
            prompt: false,
        }
    }

    /// Prints `> ` before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        self.show(out)?;
        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next().transpose()? else {
                break;
            };
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if !self.execute(&command, out)? {
                        break;
                    }
                }
                Err(err) => writeln!(out, "error: {err}")?,
            }
        }
        Ok(())
    }

    /// Runs one command. Returns `false` when the session should end.
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> io::Result<bool> {
        debug!(?command, "session command");
        match command {
            Command::Set { key, value } => {
                if self.check_key(key, out)? {
                    let changed = self.view.edit(key, value.as_str());
                    self.report(changed, out)?;
                }
            }
            Command::Type { key, value } => {
                if self.check_key(key, out)? {
                    let mut changed = false;
                    for (end, c) in value.char_indices() {
                        changed |= self.view.edit(key, &value[..end + c.len_utf8()]);
                    }
                    self.report(changed, out)?;
                }
            }
            Command::Clear { key } => {
                if self.check_key(key, out)? {
                    let changed = self.view.edit(key, Edit::Clear);
                    self.report(changed, out)?;
                }
            }
            Command::ClearAll => {
                let changed = self.view.clear_all();
                self.report(changed, out)?;
            }
            Command::Commit => {
                self.view.commit_session();
                writeln!(out, "committed")?;
            }
            Command::Back => {
                if self.view.back() {
                    self.report(true, out)?;
                } else {
                    writeln!(out, "no earlier entry")?;
                }
            }
            Command::Forward => {
                if self.view.forward() {
                    self.report(true, out)?;
                } else {
                    writeln!(out, "no later entry")?;
                }
            }
            Command::Show => self.show(out)?,
            Command::Url => {
                writeln!(out, "{}", location(&self.view.navigator().current_query()))?;
            }
            Command::History => {
                let history = self.view.navigator();
                for (i, entry) in history.entries().iter().enumerate() {
                    let marker = if i == history.cursor() { '>' } else { ' ' };
                    writeln!(out, "{marker} {i:>2}  {}", location(entry))?;
                }
            }
            Command::Keys => {
                for spec in self.view.state().schema().iter() {
                    let kind = if spec.kind.is_numeric() { "min" } else { "text" };
                    writeln!(out, "{:<24} {kind:<5} {}", spec.key, spec.field)?;
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn check_key<W: Write>(&self, key: &str, out: &mut W) -> io::Result<bool> {
        if self.view.state().schema().contains_key(key) {
            Ok(true)
        } else {
            writeln!(out, "error: unknown criterion '{key}' (try 'keys')")?;
            Ok(false)
        }
    }

    fn report<W: Write>(&self, changed: bool, out: &mut W) -> io::Result<()> {
        if !changed {
            return writeln!(out, "unchanged");
        }
        writeln!(
            out,
            "{} of {} rows  {}",
            self.view.row_count(),
            self.view.dataset().len(),
            location(&self.view.navigator().current_query())
        )
    }

    fn show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rows = self.view.rows();
        writeln!(out, "{}", self.table.render(&rows))?;
        writeln!(
            out,
            "{} of {} rows  {}",
            rows.len(),
            self.view.dataset().len(),
            location(&self.view.navigator().current_query())
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use urlfilter::{CriterionSpec, QuerySync, Schema};

    use super::*;
    use crate::render::Column;

    fn records() -> Vec<Record> {
        vec![
            Record::from_pairs([("Region", Some("Tokyo")), ("Sales", Some("500"))]),
            Record::from_pairs([("Region", Some("Osaka")), ("Sales", None)]),
        ]
    }

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new([
                CriterionSpec::text("region", "Region"),
                CriterionSpec::min("minSales", "Sales"),
            ])
            .unwrap(),
        )
    }

    fn table() -> Table {
        Table::new(vec![
            Column::new("Region", "Region", false),
            Column::new("Sales", "Sales", true),
        ])
    }

    fn run_script(data: &[Record], query: &str, script: &str) -> (String, MemoryHistory) {
        let mut view = FilterView::mount(data, QuerySync::new(schema(), MemoryHistory::new(query)));
        let table = table();
        let mut out = Vec::new();
        Session::new(&mut view, &table)
            .run(Cursor::new(script), &mut out)
            .unwrap();
        (String::from_utf8(out).unwrap(), view.unmount())
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            "set region Tokyo West".parse::<Command>(),
            Ok(Command::Set {
                key: "region".into(),
                value: "Tokyo West".into()
            })
        );
        assert_eq!(
            "  set minSales".parse::<Command>(),
            Ok(Command::Set {
                key: "minSales".into(),
                value: String::new()
            })
        );
        assert_eq!("show  ".parse::<Command>(), Ok(Command::Show));
        assert_eq!("clear-all".parse::<Command>(), Ok(Command::ClearAll));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
        assert_eq!(
            "set".parse::<Command>(),
            Err(CommandError::MissingArgument {
                command: "set",
                argument: "a key"
            })
        );
        assert_eq!(
            "type region".parse::<Command>(),
            Err(CommandError::MissingArgument {
                command: "type",
                argument: "a value"
            })
        );
        assert_eq!(
            "jump".parse::<Command>(),
            Err(CommandError::Unknown("jump".into()))
        );
    }

    #[test]
    fn values_keep_their_spaces() {
        assert_eq!(
            "set region  ".parse::<Command>(),
            Ok(Command::Set {
                key: "region".into(),
                value: " ".into()
            })
        );
        assert_eq!(
            "set  region  Tokyo \r".parse::<Command>(),
            Ok(Command::Set {
                key: "region".into(),
                value: " Tokyo ".into()
            })
        );
        assert_eq!(
            "type region  ".parse::<Command>(),
            Ok(Command::Type {
                key: "region".into(),
                value: " ".into()
            })
        );

        let data = records();
        let (out, history) = run_script(&data, "", "set region  \n");
        assert!(out.contains("0 of 2 rows  ?region=+\n"));
        assert_eq!(history.current_query(), "region=+");
    }

    #[test]
    fn edits_report_rows_and_location() {
        let data = records();
        let (out, _) = run_script(&data, "", "set region Tokyo\nset minSales 600\n");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.contains(&"1 of 2 rows  ?region=Tokyo"));
        assert!(lines.contains(&"0 of 2 rows  ?region=Tokyo&minSales=600"));
    }

    #[test]
    fn typing_is_one_history_entry() {
        let data = records();
        let (out, history) = run_script(&data, "", "type minSales 400\ncommit\nset region T\n");
        assert!(out.contains("1 of 2 rows  ?minSales=400"));
        assert_eq!(
            history.entries(),
            ["", "minSales=400", "region=T&minSales=400"]
        );
    }

    #[test]
    fn back_and_forward() {
        let data = records();
        let (out, history) = run_script(
            &data,
            "region=Osaka",
            "set region Tokyo\nback\nback\nforward\n",
        );
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.contains(&"1 of 2 rows  ?region=Osaka"));
        assert!(lines.contains(&"no earlier entry"));
        assert_eq!(history.current_query(), "region=Tokyo");
    }

    #[test]
    fn unknown_keys_and_commands() {
        let data = records();
        let (out, history) = run_script(&data, "", "set nope 1\nfly\nset region\n");
        assert!(out.contains("error: unknown criterion 'nope'"));
        assert!(out.contains("error: unknown command 'fly'"));
        assert!(out.contains("unchanged"));
        assert_eq!(history.entries(), [""]);
    }

    #[test]
    fn quit_stops_reading() {
        let data = records();
        let (_, history) = run_script(&data, "", "quit\nset region Tokyo\n");
        assert_eq!(history.entries(), [""]);
    }

    #[test]
    fn history_listing_marks_cursor() {
        let data = records();
        let (out, _) = run_script(&data, "", "set region Tokyo\nback\nhistory\n");
        assert!(out.contains(">  0  (no query)"));
        assert!(out.contains("   1  ?region=Tokyo"));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let data = records();
        let (out, _) = run_script(&data, "", "# a comment\n\nurl\n");
        assert!(!out.contains("error"));
        assert!(out.ends_with("(no query)\n"));
    }
}
