//! The line-oriented command language of the terminal front-end.
//!
//! ```text
//! thread <text> [@image]      start a thread
//! reply <id> <text> [@image]  reply to a thread
//! threads | catalog           switch views
//! open <id>                   jump from the catalog to a thread
//! list | help | quit
//! ```

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Thread { text: String, image: Option<PathBuf> },
    Reply { thread_id: String, text: String, image: Option<PathBuf> },
    Threads,
    Catalog,
    Open(String),
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  thread <text> [@image]      start a thread
  reply <id> <text> [@image]  reply to a thread
  threads                     show the thread list
  catalog                     show the catalog
  open <id>                   jump to a thread from the catalog
  list                        list thread ids
  help                        show this text
  quit                        exit";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    match verb {
        "thread" => {
            let (text, image) = split_image(rest);
            Ok(Command::Thread { text, image })
        }
        "reply" => {
            let (thread_id, rest) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            if thread_id.is_empty() {
                return Err("usage: reply <id> <text> [@image]".into());
            }
            let (text, image) = split_image(rest.trim());
            Ok(Command::Reply { thread_id: thread_id.to_string(), text, image })
        }
        "open" if !rest.is_empty() => Ok(Command::Open(rest.to_string())),
        "open" => Err("usage: open <id>".into()),
        "threads" => Ok(Command::Threads),
        "catalog" => Ok(Command::Catalog),
        "list" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

/// A trailing `@path` word names an image file.
fn split_image(rest: &str) -> (String, Option<PathBuf>) {
    match rest.rsplit_once(char::is_whitespace) {
        Some((text, last)) if is_image_token(last) => {
            (text.trim_end().to_string(), Some(PathBuf::from(&last[1..])))
        }
        None if is_image_token(rest) => (String::new(), Some(PathBuf::from(&rest[1..]))),
        _ => (rest.to_string(), None),
    }
}

fn is_image_token(word: &str) -> bool {
    word.len() > 1 && word.starts_with('@')
}
