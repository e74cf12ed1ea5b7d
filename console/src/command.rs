//! Operator command parsing.
//!
//! Commands are whitespace-separated tokens. Each command also answers to
//! the number it has in the interactive menu, so `3 a 1` is `put a 1`.

use tiered_cache::{CacheError, EvictionPolicy};

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a level.
    Add {
        capacity: usize,
        policy: EvictionPolicy,
    },
    /// Look up a key.
    Get { key: String },
    /// Insert a key.
    Put { key: String, value: String },
    /// Remove a level by its 1-based number.
    Remove { level: usize },
    /// Evict one entry from a level by its 1-based number.
    Evict { level: usize },
    /// Print every level.
    Display,
    /// Print metrics.
    Stats,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

/// Errors produced by the console.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    #[error("unknown command '{0}' (type `help` for a list of commands)")]
    UnknownCommand(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: unexpected argument '{argument}'")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },

    #[error("{command}: '{value}' is not a valid {argument}")]
    InvalidNumber {
        command: &'static str,
        argument: &'static str,
        value: String,
    },

    #[error("level numbers start at 1")]
    LevelZero,

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  1 | add <capacity> <policy>   add a level (policy: lru or lfu)
  2 | get <key>                 look up a key
  3 | put <key> <value>         insert a key
  4 | remove <level>            remove a level (1-based)
      evict <level>             evict one entry from a level (1-based)
  5 | display                   print every level
      stats                     print metrics
      help                      print this message
  6 | exit | quit               end the session";

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ConsoleError> {
    let mut tokens = line.split_whitespace();
    let Some(name) = tokens.next() else {
        return Ok(None);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "1" | "add" => "add",
        "2" | "get" => "get",
        "3" | "put" => "put",
        "4" | "remove" => "remove",
        "evict" => "evict",
        "5" | "display" => "display",
        "stats" => "stats",
        "help" | "?" => "help",
        "6" | "exit" | "quit" => "exit",
        _ => return Err(ConsoleError::UnknownCommand(name.to_string())),
    };
    let mut args = Args { command, tokens };

    let parsed = match command {
        "add" => {
            let capacity = args.number("capacity")?;
            let policy = args.next("policy")?.parse()?;
            Command::Add { capacity, policy }
        }
        "get" => Command::Get {
            key: args.next("key")?.to_string(),
        },
        "put" => Command::Put {
            key: args.next("key")?.to_string(),
            value: args.next("value")?.to_string(),
        },
        "remove" => Command::Remove {
            level: args.level()?,
        },
        "evict" => Command::Evict {
            level: args.level()?,
        },
        "display" => Command::Display,
        "stats" => Command::Stats,
        "help" => Command::Help,
        _ => Command::Quit,
    };

    args.finish()?;
    Ok(Some(parsed))
}

/// Remaining tokens of a command line.
struct Args<I> {
    command: &'static str,
    tokens: I,
}

impl<'a, I: Iterator<Item = &'a str>> Args<I> {
    fn next(&mut self, argument: &'static str) -> Result<&'a str, ConsoleError> {
        self.tokens.next().ok_or(ConsoleError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn number(&mut self, argument: &'static str) -> Result<usize, ConsoleError> {
        let value = self.next(argument)?;
        value.parse().map_err(|_| ConsoleError::InvalidNumber {
            command: self.command,
            argument,
            value: value.to_string(),
        })
    }

    fn level(&mut self) -> Result<usize, ConsoleError> {
        match self.number("level")? {
            0 => Err(ConsoleError::LevelZero),
            level => Ok(level),
        }
    }

    fn finish(mut self) -> Result<(), ConsoleError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(extra) => Err(ConsoleError::UnexpectedArgument {
                command: self.command,
                argument: extra.to_string(),
            }),
        }
    }
}
