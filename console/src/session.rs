//! Interactive session loop.

use crate::command::{self, Command, ConsoleError, HELP};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use tiered_cache::{MultiLevelCache, PutOutcome};

/// Prompt printed before each command.
pub const PROMPT: &str = "> ";

/// Read commands from `input` until `quit`/`exit` or end of input, writing
/// results to `output`.
///
/// Command errors are reported inline and never end the session; only I/O
/// errors on `input` or `output` do.
pub fn run<R: BufRead, W: Write>(
    cache: &mut MultiLevelCache,
    mut input: R,
    output: &mut W,
) -> io::Result<()> {
    let mut line = String::new();

    loop {
        output.write_all(PROMPT.as_bytes())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "error: {}", e)?;
                continue;
            }
        };

        let quit = command == Command::Quit;
        match execute(cache, command) {
            Ok(text) => writeln!(output, "{}", text)?,
            Err(e) => {
                tracing::debug!(error = %e, "command failed");
                writeln!(output, "error: {}", e)?;
            }
        }

        if quit {
            break;
        }
    }

    Ok(())
}

/// Apply one command to the cache, returning the text to show the operator.
pub fn execute(cache: &mut MultiLevelCache, command: Command) -> Result<String, ConsoleError> {
    match command {
        Command::Add { capacity, policy } => {
            let index = cache.add_level(capacity, policy)?;
            Ok(format!(
                "Added L{} cache ({}, capacity {})",
                index + 1,
                policy,
                capacity
            ))
        }
        Command::Get { key } => Ok(match cache.get(&key) {
            Some(value) => format!("Value: {}", value),
            None => "Value: null".to_string(),
        }),
        Command::Put { key, value } => Ok(match cache.put(key, value)? {
            PutOutcome::Stored => "OK".to_string(),
            PutOutcome::StorageFull(dropped) => {
                format!("OK (all cache storage is full, dropped {})", dropped)
            }
        }),
        Command::Remove { level } => {
            cache.remove_level(level - 1)?;
            Ok(format!("Removed L{} cache", level))
        }
        Command::Evict { level } => Ok(match cache.evict(level - 1)? {
            None => format!("L{} cache is empty", level),
            Some(eviction) => match eviction.outcome {
                PutOutcome::Stored => format!("Evicted {} from L{}", eviction.entry, level),
                PutOutcome::StorageFull(dropped) => format!(
                    "Evicted {} from L{} (all cache storage is full, dropped {})",
                    eviction.entry, level, dropped
                ),
            },
        }),
        Command::Display => Ok(cache.dump().to_string()),
        Command::Stats => Ok(stats()),
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok("Bye".to_string()),
    }
}

/// Render every registered counter and gauge, one per line.
fn stats() -> String {
    let mut output = String::new();

    for metric in metriken::metrics().iter() {
        let name = metric.name();
        if name.is_empty() {
            continue;
        }

        let value = match metric.value() {
            Some(metriken::Value::Counter(v)) => v.to_string(),
            Some(metriken::Value::Gauge(v)) => v.to_string(),
            _ => continue,
        };

        if !output.is_empty() {
            output.push('\n');
        }
        let _ = write!(output, "{:<32} {}", name, value);
    }

    if output.is_empty() {
        output.push_str("no metrics registered");
    }
    output
}
