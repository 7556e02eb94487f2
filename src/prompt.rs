//! Reading the master password without echo.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::debug;

pub const PROMPT: &str = "Password: ";

/// Source of the master password when none was given on the command line.
pub trait SecretSource {
    fn read_secret(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads from the controlling terminal, or one line of stdin when piped.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl SecretSource for TerminalPrompt {
    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            read_hidden(prompt)
        } else {
            debug!("stdin is not a terminal, reading one line");
            read_line(io::stdin().lock())
        }
    }
}

/// Leaves raw mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn read_hidden(prompt: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(prompt.as_bytes())?;
    stderr.flush()?;

    let secret = {
        let _raw = RawModeGuard::enable()?;
        collect_keys(event::read)
    };

    stderr.write_all(b"\r\n")?;
    stderr.flush()?;
    secret
}

/// Accumulates key presses until Enter. Ctrl-C and Ctrl-D abort.
fn collect_keys<F>(mut next: F) -> io::Result<String>
where
    F: FnMut() -> io::Result<Event>,
{
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = next()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char('c' | 'd') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "password entry aborted",
                ));
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}

fn read_line<R: BufRead>(mut input: R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no password on standard input",
        ));
    }
    let end = line.find(['\r', '\n']).unwrap_or(line.len());
    line.truncate(end);
    Ok(line)
}


// end of source
