//! Hidden password entry on the controlling terminal.

use std::{
    error::Error,
    io::{Stderr, Write},
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

type PromptResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const MAX_ATTEMPTS: usize = 3;

/// Restores cooked mode when dropped, even on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> PromptResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn say(out: &mut Stderr, line: &str) -> PromptResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(line)
    )?;
    out.flush()?;
    Ok(())
}

/// Reads one line without echoing it, printing `*` per character.
fn read_hidden(prompt: &str) -> PromptResult<String> {
    let _raw = RawModeGuard::enter()?;
    let mut out = std::io::stderr();
    say(&mut out, prompt)?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if ctrl => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Backspace if buf.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char(ch) if !ctrl => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => continue,
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    out.flush()?;
    Ok(buf)
}

/// Why a password/confirmation pair was refused.
fn confirmation_problem(password: &str, confirmation: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password must not be empty.")
    } else if password != confirmation {
        Some("Passwords do not match. Try again.")
    } else {
        None
    }
}

/// Asks for a new password and its confirmation, giving up after a few
/// mismatches.
pub fn new_password() -> PromptResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..MAX_ATTEMPTS {
        let password = read_hidden("Password: ")?;
        let confirmation = if password.is_empty() {
            String::new()
        } else {
            read_hidden("Confirm password: ")?
        };

        match confirmation_problem(&password, &confirmation) {
            None => return Ok(password),
            Some(problem) => say(&mut out, &format!("{problem}\r\n"))?,
        }
    }

    Err("too many attempts".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_must_match() {
        assert_eq!(confirmation_problem("secret", "secret"), None);
        assert_eq!(
            confirmation_problem("secret", "secreT"),
            Some("Passwords do not match. Try again.")
        );
        assert_eq!(
            confirmation_problem("", ""),
            Some("Password must not be empty.")
        );
    }
}
