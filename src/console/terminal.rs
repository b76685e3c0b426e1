//! crossterm-backed console
//!
//! The terminal stays in raw mode for the lifetime of the console so the
//! kernel never echoes keys on its own; all echo and masking happens here.

use super::{Console, Key};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Stdout, Write};

/// Console on the process's controlling terminal
pub struct TerminalConsole {
    stdout: Stdout,
}

impl TerminalConsole {
    /// Take over the terminal. Raw mode is left again on drop.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        tracing::debug!("Terminal switched to raw mode");
        Ok(Self {
            stdout: io::stdout(),
        })
    }

    fn next_key(&mut self) -> io::Result<Key> {
        loop {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                return map_key(key);
            }
        }
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Map a crossterm key event. Ctrl+C surfaces as an `Interrupted` error since
/// raw mode swallows the signal.
fn map_key(key: KeyEvent) -> io::Result<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
    }

    // Ctrl and Alt chords are commands, not text. Windows reports AltGr as
    // Ctrl+Alt, so that combination still types its character.
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let chord = ctrl != alt;

    Ok(match key.code {
        KeyCode::Char(_) if chord => Key::Other,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Escape,
        _ => Key::Other,
    })
}

impl Console for TerminalConsole {
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        loop {
            match self.next_key()? {
                Key::Enter => {
                    self.write("\n")?;
                    return Ok(line);
                }
                Key::Backspace => {
                    if line.pop().is_some() {
                        self.write("\u{8} \u{8}")?;
                    }
                }
                Key::Char(c) => {
                    line.push(c);
                    let mut buf = [0u8; 4];
                    self.write(c.encode_utf8(&mut buf))?;
                }
                Key::Escape | Key::Other => {}
            }
        }
    }

    fn read_key(&mut self, echo: bool) -> io::Result<Key> {
        let key = self.next_key()?;
        if echo {
            if let Key::Char(c) = key {
                let mut buf = [0u8; 4];
                self.write(c.encode_utf8(&mut buf))?;
            }
        }
        Ok(key)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        // Raw mode does not translate newlines
        let text = text.replace('\n', "\r\n");
        self.stdout.write_all(text.as_bytes())?;
        self.stdout.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))
    }
}

/// Writer that expands bare `\n` to `\r\n`, for output that shares the
/// terminal with a [`TerminalConsole`] in raw mode (log lines on stderr)
#[derive(Debug)]
pub struct CrlfWriter<W: Write> {
    inner: W,
}

impl<W: Write> CrlfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, &b) in buf.iter().enumerate() {
            if b == b'\n' && (i == 0 || buf[i - 1] != b'\r') {
                self.inner.write_all(&buf[start..i])?;
                self.inner.write_all(b"\r\n")?;
                start = i + 1;
            }
        }
        self.inner.write_all(&buf[start..])?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_writer_expands_bare_newlines() {
        let mut writer = CrlfWriter::new(Vec::new());
        write!(writer, "WARN first\nsecond\r\n\nlast").unwrap();
        writer.write_all(b"\n").unwrap();
        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "WARN first\r\nsecond\r\n\r\nlast\r\n"
        );
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_map_key() {
        assert_eq!(
            map_key(press(KeyCode::Char('a'), KeyModifiers::NONE)).unwrap(),
            Key::Char('a')
        );
        assert_eq!(
            map_key(press(KeyCode::Char('A'), KeyModifiers::SHIFT)).unwrap(),
            Key::Char('A')
        );
        assert_eq!(
            map_key(press(KeyCode::Enter, KeyModifiers::NONE)).unwrap(),
            Key::Enter
        );
        assert_eq!(
            map_key(press(KeyCode::Backspace, KeyModifiers::NONE)).unwrap(),
            Key::Backspace
        );
        assert_eq!(
            map_key(press(KeyCode::Esc, KeyModifiers::NONE)).unwrap(),
            Key::Escape
        );
        assert_eq!(
            map_key(press(KeyCode::F(5), KeyModifiers::NONE)).unwrap(),
            Key::Other
        );
    }

    #[test]
    fn test_control_and_alt_chords_are_not_text() {
        assert_eq!(
            map_key(press(KeyCode::Char('u'), KeyModifiers::CONTROL)).unwrap(),
            Key::Other
        );
        assert_eq!(
            map_key(press(KeyCode::Char('x'), KeyModifiers::ALT)).unwrap(),
            Key::Other
        );
        assert_eq!(
            map_key(press(KeyCode::Char('W'), KeyModifiers::CONTROL | KeyModifiers::SHIFT))
                .unwrap(),
            Key::Other
        );
        // AltGr
        assert_eq!(
            map_key(press(
                KeyCode::Char('@'),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            ))
            .unwrap(),
            Key::Char('@')
        );
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let err = map_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }
}
