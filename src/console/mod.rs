//! Console module
//!
//! Line and single-key terminal I/O behind a trait so the prompt and the
//! connection loop can be driven by a script in tests.

#[cfg(test)]
pub(crate) mod scripted;
mod terminal;

pub use terminal::{CrlfWriter, TerminalConsole};

use std::io;

/// A single key press, reduced to what the prompts care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Escape,
    /// Arrows, function keys and anything else without a character
    Other,
}

/// Interactive text console
pub trait Console {
    /// Read one line of plain text, without the line terminator
    fn read_line(&mut self) -> io::Result<String>;

    /// Read one key press. With `echo`, a printable key is shown as typed.
    fn read_key(&mut self, echo: bool) -> io::Result<Key>;

    /// Write text as-is. `\n` starts a new line.
    fn write(&mut self, text: &str) -> io::Result<()>;

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    /// Clear the screen and move to the top left corner
    fn clear(&mut self) -> io::Result<()>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_line(&mut self) -> io::Result<String> {
        (**self).read_line()
    }

    fn read_key(&mut self, echo: bool) -> io::Result<Key> {
        (**self).read_key(echo)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }
}
