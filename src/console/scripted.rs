//! Scripted console for tests

use super::{Console, Key};
use std::collections::VecDeque;
use std::io;

#[derive(Debug)]
enum Input {
    Line(String),
    Key(Key),
}

/// Replays queued lines and key presses and records everything written
#[derive(Debug, Default)]
pub(crate) struct ScriptedConsole {
    inputs: VecDeque<Input>,
    pub output: String,
    pub clears: usize,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, text: &str) -> Self {
        self.inputs.push_back(Input::Line(text.to_string()));
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        self.inputs.push_back(Input::Key(key));
        self
    }

    /// Queue each character of `text` as a key press
    pub fn typed(mut self, text: &str) -> Self {
        for c in text.chars() {
            self.inputs.push_back(Input::Key(Key::Char(c)));
        }
        self
    }

    /// Queue a full credential round: org, username, password + Enter,
    /// region key, continue key
    pub fn credentials(self, org: &str, user: &str, password: &str, region: char) -> Self {
        self.line(org)
            .line(user)
            .typed(password)
            .key(Key::Enter)
            .key(Key::Char(region))
            .key(Key::Enter)
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

fn exhausted() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> io::Result<String> {
        match self.inputs.pop_front() {
            Some(Input::Line(line)) => Ok(line),
            Some(other) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("expected a line, script has {:?}", other),
            )),
            None => Err(exhausted()),
        }
    }

    fn read_key(&mut self, echo: bool) -> io::Result<Key> {
        match self.inputs.pop_front() {
            Some(Input::Key(key)) => {
                if echo {
                    if let Key::Char(c) = key {
                        self.output.push(c);
                    }
                }
                Ok(key)
            }
            Some(other) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("expected a key, script has {:?}", other),
            )),
            None => Err(exhausted()),
        }
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }
}
