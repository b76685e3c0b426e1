//! In-memory password buffer
//!
//! Characters live in a mutable buffer that is zeroed when characters are
//! removed and when the buffer is dropped. There is no `Display`, `Clone` or
//! serde impl, so the secret cannot end up in a log line or a file by accident.

use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Mutable, zero-on-drop password buffer
#[derive(Default)]
pub struct SecurePassword {
    chars: Vec<char>,
}

impl SecurePassword {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one character
    pub fn push(&mut self, c: char) {
        // Grow by hand so the old allocation is wiped instead of being
        // released with the secret still in it.
        if self.chars.len() == self.chars.capacity() {
            let mut grown = Vec::with_capacity((self.chars.capacity() * 2).max(16));
            grown.extend_from_slice(&self.chars);
            self.chars.zeroize();
            self.chars = grown;
        }
        self.chars.push(c);
    }

    /// Remove the last character. Returns false when the buffer was empty.
    pub fn pop(&mut self) -> bool {
        match self.chars.pop() {
            Some(mut c) => {
                c.zeroize();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Copy the secret into a string that is wiped when dropped.
    ///
    /// This is the single handoff point to the session collaborator; keep the
    /// returned value scoped to the request that needs it.
    pub fn expose(&self) -> Zeroizing<String> {
        let mut secret = Zeroizing::new(String::with_capacity(self.chars.len() * 4));
        secret.extend(self.chars.iter());
        secret
    }

    /// Wipe the buffer, leaving it empty
    pub fn clear(&mut self) {
        self.chars.zeroize();
    }
}

impl Drop for SecurePassword {
    fn drop(&mut self) {
        self.chars.zeroize();
    }
}

impl fmt::Debug for SecurePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurePassword(***)")
    }
}
