//! Player input gating
//!
//! Presentations and the feedback window after a correct guess each hold a
//! token while they run. Input is enabled only when no tokens are held, so
//! overlapping operations cannot re-enable input early.

use std::collections::HashSet;
use uuid::Uuid;

/// Proof that an operation disabled input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisableToken(Uuid);

#[derive(Debug, Clone, Default)]
pub struct InputGate {
    tokens: HashSet<DisableToken>,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables input until the returned token is released
    pub fn acquire(&mut self) -> DisableToken {
        let token = DisableToken(Uuid::new_v4());
        self.tokens.insert(token);
        token
    }

    /// Releases a token. Returns false if it was already released.
    pub fn release(&mut self, token: DisableToken) -> bool {
        self.tokens.remove(&token)
    }

    pub fn is_enabled(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn outstanding(&self) -> usize {
        self.tokens.len()
    }
}
