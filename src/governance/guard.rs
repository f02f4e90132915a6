//! Reentrancy guard for `execute`.
//!
//! A single "currently executing" flag. Entering while the flag is set fails
//! immediately with `ReentrantCall`; nothing waits. The flag is cleared when
//! the returned token drops, so every exit path of the guarded call releases
//! it, including early returns through `?`.

use std::cell::Cell;

use crate::foundation::error::{GovernorError, GovernorResult};

#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard for the lifetime of the returned token.
    pub fn enter(&self) -> GovernorResult<GuardToken<'_>> {
        if self.entered.replace(true) {
            return Err(GovernorError::ReentrantCall);
        }
        Ok(GuardToken { guard: self })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

/// Held while a guarded call runs.
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.entered.set(false);
    }
}
