//! Reentrancy guard — single entry flag over all guarded entry points.
//!
//! Execution is single-threaded, so the only "concurrency" hazard is an
//! untrusted callee (a contract-based signer or an asset recipient)
//! calling back into the engine mid-execution. One flag covers the entire
//! external call tree of one top-level entry point; nested entry into any
//! guarded method fails.

use openswap_types::{OpenswapError, Result};

/// The engine's single reentrancy flag.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard on entry to a guarded method.
    ///
    /// # Errors
    /// Returns [`OpenswapError::ReentrancyFail`] when a guarded call is
    /// already in flight.
    pub fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Err(OpenswapError::ReentrancyFail);
        }
        self.entered = true;
        Ok(())
    }

    /// Release the guard when the outermost guarded call returns,
    /// whether it succeeded or failed.
    pub fn exit(&mut self) {
        self.entered = false;
    }

    /// Whether a guarded call is currently in flight.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.entered
    }
}
