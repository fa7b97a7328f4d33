//! External termination via a shared cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::Termination;
use crate::scope::SearchScope;

/// A cloneable handle for cancelling a running optimization.
///
/// All clones share one flag. Cancellation is sticky.
///
/// # Example
///
/// ```
/// use buildforge_solver::termination::CancellationToken;
///
/// let token = CancellationToken::new();
/// let remote = token.clone();
///
/// remote.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The run stops at its next progress check.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Terminates when a [`CancellationToken`] is cancelled.
#[derive(Debug, Clone)]
pub struct ExternalTermination {
    token: CancellationToken,
}

impl ExternalTermination {
    /// Creates a termination that checks the given token.
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl Termination for ExternalTermination {
    fn is_terminated(&self, _scope: &SearchScope) -> bool {
        self.token.is_cancelled()
    }
}
