use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cooperative cancellation shared between a caller and running documents.
///
/// Documents check the token before every block, so a running block always
/// finishes before the document stops.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a document stopped before it was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    TimedOut,
}

/// Cancellation and deadline for one document.
#[derive(Debug, Clone, Default)]
pub struct RunLimits {
    pub cancel: CancellationToken,
    pub deadline: Option<Instant>,
}

impl RunLimits {
    /// No deadline and a token nobody else holds.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Limits for a document starting now.
    pub fn starting_now(cancel: CancellationToken, timeout: Option<Duration>) -> Self {
        Self {
            cancel,
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    /// Cancellation wins over an expired deadline.
    pub fn check(&self) -> Option<Interrupt> {
        if self.cancel.is_cancelled() {
            return Some(Interrupt::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Interrupt::TimedOut),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let token = CancellationToken::new();
        let limits = RunLimits::starting_now(token.clone(), None);
        assert_eq!(limits.check(), None);
        token.cancel();
        assert_eq!(limits.check(), Some(Interrupt::Cancelled));
    }

    #[test]
    fn expired_deadlines_interrupt() {
        let limits = RunLimits::starting_now(CancellationToken::new(), Some(Duration::ZERO));
        assert_eq!(limits.check(), Some(Interrupt::TimedOut));
    }
}
