//! Per-session portrait generation quota.
//!
//! Caps AI portrait generations per server session. Scene composites are
//! not quota-limited.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::CoreError;

/// Default portrait generations allowed per session.
pub const DEFAULT_PORTRAIT_LIMIT: u32 = 5;

/// Counter for portrait generations in the current session.
#[derive(Debug)]
pub struct SessionQuota {
    limit: u32,
    used: AtomicU32,
}

impl SessionQuota {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            used: AtomicU32::new(0),
        }
    }

    /// Consume one generation. Returns the remaining count on success.
    pub fn try_acquire(&self) -> Result<u32, CoreError> {
        let mut current = self.used.load(Ordering::Relaxed);
        loop {
            if current >= self.limit {
                return Err(CoreError::QuotaExceeded(format!(
                    "Portrait generation limit reached for this session ({} of {})",
                    current, self.limit
                )));
            }
            match self.used.compare_exchange(
                current,
                current + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(self.limit - current - 1),
                Err(observed) => current = observed,
            }
        }
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used.load(Ordering::Relaxed))
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for SessionQuota {
    fn default() -> Self {
        Self::new(DEFAULT_PORTRAIT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_counts_down_remaining() {
        let quota = SessionQuota::new(2);
        assert_eq!(quota.try_acquire().unwrap(), 1);
        assert_eq!(quota.try_acquire().unwrap(), 0);
        assert!(quota.try_acquire().is_err());
    }

    #[test]
    fn remaining_never_underflows() {
        let quota = SessionQuota::new(1);
        let _ = quota.try_acquire();
        let _ = quota.try_acquire();
        assert_eq!(quota.remaining(), 0);
    }

    #[test]
    fn zero_limit_rejects_immediately() {
        let quota = SessionQuota::new(0);
        assert!(quota.try_acquire().is_err());
    }
}
