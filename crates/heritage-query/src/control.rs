//! Deadline and cancellation for long scans

use heritage_core::error::{HeritageError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Records scanned between two control checks
pub const CHECK_INTERVAL: usize = 256;

/// Shared flag a caller flips to abandon running queries
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Limits applied to a single query
#[derive(Debug, Clone, Default)]
pub struct QueryControl {
    deadline: Option<Instant>,
    cancel: Option<CancelFlag>,
}

impl QueryControl {
    /// No deadline, not cancellable
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::default().deadline(Instant::now() + timeout)
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Fail if the query was cancelled or ran past its deadline
    pub fn check(&self, scanned: usize) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            return Err(HeritageError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(HeritageError::DeadlineExceeded { scanned });
        }
        Ok(())
    }

    pub(crate) fn scan(&self) -> Result<ScanGuard<'_>> {
        self.check(0)?;
        Ok(ScanGuard { control: self, scanned: 0 })
    }
}

/// Counts scanned records and consults the control periodically
pub(crate) struct ScanGuard<'a> {
    control: &'a QueryControl,
    scanned: usize,
}

impl ScanGuard<'_> {
    pub(crate) fn tick(&mut self) -> Result<()> {
        self.scanned += 1;
        if self.scanned % CHECK_INTERVAL == 0 {
            self.control.check(self.scanned)?;
        }
        Ok(())
    }
}
