//! Per-instance lifecycle state.
//!
//! ```text
//! Active ──► StopPending ──► Stopped ──► Deinitialized
//!                 │
//!                 └──────► Fatal ◄── (deinit while not Stopped)
//! ```
//!
//! `Deinitialized` and `Fatal` are terminal: nothing moves out of them.
//! The state lives in an atomic cell so the stop task and the deinit hook
//! never race on a plain bool, whatever order the host schedules them in.

use crate::ExtensionError;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of one extension instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LifecycleState {
    /// Running; no stop requested yet.
    Active = 0,
    /// Stop command issued, waiting for its result.
    StopPending = 1,
    /// Stop command succeeded.
    Stopped = 2,
    /// Deinit completed after a successful stop.
    Deinitialized = 3,
    /// Stop failed or deinit came too early.
    Fatal = 4,
}

impl LifecycleState {
    /// Returns `true` for `Deinitialized` and `Fatal`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Deinitialized | Self::Fatal)
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Active,
            1 => Self::StopPending,
            2 => Self::Stopped,
            3 => Self::Deinitialized,
            _ => Self::Fatal,
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::StopPending => "stop_pending",
            Self::Stopped => "stopped",
            Self::Deinitialized => "deinitialized",
            Self::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// Atomic holder for a [`LifecycleState`].
///
/// All transitions are compare-and-swap; a losing writer sees the state
/// that beat it.
#[derive(Debug)]
pub struct LifecycleCell {
    raw: AtomicU8,
}

impl LifecycleCell {
    /// Creates a cell in [`LifecycleState::Active`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: AtomicU8::new(LifecycleState::Active as u8),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn get(&self) -> LifecycleState {
        LifecycleState::from_u8(self.raw.load(Ordering::Acquire))
    }

    /// Returns `true` only in [`LifecycleState::Stopped`].
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.get() == LifecycleState::Stopped
    }

    /// Enters `StopPending`.
    ///
    /// A second stop request while one is pending, or after one succeeded,
    /// is accepted and leaves the state unchanged. Returns the previous
    /// state.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::InvalidTransition`] from a terminal state.
    pub fn begin_stop(&self) -> Result<LifecycleState, ExtensionError> {
        self.transition(LifecycleState::StopPending, |from| match from {
            LifecycleState::Active => Some(LifecycleState::StopPending),
            LifecycleState::StopPending | LifecycleState::Stopped => Some(from),
            LifecycleState::Deinitialized | LifecycleState::Fatal => None,
        })
    }

    /// Records a successful stop result.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::InvalidTransition`] if the instance went terminal
    /// (or never began stopping) while the result was in flight.
    pub fn mark_stopped(&self) -> Result<LifecycleState, ExtensionError> {
        self.transition(LifecycleState::Stopped, |from| match from {
            LifecycleState::StopPending | LifecycleState::Stopped => Some(LifecycleState::Stopped),
            _ => None,
        })
    }

    /// Records a failed stop: `StopPending` moves to `Fatal`.
    ///
    /// Any other state is left as it is. A failure that loses the race to
    /// a confirmed stop does not undo it, and terminal states stay put.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::InvalidTransition`] when the instance was not
    /// `StopPending`.
    pub fn fail_stop(&self) -> Result<LifecycleState, ExtensionError> {
        self.transition(LifecycleState::Fatal, |from| match from {
            LifecycleState::StopPending => Some(LifecycleState::Fatal),
            _ => None,
        })
    }

    /// Completes deinit.
    ///
    /// From `Stopped` this moves to `Deinitialized`. `Active` and
    /// `StopPending` go `Fatal`. Terminal states are left unchanged.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::NotStopped`] carrying the state deinit observed.
    pub fn finish_deinit(&self) -> Result<(), ExtensionError> {
        let mut current = self.raw.load(Ordering::Acquire);
        loop {
            let from = LifecycleState::from_u8(current);
            let target = match from {
                LifecycleState::Stopped => LifecycleState::Deinitialized,
                LifecycleState::Active | LifecycleState::StopPending => LifecycleState::Fatal,
                LifecycleState::Deinitialized | LifecycleState::Fatal => {
                    return Err(ExtensionError::NotStopped { state: from });
                }
            };
            match self.raw.compare_exchange_weak(
                current,
                target as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) if target == LifecycleState::Deinitialized => return Ok(()),
                Ok(_) => return Err(ExtensionError::NotStopped { state: from }),
                Err(actual) => current = actual,
            }
        }
    }

    fn transition(
        &self,
        to: LifecycleState,
        next: impl Fn(LifecycleState) -> Option<LifecycleState>,
    ) -> Result<LifecycleState, ExtensionError> {
        let mut current = self.raw.load(Ordering::Acquire);
        loop {
            let from = LifecycleState::from_u8(current);
            let target = next(from).ok_or(ExtensionError::InvalidTransition { from, to })?;
            match self.raw.compare_exchange_weak(
                current,
                target as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(from),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for LifecycleCell {
    fn default() -> Self {
        Self::new()
    }
}
