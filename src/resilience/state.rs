//! Per-invocation attempt state machine.
//!
//! # States
//! - Initial: nothing has run yet
//! - Attempting: the operation is running for attempt `a`
//! - Waiting: attempt `a` failed, sleeping before attempt `a + 1`
//! - Succeeded: the operation resolved (terminal)
//! - Exhausted: the retry budget is spent (terminal)
//!
//! # State Transitions
//! ```text
//! Initial → Attempting{0}: start
//! Attempting{a} → Succeeded{a}: operation resolved
//! Attempting{a} → Waiting{a+1}: operation failed, a < retries
//! Attempting{a} → Exhausted{a}: operation failed, a >= retries
//! Waiting{a} → Attempting{a}: backoff elapsed
//! ```
//!
//! # Design Decisions
//! - No I/O and no clocks here; the caller sleeps and runs the operation
//! - Invalid transitions return `None` and leave the state untouched

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

/// Where a single invocation is in its retry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Initial,
    Attempting { attempt: u32 },
    Waiting { attempt: u32, delay: Duration },
    Succeeded { attempt: u32 },
    Exhausted { attempt: u32 },
}

impl AttemptState {
    /// Whether the invocation has settled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Exhausted { .. })
    }

    /// Zero-based attempt index this state refers to.
    pub fn attempt(&self) -> u32 {
        match *self {
            Self::Initial => 0,
            Self::Attempting { attempt }
            | Self::Waiting { attempt, .. }
            | Self::Succeeded { attempt }
            | Self::Exhausted { attempt } => attempt,
        }
    }
}

/// Drives `AttemptState` for one invocation against a resolved config.
#[derive(Debug, Clone)]
pub struct Attempts<'a> {
    config: &'a RetryConfig,
    state: AttemptState,
}

impl<'a> Attempts<'a> {
    pub fn new(config: &'a RetryConfig) -> Self {
        Self {
            config,
            state: AttemptState::Initial,
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// `Initial → Attempting{0}`.
    pub fn start(&mut self) -> Option<AttemptState> {
        match self.state {
            AttemptState::Initial => self.transition(AttemptState::Attempting { attempt: 0 }),
            _ => None,
        }
    }

    /// The running attempt failed. Moves to `Waiting` with the backoff for the
    /// next attempt, or to `Exhausted` once the budget is spent.
    pub fn failed<R: Rng>(&mut self, rng: &mut R) -> Option<AttemptState> {
        let AttemptState::Attempting { attempt } = self.state else {
            return None;
        };

        if attempt >= self.config.retries {
            return self.transition(AttemptState::Exhausted { attempt });
        }

        let next = attempt + 1;
        let delay = calculate_backoff(self.config, next, rng);
        self.transition(AttemptState::Waiting {
            attempt: next,
            delay,
        })
    }

    /// `Waiting{a} → Attempting{a}`.
    pub fn resume(&mut self) -> Option<AttemptState> {
        match self.state {
            AttemptState::Waiting { attempt, .. } => {
                self.transition(AttemptState::Attempting { attempt })
            }
            _ => None,
        }
    }

    /// `Attempting{a} → Succeeded{a}`.
    pub fn succeeded(&mut self) -> Option<AttemptState> {
        match self.state {
            AttemptState::Attempting { attempt } => {
                self.transition(AttemptState::Succeeded { attempt })
            }
            _ => None,
        }
    }

    fn transition(&mut self, next: AttemptState) -> Option<AttemptState> {
        self.state = next;
        Some(next)
    }
}
