//! Drives an asynchronous zone creation on the system under test to a
//! terminal state.
//!
//! ```text
//!               completed, !withError
//!  Requested ─────────────────────────▶ CompletedOk
//!      │   ╲     completed, withError
//!      │    ╲─────────────────────────▶ CompletedError
//!      │         deadline elapsed
//!      └──────────────────────────────▶ TimedOut
//! ```

use std::cell::Cell;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{Result, ScenarioError};
use crate::records::CreationRequest;
use crate::uut::AdminApi;

/// Status query period used by the reference harness.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Overall bound on a zone creation, measured from submission.
pub const DEFAULT_CREATION_DEADLINE: Duration = Duration::from_secs(7200);

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Elapsed-time source and suspension point for the poller.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Suspend the caller for `period`.
    fn sleep(&self, period: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self { Self { origin: Instant::now() } }
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration { self.origin.elapsed() }

    fn sleep(&self, period: Duration) { std::thread::sleep(period) }
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

/// Scenario-local deadline timer. Disarms itself when dropped, so no exit
/// path leaves it armed.
struct DeadlineTimer<'a> {
    armed: &'a Cell<bool>,
    started: Duration,
    bound: Duration,
}

impl<'a> DeadlineTimer<'a> {
    fn arm(armed: &'a Cell<bool>, started: Duration, bound: Duration) -> Self {
        armed.set(true);
        Self { armed, started, bound }
    }

    #[inline] fn elapsed(&self, now: Duration) -> Duration { now.saturating_sub(self.started) }

    #[inline] fn expired(&self, now: Duration) -> bool { self.elapsed(now) >= self.bound }

    #[inline] fn remaining(&self, now: Duration) -> Duration { self.bound.saturating_sub(self.elapsed(now)) }
}

impl Drop for DeadlineTimer<'_> {
    fn drop(&mut self) {
        self.armed.set(false);
    }
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

/// Lifecycle of one zone creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreationState {
    Idle,
    Requested,
    CompletedOk,
    CompletedError,
    TimedOut,
}

impl CreationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CompletedOk | Self::CompletedError | Self::TimedOut)
    }
}

/// Submits a zone creation and polls its status until completion or deadline.
pub struct CreationPoller<'c> {
    clock: &'c dyn Clock,
    interval: Duration,
    deadline: Duration,
    state: Cell<CreationState>,
    queries: Cell<u32>,
    armed: Cell<bool>,
}

impl<'c> CreationPoller<'c> {
    pub fn new(clock: &'c dyn Clock) -> Self {
        Self::with_bounds(clock, DEFAULT_POLL_INTERVAL, DEFAULT_CREATION_DEADLINE)
    }

    pub fn with_bounds(clock: &'c dyn Clock, interval: Duration, deadline: Duration) -> Self {
        Self {
            clock,
            interval,
            deadline,
            state: Cell::new(CreationState::Idle),
            queries: Cell::new(0),
            armed: Cell::new(false),
        }
    }

    #[inline] pub fn state(&self) -> CreationState { self.state.get() }

    /// Number of status queries issued by the last run.
    #[inline] pub fn queries(&self) -> u32 { self.queries.get() }

    /// Whether the deadline timer is currently armed.
    #[inline] pub fn is_armed(&self) -> bool { self.armed.get() }

    /// Submit `request` and wait for the creation to finish.
    ///
    /// Returns the identifier assigned by the system under test. Fails with
    /// `Protocol` if no identifier is returned, `Assertion` if the creation
    /// completes with an error, and `Timeout` if the deadline elapses first.
    pub fn create_and_wait(&self, admin: &mut dyn AdminApi, request: &CreationRequest) -> Result<String> {
        self.queries.set(0);
        self.state.set(CreationState::Idle);

        let id = match admin.trigger_ppa_creation(request)? {
            Some(id) if !id.is_empty() => id,
            _ => return Err(ScenarioError::Protocol(
                "zone ID received from the system under test as result of zone creation is null".into(),
            )),
        };

        self.state.set(CreationState::Requested);
        info!(%id, cbsds = request.cbsd_ids.len(), pals = request.pal_ids.len(), "zone creation in progress");

        let timer = DeadlineTimer::arm(&self.armed, self.clock.now(), self.deadline);
        loop {
            let status = admin.ppa_creation_status()?;
            self.queries.set(self.queries.get() + 1);

            let now = self.clock.now();
            debug!(?status, elapsed_s = timer.elapsed(now).as_secs(), "zone creation status");

            if status.completed {
                drop(timer);
                if status.with_error {
                    self.state.set(CreationState::CompletedError);
                    warn!(%id, "zone creation completed with error");
                    return Err(ScenarioError::Assertion(
                        "there was an error while creating the zone (boundary creation reported an error)".into(),
                    ));
                }
                self.state.set(CreationState::CompletedOk);
                info!(%id, queries = self.queries(), "zone creation completed");
                return Ok(id);
            }

            if timer.expired(now) {
                let elapsed = timer.elapsed(now);
                drop(timer);
                self.state.set(CreationState::TimedOut);
                warn!(%id, elapsed_s = elapsed.as_secs(), "zone creation status check timed out");
                return Err(ScenarioError::Timeout {
                    operation: "zone creation status check",
                    elapsed,
                    deadline: self.deadline,
                });
            }

            self.clock.sleep(self.interval.min(timer.remaining(now)));
        }
    }
}
