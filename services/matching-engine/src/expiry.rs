//! Good-for-day expiry task
//!
//! A dedicated worker sleeps until the session end, then sweeps the book
//! for good-for-day orders and cancels them through the standard bulk
//! path. The id sweep and the cancellations take the lock separately, so
//! foreground traffic proceeds in between; an id filled or cancelled in
//! that window is simply ignored by the cancel.

use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime, TimeZone};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use crate::orderbook::Shared;

/// Grace period past the session boundary before the sweep runs
const PRUNE_SLACK: Duration = Duration::from_millis(100);

/// Backoff before re-reading a clock that failed
const CLOCK_RETRY: Duration = Duration::from_secs(1);

/// Failures raised by a session clock
#[derive(Debug, Error)]
pub enum ClockError {
    /// The computed session end does not exist as a local time, e.g.
    /// inside a DST transition
    #[error("session end {0} is not a valid local time")]
    InvalidLocalTime(NaiveDateTime),
}

/// Source of the next session-end deadline
///
/// The engine's only environment dependency: implementations report how
/// long from now the current session ends.
pub trait SessionClock: Send + 'static {
    fn time_until_session_end(&self) -> Result<Duration, ClockError>;
}

/// Wall-clock sessions ending at a fixed local time each day
///
/// Once today's end has passed, the next deadline is tomorrow's.
#[derive(Debug, Clone, Copy)]
pub struct LocalSessionClock {
    session_end: NaiveTime,
}

impl LocalSessionClock {
    /// Sessions end at `session_end` local time
    pub fn new(session_end: NaiveTime) -> Self {
        Self { session_end }
    }
}

impl Default for LocalSessionClock {
    /// The conventional 16:00 cash close
    fn default() -> Self {
        Self::new(NaiveTime::from_hms_opt(16, 0, 0).expect("valid time of day"))
    }
}

impl SessionClock for LocalSessionClock {
    fn time_until_session_end(&self) -> Result<Duration, ClockError> {
        let now = Local::now();

        let mut target = now.date_naive().and_time(self.session_end);
        if now.naive_local() >= target {
            target = target + ChronoDuration::days(1);
        }

        let deadline = Local
            .from_local_datetime(&target)
            .earliest()
            .ok_or(ClockError::InvalidLocalTime(target))?;

        Ok((deadline - now).to_std().unwrap_or(Duration::ZERO))
    }
}

/// Worker body: wait for the session end, sweep, repeat until shutdown
pub(crate) fn prune_good_for_day_orders<C: SessionClock>(shared: Arc<Shared>, clock: C) {
    loop {
        let wait = match clock.time_until_session_end() {
            Ok(wait) => wait + PRUNE_SLACK,
            Err(error) => {
                warn!(%error, "session clock failed, retrying");
                if wait_for_shutdown(&shared, CLOCK_RETRY) {
                    return;
                }
                continue;
            }
        };

        if wait_for_shutdown(&shared, wait) {
            return;
        }

        let order_ids = shared.engine.lock().good_for_day_ids();
        if !order_ids.is_empty() {
            info!(count = order_ids.len(), "expiring good-for-day orders");
        }
        shared.cancel_orders(&order_ids);
    }
}

/// Block until shutdown is signalled or `wait` elapses
///
/// Waits on the book lock's condvar so the notify in
/// [`crate::orderbook::Orderbook::shutdown`] cannot slip between the flag
/// check and the wait. Returns true when shutting down.
fn wait_for_shutdown(shared: &Shared, wait: Duration) -> bool {
    let deadline = Instant::now() + wait;
    let mut engine = shared.engine.lock();
    loop {
        if shared.is_shut_down() {
            return true;
        }
        let result = shared.prune_signal.wait_until(&mut engine, deadline);
        if shared.is_shut_down() {
            return true;
        }
        if result.timed_out() {
            return false;
        }
    }
}
