//! Time control and search limits.
//!
//! Both the fallback alpha-beta search and the MCTS driver poll a shared
//! [`TimeControl`]: the former every few thousand nodes, the latter between
//! whole iterations (an iteration is never abandoned half way).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Limits that decide when an engine should stop searching.
///
/// Depth applies to the fallback search only; MCTS takes its budget from its
/// own configuration. The time limit applies to both.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Maximum fallback search depth in plies
    pub depth: u8,
    /// Maximum time allowed for this move (None = infinite)
    pub move_time: Option<Duration>,
    /// Shared stop flag and clock
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// Depth constraint only.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
            time_control: TimeControl::new(None),
        }
    }

    /// Depth and time constraints.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// Time constraint with unbounded depth.
    pub fn time(move_time: Duration) -> Self {
        Self::depth_and_time(u8::MAX, move_time)
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }

    /// Start the clock. Call when the search begins.
    pub fn start(&self) {
        self.time_control.start();
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

/// Thread-safe stop flag plus deadline.
///
/// Clones share the flag and the clock, so a front-end thread can call
/// [`TimeControl::stop`] on a clone while the search polls its own.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
    started_at: Arc<Mutex<Option<Instant>>>,
    time_limit: Option<Duration>,
    /// Node interval between clock reads in node-based searches.
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            started_at: Arc::new(Mutex::new(None)),
            time_limit,
            check_interval: 1024,
        }
    }

    /// Override how often node-based searches read the clock.
    pub fn with_check_interval(mut self, nodes: u64) -> Self {
        self.check_interval = nodes.max(1);
        self
    }

    /// Start (or restart) the clock and clear the stop flag.
    pub fn start(&self) {
        *self
            .started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    /// Force the search to stop at its next check.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Fast atomic read of the stop flag.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Read the clock and raise the stop flag once the limit has passed.
    ///
    /// Returns true when the search should stop.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        let Some(limit) = self.time_limit else {
            return false;
        };
        if self.started().is_some_and(|start| start.elapsed() >= limit) {
            self.stop();
            return true;
        }
        false
    }

    /// True every `check_interval` nodes.
    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes % self.check_interval == 0
    }

    /// Time since [`TimeControl::start`], zero if never started.
    pub fn elapsed(&self) -> Duration {
        self.started()
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Remaining time, None when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }

    fn started(&self) -> Option<Instant> {
        *self
            .started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
