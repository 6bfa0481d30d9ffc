//! Fixed-period production timer.
//!
//! `draw_web()` runs once per animation frame with no guaranteed spacing.
//! `TickDriver` decides, from wall-clock timestamps, whether enough time has
//! passed to run the next simulation tick. The tick itself measures the real
//! elapsed time, so a late fire never loses production.

pub struct TickDriver {
    /// Minimum milliseconds between fires (e.g. 16ms ≈ 60 Hz).
    interval_ms: f64,
    running: bool,
    /// Timestamp of the last fire (or of `start`), None before the first poll.
    last_fire: Option<f64>,
}

impl TickDriver {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            running: false,
            last_fire: None,
        }
    }

    /// Begin firing. The first fire happens one interval after `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.running = true;
        self.last_fire = Some(now_ms);
    }

    /// Stop firing until the next [`start`](Self::start). Called when the
    /// owning view goes away.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_fire = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed the current timestamp (from `performance.now()` or similar).
    /// Returns true when a tick is due.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        let prev = match self.last_fire {
            Some(prev) => prev,
            None => {
                self.last_fire = Some(now_ms);
                return false;
            }
        };
        // A clock that jumped backwards restarts the interval.
        if now_ms < prev {
            self.last_fire = Some(now_ms);
            return false;
        }
        if now_ms - prev >= self.interval_ms {
            self.last_fire = Some(now_ms);
            true
        } else {
            false
        }
    }
}
