// Pure rate limiting logic - the caller supplies the clock.
// Leading call fires immediately; calls inside the window collapse into one trailing call.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Run the work now.
    Fire,
    /// Work is deferred until the given instant (call `poll` then).
    Deferred(Instant),
}

#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: false,
        }
    }

    pub fn call(&mut self, now: Instant) -> ThrottleDecision {
        match self.window_end() {
            Some(end) if now < end => {
                self.pending = true;
                ThrottleDecision::Deferred(end)
            }
            _ => {
                self.last_fired = Some(now);
                self.pending = false;
                ThrottleDecision::Fire
            }
        }
    }

    /// Fires the trailing call if one is pending and its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.pending = false;
                self.last_fired = Some(now);
                true
            }
            _ => false,
        }
    }

    /// When the pending trailing call is due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        if self.pending {
            self.window_end()
        } else {
            None
        }
    }

    /// Drop any pending trailing call and forget the last window.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.last_fired = None;
    }

    fn window_end(&self) -> Option<Instant> {
        self.last_fired.map(|t| t + self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(200);

    #[test]
    fn test_first_call_fires() {
        let mut throttle = Throttle::new(INTERVAL);
        assert_eq!(throttle.call(Instant::now()), ThrottleDecision::Fire);
        assert_eq!(throttle.deadline(), None);
    }

    #[test]
    fn test_calls_inside_window_collapse() {
        let start = Instant::now();
        let mut throttle = Throttle::new(INTERVAL);
        throttle.call(start);

        let expected = ThrottleDecision::Deferred(start + INTERVAL);
        assert_eq!(throttle.call(start + Duration::from_millis(50)), expected);
        assert_eq!(throttle.call(start + Duration::from_millis(120)), expected);
        assert_eq!(throttle.deadline(), Some(start + INTERVAL));

        // Not yet due
        assert!(!throttle.poll(start + Duration::from_millis(199)));
        // One trailing call
        assert!(throttle.poll(start + INTERVAL));
        assert!(!throttle.poll(start + INTERVAL + Duration::from_millis(10)));
    }

    #[test]
    fn test_trailing_call_opens_new_window() {
        let start = Instant::now();
        let mut throttle = Throttle::new(INTERVAL);
        throttle.call(start);
        throttle.call(start + Duration::from_millis(10));
        assert!(throttle.poll(start + INTERVAL));

        let next = start + INTERVAL + Duration::from_millis(50);
        assert_eq!(
            throttle.call(next),
            ThrottleDecision::Deferred(start + INTERVAL * 2)
        );
    }

    #[test]
    fn test_call_after_window_fires_again() {
        let start = Instant::now();
        let mut throttle = Throttle::new(INTERVAL);
        throttle.call(start);
        assert_eq!(throttle.call(start + INTERVAL), ThrottleDecision::Fire);
    }

    #[test]
    fn test_poll_without_pending_is_noop() {
        let start = Instant::now();
        let mut throttle = Throttle::new(INTERVAL);
        assert!(!throttle.poll(start));
        throttle.call(start);
        assert!(!throttle.poll(start + INTERVAL * 3));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let start = Instant::now();
        let mut throttle = Throttle::new(INTERVAL);
        throttle.call(start);
        throttle.call(start + Duration::from_millis(10));

        throttle.cancel();

        assert_eq!(throttle.deadline(), None);
        assert!(!throttle.poll(start + INTERVAL));
        // Window forgotten, next call leads again
        assert_eq!(
            throttle.call(start + Duration::from_millis(20)),
            ThrottleDecision::Fire
        );
    }
}
