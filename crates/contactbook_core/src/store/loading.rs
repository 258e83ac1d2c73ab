//! Loading flag with an owned, cancellable timer.
//!
//! # Invariants
//! - At most one timer is armed; arming a new one cancels the previous.
//! - A cancelled timer never clears the flag.
//! - The flag is cleared only by polling past the armed deadline.

use log::debug;
use std::time::{Duration, Instant};

/// Armed loading timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingTimer {
    generation: u64,
    deadline: Instant,
}

impl LoadingTimer {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[derive(Debug, Default)]
pub struct LoadingState {
    is_loading: bool,
    timer: Option<LoadingTimer>,
    generations: u64,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn timer(&self) -> Option<LoadingTimer> {
        self.timer
    }

    /// Sets the flag and arms a timer expiring at `now + delay`.
    ///
    /// Returns whether the flag changed.
    pub fn start(&mut self, now: Instant, delay: Duration) -> bool {
        if let Some(previous) = self.timer.take() {
            debug!(
                "event=loading_timer module=store status=cancelled generation={}",
                previous.generation
            );
        }
        self.generations += 1;
        self.timer = Some(LoadingTimer {
            generation: self.generations,
            deadline: now + delay,
        });

        let changed = !self.is_loading;
        self.is_loading = true;
        changed
    }

    /// Disarms the pending timer, leaving the flag as is.
    pub fn cancel(&mut self) -> bool {
        self.timer.take().is_some()
    }

    /// Fires the armed timer when `now` reached its deadline.
    ///
    /// Returns whether the flag changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.timer {
            Some(timer) if now >= timer.deadline => {
                self.timer = None;
                debug!(
                    "event=loading_timer module=store status=fired generation={}",
                    timer.generation
                );
                let changed = self.is_loading;
                self.is_loading = false;
                changed
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LoadingState;
    use std::time::{Duration, Instant};

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn timer_clears_flag_at_deadline() {
        let t0 = Instant::now();
        let mut state = LoadingState::new();

        assert!(state.start(t0, DELAY));
        assert!(state.is_loading());
        assert!(!state.poll(t0 + Duration::from_millis(999)));
        assert!(state.is_loading());
        assert!(state.poll(t0 + DELAY));
        assert!(!state.is_loading());
        assert!(state.timer().is_none());
    }

    #[test]
    fn restarting_cancels_the_stale_timer() {
        let t0 = Instant::now();
        let mut state = LoadingState::new();
        state.start(t0, DELAY);
        let first = state.timer().unwrap();

        assert!(!state.start(t0 + Duration::from_millis(800), DELAY));
        let second = state.timer().unwrap();
        assert!(second.generation() > first.generation());

        assert!(!state.poll(first.deadline()));
        assert!(state.is_loading());
        assert!(state.poll(second.deadline()));
        assert!(!state.is_loading());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut state = LoadingState::new();
        state.start(t0, DELAY);

        assert!(state.cancel());
        assert!(!state.poll(t0 + DELAY * 10));
        assert!(state.is_loading());
    }
}
