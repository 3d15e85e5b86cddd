//! Page fade in/out with deferred follow-up actions.
//!
//! Time is supplied by the owner as a monotonic offset, so the transition
//! never reads a clock itself.

use std::time::Duration;

pub const TRANSITION_DURATION: Duration = Duration::from_millis(400);
pub const ENTER_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub struct FadeTransition<T> {
    visible: bool,
    show_at: Option<Duration>,
    pending: Vec<(Duration, T)>,
}

impl<T> Default for FadeTransition<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FadeTransition<T> {
    pub fn new() -> Self {
        Self { visible: false, show_at: None, pending: Vec::new() }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || self.show_at.is_some()
    }

    /// Become visible shortly after `now`.
    pub fn enter(&mut self, now: Duration) {
        self.show_at = Some(now + ENTER_DELAY);
    }

    /// Hide immediately; `then` comes back out of [`poll`](Self::poll) once
    /// the fade has run.
    pub fn exit(&mut self, now: Duration, then: T) {
        self.visible = false;
        self.show_at = None;
        self.pending.push((now + TRANSITION_DURATION, then));
    }

    /// Fire everything due at `now`, in scheduling order.
    pub fn poll(&mut self, now: Duration) -> Vec<T> {
        if let Some(at) = self.show_at {
            if at <= now {
                self.visible = true;
                self.show_at = None;
            }
        }

        let (due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = rest;
        due.into_iter().map(|(_, then)| then).collect()
    }

    /// Drop all timers. Nothing fires afterwards.
    pub fn teardown(&mut self) {
        self.show_at = None;
        self.pending.clear();
    }

    pub fn style(&self) -> String {
        if self.visible {
            format!("opacity:1;transition:opacity {}s ease-in", TRANSITION_DURATION.as_secs_f32())
        } else {
            format!("opacity:0;transition:opacity {}s ease-out", TRANSITION_DURATION.as_secs_f32())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_enter_after_delay() {
        let mut fade: FadeTransition<()> = FadeTransition::new();
        fade.enter(ms(0));
        fade.poll(ms(5));
        assert!(!fade.is_visible());
        fade.poll(ms(10));
        assert!(fade.is_visible());
        assert!(fade.style().starts_with("opacity:1"));
    }

    #[test]
    fn test_exit_fires_after_duration() {
        let mut fade = FadeTransition::new();
        fade.enter(ms(0));
        fade.poll(ms(20));
        fade.exit(ms(100), "go");
        assert!(!fade.is_visible());
        assert!(fade.poll(ms(499)).is_empty());
        assert_eq!(fade.poll(ms(500)), vec!["go"]);
        assert!(fade.poll(ms(900)).is_empty());
    }

    #[test]
    fn test_teardown_cancels() {
        let mut fade = FadeTransition::new();
        fade.exit(ms(0), 1);
        fade.teardown();
        assert!(fade.poll(ms(10_000)).is_empty());
        assert!(!fade.has_pending());
    }
}
