// ABOUTME: Writer back-off driven by SMSC throttling responses
// ABOUTME: Pause doubles per throttle hit up to a cap; any OK response resets it

use std::time::Duration;
use tokio::time::Instant;

/// Throttling state of the writer.
///
/// Each `ESME_RTHROTTLED` or `ESME_RMSGQFUL` response pauses outbound
/// submissions for the current back-off and doubles it, up to the cap.
/// Any OK response resets the back-off to its initial value.
#[derive(Debug)]
pub struct Throttle {
    initial: Duration,
    max: Duration,
    current: Duration,
    paused_until: Option<Instant>,
    hits: u64,
}

impl Throttle {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
            paused_until: None,
            hits: 0,
        }
    }

    /// Register a throttling response: pause for the current back-off,
    /// then double it (capped)
    pub fn hit(&mut self, now: Instant) {
        self.paused_until = Some(now + self.current);
        self.current = (self.current * 2).min(self.max);
        self.hits += 1;
    }

    /// Any successful response clears the pause and resets the back-off
    pub fn reset(&mut self) {
        self.current = self.initial;
        self.paused_until = None;
    }

    pub fn is_paused(&self, now: Instant) -> bool {
        self.paused_until.is_some_and(|until| now < until)
    }

    /// Total throttling responses seen over the session's lifetime
    pub fn hits(&self) -> u64 {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn pause_doubles_per_hit() {
        let mut throttle = Throttle::new(SEC, 30 * SEC);
        let t0 = Instant::now();

        throttle.hit(t0);
        assert!(throttle.is_paused(t0));
        assert!(throttle.is_paused(t0 + Duration::from_millis(999)));
        assert!(!throttle.is_paused(t0 + SEC));

        // second hit pauses for 2s, third for 4s
        throttle.hit(t0);
        assert!(throttle.is_paused(t0 + SEC));
        assert!(!throttle.is_paused(t0 + 2 * SEC));
        throttle.hit(t0);
        assert!(!throttle.is_paused(t0 + 4 * SEC));
        assert_eq!(throttle.hits(), 3);
    }

    #[test]
    fn backoff_caps() {
        let mut throttle = Throttle::new(SEC, 4 * SEC);
        let t0 = Instant::now();
        for _ in 0..10 {
            throttle.hit(t0);
        }
        // pause never exceeds the cap
        throttle.hit(t0);
        assert!(throttle.is_paused(t0 + 3 * SEC));
        assert!(!throttle.is_paused(t0 + 4 * SEC));
    }

    #[test]
    fn ok_response_resets() {
        let mut throttle = Throttle::new(SEC, 30 * SEC);
        let t0 = Instant::now();
        throttle.hit(t0);
        throttle.hit(t0);
        throttle.reset();
        assert!(!throttle.is_paused(t0));

        // back to the initial back-off
        throttle.hit(t0);
        assert!(!throttle.is_paused(t0 + SEC));
    }

    #[test]
    fn unpaused_by_default() {
        let throttle = Throttle::new(SEC, 30 * SEC);
        assert!(!throttle.is_paused(Instant::now()));
    }
}
