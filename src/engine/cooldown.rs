//! # engine::cooldown
//!
//! Optional debounce for scheduled alerts.  With a zero cooldown every
//! triggered cycle alerts again; otherwise an alert is held back until the
//! window since the last *delivered* alert has passed.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct AlertGate {
    cooldown: Option<Duration>,
    last_alert: Option<Instant>,
}

impl AlertGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown: (!cooldown.is_zero()).then_some(cooldown),
            last_alert: None,
        }
    }

    /// Time left before another alert may go out, or `None` if it may now.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let (cooldown, last) = (self.cooldown?, self.last_alert?);
        let elapsed = now.saturating_duration_since(last);
        (elapsed < cooldown).then(|| cooldown - elapsed)
    }

    pub fn allows(&self, now: Instant) -> bool {
        self.remaining(now).is_none()
    }

    pub fn record(&mut self, now: Instant) {
        self.last_alert = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cooldown_always_allows() {
        let mut gate = AlertGate::new(Duration::ZERO);
        let now = Instant::now();
        gate.record(now);
        assert!(gate.allows(now));
    }

    #[test]
    fn test_cooldown_window() {
        let mut gate = AlertGate::new(Duration::from_secs(600));
        let t0 = Instant::now();
        assert!(gate.allows(t0));

        gate.record(t0);
        assert_eq!(gate.remaining(t0 + Duration::from_secs(100)), Some(Duration::from_secs(500)));
        assert!(!gate.allows(t0 + Duration::from_secs(599)));
        assert!(gate.allows(t0 + Duration::from_secs(600)));
    }
}
