//! Value animation
//!
//! A property change is either an immediate mutation or a time-interpolated
//! tween. [`Transaction`] decides which: with `disable_actions` set, a `set`
//! jumps straight to the new value; otherwise it tweens there over the
//! transaction duration.

use std::time::Duration;

use tokio::time::Instant;

/// Linear interpolation of a value over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start: Instant,
    pub duration: Duration,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Fraction complete at `now`, clamped to 0.0..=1.0
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        self.from + (self.to - self.from) * self.progress(now)
    }
}

/// How a property mutation is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    /// Suppress implicit animation: the change is instantaneous
    pub disable_actions: bool,
    /// Duration of the implicit animation when not suppressed
    pub duration: Duration,
}

impl Transaction {
    /// Instantaneous change, never interpolated
    pub fn immediate() -> Self {
        Self {
            disable_actions: true,
            duration: Duration::ZERO,
        }
    }

    /// Change animated over `duration`
    pub fn animated(duration: Duration) -> Self {
        Self {
            disable_actions: false,
            duration,
        }
    }
}

/// A scalar property with an optional in-flight tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedValue {
    value: f64,
    tween: Option<Tween>,
}

impl AnimatedValue {
    pub fn new(value: f64) -> Self {
        Self { value, tween: None }
    }

    /// Presented value at `now`
    pub fn value_at(&self, now: Instant) -> f64 {
        match self.tween {
            Some(tween) => tween.value_at(now),
            None => self.value,
        }
    }

    /// Change the value under `txn`
    pub fn set(&mut self, value: f64, txn: Transaction, now: Instant) {
        if txn.disable_actions || txn.duration.is_zero() {
            self.value = value;
            self.tween = None;
        } else {
            self.animate_to(value, txn.duration, now);
        }
    }

    /// Explicitly tween from the presented value to `target`
    pub fn animate_to(&mut self, target: f64, duration: Duration, now: Instant) {
        let from = self.value_at(now);
        self.value = target;
        self.tween = Some(Tween::new(from, target, now, duration));
    }

    /// Freeze at the presented value, dropping any tween
    pub fn freeze(&mut self, now: Instant) {
        self.value = self.value_at(now);
        self.tween = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_midpoint() {
        let start = Instant::now();
        let tween = Tween::new(1.0, 0.0, start, Duration::from_millis(700));
        let mid = tween.value_at(start + Duration::from_millis(350));
        assert!((mid - 0.5).abs() < 1e-9);
        assert_eq!(tween.value_at(start + Duration::from_secs(2)), 0.0);
        assert_eq!(tween.value_at(start), 1.0);
    }

    #[test]
    fn test_zero_duration_tween_is_done() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 1.0, start, Duration::ZERO);
        assert_eq!(tween.progress(start), 1.0);
        assert_eq!(tween.value_at(start), 1.0);
    }

    #[test]
    fn test_immediate_set_skips_tween() {
        let now = Instant::now();
        let mut v = AnimatedValue::new(0.2);
        v.set(1.0, Transaction::immediate(), now);
        assert!(v.tween.is_none());
        assert_eq!(v.value_at(now), 1.0);
    }

    #[test]
    fn test_implicit_set_tweens() {
        let now = Instant::now();
        let mut v = AnimatedValue::new(0.0);
        let duration = Duration::from_millis(250);
        v.set(1.0, Transaction::animated(duration), now);
        assert_eq!(v.value_at(now), 0.0);
        assert_eq!(v.value_at(now + duration), 1.0);
    }

    #[test]
    fn test_animate_from_presented_value() {
        let now = Instant::now();
        let mut v = AnimatedValue::new(1.0);
        v.animate_to(0.0, Duration::from_millis(100), now);
        let later = now + Duration::from_millis(50);
        v.animate_to(1.0, Duration::from_millis(100), later);
        assert!((v.value_at(later) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_freeze() {
        let now = Instant::now();
        let mut v = AnimatedValue::new(1.0);
        v.animate_to(0.0, Duration::from_millis(100), now);
        v.freeze(now + Duration::from_millis(25));
        assert!(v.tween.is_none());
        assert!((v.value_at(now + Duration::from_secs(5)) - 0.75).abs() < 1e-9);
    }
}
