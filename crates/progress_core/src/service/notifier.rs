//! Single-slot notification emitter with cancellable countdowns.
//!
//! # Responsibility
//! - Hold at most one active notification.
//! - Track the countdown that will clear it.
//!
//! # Invariants
//! - A new emission supersedes the active notification immediately.
//! - Only the countdown issued by the latest emission can clear it; older
//!   countdowns are cancelled and firing them is a no-op.

use crate::clock::{Clock, SystemClock};
use crate::model::notification::{Notification, NOTIFICATION_LIFETIME_MS};
use log::debug;

/// Handle for one scheduled clearing of the active notification.
///
/// Callers that own a real timer schedule `expire(countdown)` for
/// `expires_at_ms`; event loops without timers call `tick()` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    generation: u64,
    expires_at_ms: i64,
}

impl Countdown {
    pub fn expires_at_ms(&self) -> i64 {
        self.expires_at_ms
    }
}

/// Holds the currently visible notification and its countdown.
pub struct NotificationEmitter<C: Clock = SystemClock> {
    clock: C,
    active: Option<(Notification, Countdown)>,
    generation: u64,
}

impl NotificationEmitter<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for NotificationEmitter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> NotificationEmitter<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            active: None,
            generation: 0,
        }
    }

    /// Shows `notification`, replacing any active one, and starts a fresh
    /// countdown. Any earlier countdown is cancelled.
    pub fn emit(&mut self, notification: Notification) -> Countdown {
        self.generation += 1;
        let countdown = Countdown {
            generation: self.generation,
            expires_at_ms: self
                .clock
                .now_epoch_ms()
                .saturating_add(NOTIFICATION_LIFETIME_MS),
        };
        let superseded = self.active.is_some();
        self.active = Some((notification, countdown));
        debug!(
            "event=notification_emit module=notifier status=ok generation={} superseded={}",
            countdown.generation, superseded
        );
        countdown
    }

    /// Fires a scheduled countdown. Returns whether it cleared anything.
    ///
    /// A countdown that has been superseded leaves the newer notification
    /// untouched.
    pub fn expire(&mut self, countdown: Countdown) -> bool {
        if self.pending_countdown() != Some(countdown) {
            debug!(
                "event=notification_expire module=notifier status=stale generation={}",
                countdown.generation
            );
            return false;
        }

        self.active = None;
        debug!(
            "event=notification_expire module=notifier status=ok generation={}",
            countdown.generation
        );
        true
    }

    /// Fires the current countdown if its deadline has passed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_epoch_ms();
        match self.pending_countdown() {
            Some(countdown) if now >= countdown.expires_at_ms => self.expire(countdown),
            _ => false,
        }
    }

    /// Dismisses the active notification, cancelling its countdown.
    pub fn clear(&mut self) -> Option<Notification> {
        self.active.take().map(|(notification, _)| notification)
    }

    pub fn active(&self) -> Option<&Notification> {
        self.active.as_ref().map(|(notification, _)| notification)
    }

    /// Countdown that currently governs clearing, if any.
    pub fn pending_countdown(&self) -> Option<Countdown> {
        self.active.as_ref().map(|(_, countdown)| *countdown)
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationEmitter;
    use crate::clock::ManualClock;
    use crate::model::notification::Notification;

    fn note(message: &str) -> Notification {
        Notification::new(message, "#0099ff", 0)
    }

    #[test]
    fn countdown_expires_after_lifetime() {
        let clock = ManualClock::new(10_000);
        let mut emitter = NotificationEmitter::with_clock(&clock);
        let countdown = emitter.emit(note("first"));
        assert_eq!(countdown.expires_at_ms(), 13_000);

        clock.advance(2_999);
        assert!(!emitter.tick());
        assert_eq!(emitter.active().map(|n| n.message.as_str()), Some("first"));

        clock.advance(1);
        assert!(emitter.tick());
        assert!(emitter.active().is_none());
    }

    #[test]
    fn stale_countdown_does_not_clear_newer_notification() {
        let clock = ManualClock::new(0);
        let mut emitter = NotificationEmitter::with_clock(&clock);
        let first = emitter.emit(note("first"));
        clock.advance(2_000);
        let second = emitter.emit(note("second"));
        assert_eq!(emitter.active().map(|n| n.message.as_str()), Some("second"));

        clock.advance(1_000);
        assert!(!emitter.expire(first));
        assert!(!emitter.tick());
        assert_eq!(emitter.active().map(|n| n.message.as_str()), Some("second"));

        clock.advance(2_000);
        assert_eq!(emitter.pending_countdown(), Some(second));
        assert!(emitter.tick());
        assert!(emitter.active().is_none());
    }

    #[test]
    fn clear_cancels_pending_countdown() {
        let clock = ManualClock::new(0);
        let mut emitter = NotificationEmitter::with_clock(&clock);
        let countdown = emitter.emit(note("bye"));
        assert_eq!(emitter.clear().map(|n| n.message), Some("bye".to_string()));
        assert!(emitter.pending_countdown().is_none());
        assert!(!emitter.expire(countdown));
    }

    #[test]
    fn reemitting_same_message_restarts_countdown() {
        let clock = ManualClock::new(0);
        let mut emitter = NotificationEmitter::with_clock(&clock);
        let first = emitter.emit(note("same"));
        clock.advance(1_500);
        let second = emitter.emit(note("same"));
        assert_ne!(first, second);
        clock.advance(1_500);
        assert!(!emitter.tick());
        clock.advance(1_500);
        assert!(emitter.tick());
    }
}
