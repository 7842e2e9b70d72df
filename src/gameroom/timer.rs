use super::event::Event;
use crate::COUNTDOWN_TICK;
use crate::WARNING_TICK;
use crate::config::TimerMode;
use std::time::Duration;
use tokio::time::Instant;

/// Round clock. Counts down in countdown mode, up otherwise.
/// Reset at every deal and every successful claim.
#[derive(Debug)]
pub struct Timer {
    mode: TimerMode,
    started: Instant,
}

impl Timer {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            started: Instant::now(),
        }
    }
    pub fn mode(&self) -> TimerMode {
        self.mode
    }
    pub fn reset(&mut self) {
        self.started = Instant::now();
    }
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
    /// Time left in countdown mode.
    pub fn remaining(&self) -> Option<Duration> {
        match self.mode {
            TimerMode::Countdown { timeout, .. } => Some(timeout.saturating_sub(self.elapsed())),
            _ => None,
        }
    }
    /// Only a countdown ever expires.
    pub fn expired(&self) -> bool {
        self.remaining().is_some_and(|r| r.is_zero())
    }
    pub fn warn(&self) -> bool {
        match self.mode {
            TimerMode::Countdown { warning, .. } => {
                self.remaining().is_some_and(|r| r <= warning)
            }
            _ => false,
        }
    }
    /// How long until the display next needs refreshing.
    pub fn tick(&self) -> Duration {
        match (self.mode, self.remaining()) {
            (TimerMode::Countdown { warning, .. }, Some(remaining)) if remaining > warning => {
                COUNTDOWN_TICK.min(remaining - warning)
            }
            (TimerMode::Countdown { .. }, Some(remaining)) => WARNING_TICK.min(remaining),
            _ => COUNTDOWN_TICK,
        }
    }
    /// Display update for the current instant, if this mode shows one.
    pub fn event(&self) -> Option<Event> {
        match self.mode {
            TimerMode::Countdown { .. } => Some(Event::Countdown {
                remaining: self.remaining().unwrap_or_default(),
                warn: self.warn(),
            }),
            TimerMode::Elapsed => Some(Event::Elapsed {
                elapsed: self.elapsed(),
            }),
            TimerMode::Silent => None,
        }
    }
}
