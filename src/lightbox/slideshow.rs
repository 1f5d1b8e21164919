//! Timer-driven auto-advance.
//!
//! Each start bumps a generation counter. A tick carries the generation it
//! was scheduled under and is dropped unless that generation is still the
//! running one, so a tick that races a stop (or a restart) never advances.

use std::time::Duration;

use super::input::Subscription;

/// Interval used when the user input is blank, non-numeric, or too short.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

/// Shortest accepted interval. Timers need a non-zero period, and anything
/// faster would re-decode the main image on every main-loop pass.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Longest accepted interval; larger inputs would overflow `Duration`.
const MAX_INTERVAL_SECS: f64 = 60.0 * 60.0 * 24.0;

/// Parses the interval text box. Positive finite seconds, fractions allowed,
/// at least [`MIN_INTERVAL`].
pub fn parse_interval(input: &str) -> Duration {
    match input.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => {
            let interval = Duration::from_secs_f64(secs.min(MAX_INTERVAL_SECS));
            if interval < MIN_INTERVAL {
                DEFAULT_INTERVAL
            } else {
                interval
            }
        }
        _ => DEFAULT_INTERVAL,
    }
}

/// Source of repeating slideshow ticks.
///
/// Implementations must deliver each firing back to the owning session as
/// `slideshow_tick(generation)` on the thread that owns the session, and stop
/// firing once the returned subscription is released.
pub trait Ticker {
    fn start(&self, interval: Duration, generation: u64) -> Box<dyn Subscription>;
}

struct Running {
    generation: u64,
    interval: Duration,
    timer: Box<dyn Subscription>,
}

/// Outcome of a toggle, for the view to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideshowToggle {
    Started { interval: Duration, generation: u64 },
    Stopped,
}

/// Owns the running timer, if any. Active exactly when a timer handle exists.
#[derive(Default)]
pub struct SlideshowScheduler {
    generation: u64,
    running: Option<Running>,
}

impl SlideshowScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.running.as_ref().map(|r| r.interval)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts with the parsed interval when idle, stops when running.
    pub fn toggle(&mut self, interval_input: &str, ticker: &dyn Ticker) -> SlideshowToggle {
        if self.stop() {
            SlideshowToggle::Stopped
        } else {
            let interval = parse_interval(interval_input);
            let generation = self.start(interval, ticker);
            SlideshowToggle::Started {
                interval,
                generation,
            }
        }
    }

    /// Starts a fresh timer, cancelling any previous one first.
    pub fn start(&mut self, interval: Duration, ticker: &dyn Ticker) -> u64 {
        self.stop();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let timer = ticker.start(interval, generation);
        tracing::debug!(generation, ?interval, "slideshow started");
        self.running = Some(Running {
            generation,
            interval,
            timer,
        });
        generation
    }

    /// Cancels the timer. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.running.take() {
            Some(mut running) => {
                running.timer.release();
                // Invalidate anything already queued under the old generation.
                self.generation = self.generation.wrapping_add(1);
                tracing::debug!(generation = running.generation, "slideshow stopped");
                true
            }
            None => false,
        }
    }

    /// Whether a tick scheduled under `generation` should still advance.
    pub fn accepts(&self, generation: u64) -> bool {
        self.running
            .as_ref()
            .map(|r| r.generation == generation)
            .unwrap_or(false)
    }
}

impl Drop for SlideshowScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
