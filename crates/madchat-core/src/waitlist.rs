//! Support waitlist countdown shown on the help screen.
//!
//! Purely cosmetic and unrelated to session state: a position starts
//! somewhere between 15 and 40 and drops by 1 to 5 at random intervals of
//! 1 to 5 seconds until it reaches zero.

use std::iter::FusedIterator;
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use rand::rngs::ThreadRng;

const START_RANGE: RangeInclusive<u32> = 15..=40;
const STEP_RANGE: RangeInclusive<u32> = 1..=5;
const DELAY_MS_RANGE: RangeInclusive<u64> = 1_000..=5_000;

/// One displayed waitlist position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub position: u32,
    /// How long to show this position before the next one.
    /// Zero on the final tick.
    pub delay: Duration,
}

/// Lazy, finite, strictly decreasing sequence of waitlist positions ending at 0.
///
/// Once exhausted it stays exhausted; build a new `Countdown` to start over.
#[derive(Debug)]
pub struct Countdown<R: Rng = ThreadRng> {
    rng: R,
    next_position: Option<u32>,
}

impl Countdown<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for Countdown<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Countdown<R> {
    pub fn with_rng(mut rng: R) -> Self {
        let start = rng.gen_range(START_RANGE);
        Self {
            rng,
            next_position: Some(start),
        }
    }
}

impl<R: Rng> Iterator for Countdown<R> {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        let position = self.next_position?;
        if position == 0 {
            self.next_position = None;
            return Some(Tick {
                position,
                delay: Duration::ZERO,
            });
        }

        let step = self.rng.gen_range(STEP_RANGE);
        self.next_position = Some(position.saturating_sub(step));
        let delay = Duration::from_millis(self.rng.gen_range(DELAY_MS_RANGE));
        Some(Tick { position, delay })
    }
}

impl<R: Rng> FusedIterator for Countdown<R> {}
