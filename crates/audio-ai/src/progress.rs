//! Cosmetic progress estimate for an in-flight transcription.
//!
//! The hosted service reports nothing until it answers, so the estimate
//! creeps toward a ceiling on a fixed cadence and jumps to 100 on success.

use cuesmith_common::clock::RateController;

/// Highest value reached before the provider answers.
const IN_FLIGHT_CEILING: u8 = 90;

/// Percentage added on every accepted tick.
const STEP: u8 = 10;

/// Progress estimate in whole percent.
#[derive(Debug, Clone)]
pub struct TranscriptionProgress {
    percent: u8,
    in_flight: bool,
    rate: RateController,
}

impl TranscriptionProgress {
    /// Create an estimator advancing at most once per `interval_ns`.
    pub fn new(interval_ns: u64) -> Self {
        Self {
            percent: 0,
            in_flight: false,
            rate: RateController::with_interval_ns(interval_ns),
        }
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn begin(&mut self) {
        self.percent = 0;
        self.in_flight = true;
        self.rate.reset();
    }

    /// Advance the estimate if the cadence allows. Returns the new value.
    pub fn tick(&mut self, now_ns: u64) -> u8 {
        if self.in_flight && self.rate.should_tick(now_ns) {
            self.percent = (self.percent + STEP).min(IN_FLIGHT_CEILING);
        }
        self.percent
    }

    pub fn complete(&mut self) {
        self.percent = 100;
        self.in_flight = false;
    }

    /// Back to zero after a failed run.
    pub fn reset(&mut self) {
        self.percent = 0;
        self.in_flight = false;
        self.rate.reset();
    }
}

impl Default for TranscriptionProgress {
    fn default() -> Self {
        Self::new(500_000_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_caps_while_in_flight() {
        let mut progress = TranscriptionProgress::new(10);
        assert_eq!(progress.tick(0), 0, "idle estimator does not move");

        progress.begin();
        assert_eq!(progress.tick(0), 10);
        assert_eq!(progress.tick(5), 10);
        for i in 1..=20 {
            progress.tick(i * 10);
        }
        assert_eq!(progress.percent(), 90);

        progress.complete();
        assert_eq!(progress.percent(), 100);
        assert!(!progress.is_in_flight());
    }

    #[test]
    fn test_reset_after_failure() {
        let mut progress = TranscriptionProgress::new(1);
        progress.begin();
        progress.tick(0);
        progress.tick(1);
        progress.reset();
        assert_eq!(progress.percent(), 0);
        assert_eq!(progress.tick(100), 0);
    }
}
