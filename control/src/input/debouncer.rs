//! Turn the noisy keypad line into discrete presses.

use super::button::Button;
use super::calibration::Thresholds;
use crate::log;

/// How long must a reading stay in one band to count as a press.
pub const DEBOUNCE_PERIOD: u32 = 100;

/// Debouncing state machine of the analog keypad.
///
/// It is expected to be sampled every few milliseconds. Each physical press
/// that stays stable for `DEBOUNCE_PERIOD` yields exactly one event, no
/// matter how long the button is then held.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    thresholds: Thresholds,
    state: State,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    #[default]
    Scanning,
    Confirming {
        candidate: Button,
        armed_at: u32,
    },
    AwaitingRelease,
}

impl Debouncer {
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            state: State::Scanning,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Feed a raw reading taken at `now` milliseconds.
    ///
    /// Returns the debounced button once per press and `Button::None`
    /// otherwise. The clock may wrap around.
    pub fn sample(&mut self, reading: u16, now: u32) -> Button {
        let current = self.thresholds.classify(reading);

        match self.state {
            State::Scanning => {
                if !current.is_none() {
                    self.state = State::Confirming {
                        candidate: current,
                        armed_at: now,
                    };
                }
                Button::None
            }
            State::Confirming {
                candidate,
                armed_at,
            } => {
                if current != candidate {
                    self.state = State::Scanning;
                    Button::None
                } else if now.wrapping_sub(armed_at) >= DEBOUNCE_PERIOD {
                    log::info!("Button pressed: {}", candidate);
                    self.state = State::AwaitingRelease;
                    candidate
                } else {
                    Button::None
                }
            }
            State::AwaitingRelease => {
                if current.is_none() {
                    self.state = State::Scanning;
                }
                Button::None
            }
        }
    }
}
