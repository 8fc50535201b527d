//! Mapping of raw keypad readings to buttons.

use super::button::Button;

/// Readings at or above this value mean no button is pressed.
pub const NONE_FLOOR: u16 = 1000;

/// Headroom above the calibrated reading, in percent.
///
/// Covers the spread of ladder resistors, temperature and supply drift.
pub const TOLERANCE_PERCENT: u32 = 110;

/// ADC readings measured on the resistor ladder while each button is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonCalibration {
    pub back: u16,
    pub up: u16,
    pub down: u16,
    pub ok: u16,
}

impl Default for ButtonCalibration {
    fn default() -> Self {
        Self {
            back: 0,
            up: 253,
            down: 454,
            ok: 657,
        }
    }
}

/// Upper bounds of the reading of each button, including tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    ordered: [(u16, Button); 4],
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(ButtonCalibration::default())
    }
}

impl Thresholds {
    #[must_use]
    pub fn new(calibration: ButtonCalibration) -> Self {
        Self {
            ordered: [
                (with_tolerance(calibration.back), Button::Back),
                (with_tolerance(calibration.up), Button::Up),
                (with_tolerance(calibration.down), Button::Down),
                (with_tolerance(calibration.ok), Button::Ok),
            ],
        }
    }

    /// Upper bound of the given button's band, `None` for `Button::None`.
    #[must_use]
    pub fn ceiling(&self, button: Button) -> Option<u16> {
        self.ordered
            .iter()
            .find(|(_, b)| *b == button)
            .map(|(ceiling, _)| *ceiling)
    }

    /// Classify a raw reading without any debouncing.
    ///
    /// Bands are scanned in the order BACK, UP, DOWN, OK and the first one
    /// the reading fits under wins. A reading equal to a ceiling belongs to
    /// that ceiling's button.
    #[must_use]
    pub fn classify(&self, reading: u16) -> Button {
        if reading >= NONE_FLOOR {
            return Button::None;
        }
        self.ordered
            .iter()
            .find(|(ceiling, _)| reading <= *ceiling)
            .map_or(Button::None, |(_, button)| *button)
    }
}

fn with_tolerance(calibrated: u16) -> u16 {
    let ceiling = u32::from(calibrated) * TOLERANCE_PERCENT / 100;
    ceiling.min(u32::from(u16::MAX)) as u16
}
