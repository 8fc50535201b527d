//! Identity of keypad buttons.

/// One of the front panel buttons, or none of them.
///
/// All four buttons share a single analog line through a resistor ladder.
/// Because of that, only one of them can be sensed at a time. Pressing two
/// at once yields whichever the ladder resolves to, not a chord.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    #[default]
    None,
    Back,
    Up,
    Down,
    Ok,
}

impl Button {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
