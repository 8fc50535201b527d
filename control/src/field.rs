//! Fixed width numeric field and the digit cursor moving across it.
//!
//! A field is `FIELD_WIDTH` characters wide. Position 0 is reserved for the
//! sign and for digits overflowing the editable part, it never holds the
//! cursor. With `d` fractional digits, the decimal point sits at position
//! `FIELD_WIDTH - 1 - d`. For two decimals the layout is:
//!
//! ```text
//! position:  0   1   2   3   4   5
//!           [-] [T] [U] [.] [t] [h]
//! ```
//!
//! Where `T` are tens, `U` units, `t` tenths and `h` hundredths. Editing
//! starts on position 1.

#[allow(unused_imports)]
use micromath::F32Ext;

pub const FIELD_WIDTH: usize = 6;

/// Leftmost position the cursor may take.
pub const FIRST_POSITION: usize = 1;

/// Rightmost position, always the smallest place value.
pub const LAST_POSITION: usize = FIELD_WIDTH - 1;

/// More would leave no room for the units digit right of the sign slot.
pub const MAX_DECIMALS: u8 = 3;

const OVERFLOW: u8 = b'#';

/// Layout of a field showing a given number of fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    decimals: u8,
}

/// Characters of a formatted field, always ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldText([u8; FIELD_WIDTH]);

impl FieldText {
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("")
    }

    pub fn overflows(&self) -> bool {
        self.0.contains(&OVERFLOW)
    }
}

impl Field {
    /// Decimals above `MAX_DECIMALS` are capped.
    #[must_use]
    pub const fn new(decimals: u8) -> Self {
        let decimals = if decimals > MAX_DECIMALS {
            MAX_DECIMALS
        } else {
            decimals
        };
        Self { decimals }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn point(&self) -> Option<usize> {
        if self.decimals == 0 {
            None
        } else {
            Some(LAST_POSITION - self.decimals as usize)
        }
    }

    /// Next cursor position to the right, `None` when already on the last.
    pub fn right_of(&self, position: usize) -> Option<usize> {
        let mut next = position + 1;
        if Some(next) == self.point() {
            next += 1;
        }
        (next <= LAST_POSITION).then_some(next)
    }

    /// Next cursor position to the left, `None` when leaving the field.
    pub fn left_of(&self, position: usize) -> Option<usize> {
        let mut previous = position.checked_sub(1)?;
        if Some(previous) == self.point() {
            previous = previous.checked_sub(1)?;
        }
        (previous >= FIRST_POSITION).then_some(previous)
    }

    /// Amount a single step changes the value with the cursor at `position`.
    pub fn place_value(&self, position: usize) -> f32 {
        let digits_to_the_right = (position + 1..FIELD_WIDTH)
            .filter(|p| Some(*p) != self.point())
            .count() as i32;
        let exponent = digits_to_the_right - self.decimals as i32;
        if exponent >= 0 {
            10_u32.pow(exponent as u32) as f32
        } else {
            1.0 / 10_u32.pow((-exponent) as u32) as f32
        }
    }

    /// Render value right-justified, `None` when it is not a number.
    ///
    /// Values that do not fit are rendered as `#` with the decimal point kept.
    pub fn format(&self, value: f32) -> Option<FieldText> {
        if value.is_nan() {
            return None;
        }
        Some(FieldText(
            self.digits(value).unwrap_or_else(|| self.overflowed()),
        ))
    }

    /// Whether the value can be shown without overflowing.
    pub fn fits(&self, value: f32) -> bool {
        !value.is_nan() && self.digits(value).is_some()
    }

    fn digits(&self, value: f32) -> Option<[u8; FIELD_WIDTH]> {
        let scaled = libm::roundf(value * self.scale());
        let magnitude = scaled.abs();
        if !magnitude.is_finite() || magnitude > 999_999.0 {
            return None;
        }

        let mut units = magnitude as u32;
        let mut sign_pending = scaled < 0.0;
        let point = self.point();
        let always_shown = point.map_or(LAST_POSITION, |p| p - 1);

        let mut slots = [b' '; FIELD_WIDTH];
        for position in (0..FIELD_WIDTH).rev() {
            if Some(position) == point {
                slots[position] = b'.';
            } else if units != 0 {
                slots[position] = b'0' + (units % 10) as u8;
                units /= 10;
            } else if position >= always_shown {
                slots[position] = b'0';
            } else if sign_pending {
                slots[position] = b'-';
                sign_pending = false;
            }
        }

        if units != 0 || sign_pending {
            None
        } else {
            Some(slots)
        }
    }

    fn overflowed(&self) -> [u8; FIELD_WIDTH] {
        let mut slots = [OVERFLOW; FIELD_WIDTH];
        if let Some(point) = self.point() {
            slots[point] = b'.';
        }
        slots
    }

    fn scale(&self) -> f32 {
        [1.0, 10.0, 100.0, 1000.0][self.decimals as usize]
    }
}
