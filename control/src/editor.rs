//! In-place editing of a single menu node.

use crate::field::{Field, FIRST_POSITION};
use crate::menu::{NodeId, NumericField, Toggle};
use crate::peripherals::Parameters;

/// Open editing of a node.
///
/// For numeric fields, `position` is the cursor offset within the field,
/// see `crate::field` for its layout. Toggles do not use the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditSession {
    node: NodeId,
    position: usize,
    changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Increment,
    Decrement,
}

impl EditSession {
    #[must_use]
    pub fn open(node: NodeId) -> Self {
        Self {
            node,
            position: FIRST_POSITION,
            changed: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether any step changed the edited value.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Move the cursor right, staying on the last digit.
    pub fn advance(&mut self, field: Field) {
        if let Some(next) = field.right_of(self.position) {
            self.position = next;
        }
    }

    /// Move the cursor left. Returns `false` once it leaves the field and the
    /// session should be closed.
    pub fn retreat(&mut self, field: Field) -> bool {
        match field.left_of(self.position) {
            Some(previous) => {
                self.position = previous;
                true
            }
            None => false,
        }
    }

    /// Add or subtract the place value under the cursor, within bounds.
    #[allow(clippy::float_cmp)]
    pub fn step(&mut self, numeric: &NumericField, parameters: &mut impl Parameters, step: Step) {
        let value = parameters.value(numeric.parameter);
        if value.is_nan() {
            return;
        }

        let place = Field::new(numeric.decimals).place_value(self.position);
        let stepped = match step {
            Step::Increment => value + place,
            Step::Decrement => value - place,
        };
        let clamped = stepped.clamp(numeric.min, numeric.max);

        if clamped != value {
            parameters.set_value(numeric.parameter, clamped);
            self.changed = true;
        }
    }

    /// Select the next or previous choice, wrapping around.
    pub fn cycle(&mut self, toggle: &Toggle, parameters: &mut impl Parameters, step: Step) {
        let count = toggle.choices.len();
        if count < 2 {
            return;
        }

        let current = parameters.option(toggle.option) % count;
        let next = match step {
            Step::Increment => (current + 1) % count,
            Step::Decrement => (current + count - 1) % count,
        };
        parameters.set_option(toggle.option, next);
        self.changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::LAST_POSITION;
    use crate::peripherals::{OptionId, ParameterId};
    use crate::testlib::FakeParameters;

    const PERCENT: NumericField = NumericField {
        parameter: ParameterId::Setpoint,
        decimals: 2,
        min: 0.0,
        max: 100.0,
    };

    const MODE: Toggle = Toggle {
        option: OptionId::Mode,
        choices: &["Man", "Auto"],
    };

    fn session_at(position: usize) -> EditSession {
        let mut session = EditSession::open(NodeId(1));
        while session.position() < position {
            session.advance(Field::new(PERCENT.decimals));
        }
        session
    }

    #[test]
    fn session_opens_on_the_leftmost_digit() {
        let session = EditSession::open(NodeId(1));
        assert_eq!(session.position(), 1);
        assert!(!session.changed());
    }

    #[test]
    fn advancing_stops_on_the_last_digit() {
        let mut session = EditSession::open(NodeId(1));
        for _ in 0..10 {
            session.advance(Field::new(2));
        }
        assert_eq!(session.position(), LAST_POSITION);
    }

    #[test]
    fn retreating_past_the_first_digit_requests_close() {
        let field = Field::new(2);
        let mut session = session_at(LAST_POSITION);
        assert!(session.retreat(field));
        assert_eq!(session.position(), 4);
        assert!(session.retreat(field));
        assert_eq!(session.position(), 2);
        assert!(session.retreat(field));
        assert_eq!(session.position(), 1);
        assert!(!session.retreat(field));
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn incrementing_tens_near_maximum_is_clamped() {
        let mut parameters = FakeParameters::default();
        parameters.set_value(ParameterId::Setpoint, 95.0);
        let mut session = session_at(1);

        session.step(&PERCENT, &mut parameters, Step::Increment);

        assert_relative_eq!(parameters.value(ParameterId::Setpoint), 100.0);
        assert!(session.changed());
    }

    #[test]
    fn decrementing_below_minimum_is_clamped() {
        let mut parameters = FakeParameters::default();
        let mut session = session_at(LAST_POSITION);

        session.step(&PERCENT, &mut parameters, Step::Decrement);

        assert_relative_eq!(parameters.value(ParameterId::Setpoint), 0.0);
        assert!(!session.changed());
    }

    #[test]
    fn stepping_uses_place_value_under_cursor() {
        let mut parameters = FakeParameters::default();
        parameters.set_value(ParameterId::Setpoint, 50.0);

        let mut session = session_at(2);
        session.step(&PERCENT, &mut parameters, Step::Increment);
        assert_relative_eq!(parameters.value(ParameterId::Setpoint), 51.0);

        let mut session = session_at(4);
        session.step(&PERCENT, &mut parameters, Step::Decrement);
        assert_relative_eq!(parameters.value(ParameterId::Setpoint), 50.9, epsilon = 0.0001);

        let mut session = session_at(5);
        session.step(&PERCENT, &mut parameters, Step::Increment);
        assert_relative_eq!(parameters.value(ParameterId::Setpoint), 50.91, epsilon = 0.0001);
    }

    #[test]
    fn stepping_not_a_number_leaves_it_untouched() {
        let mut parameters = FakeParameters::default();
        parameters.set_value(ParameterId::Setpoint, f32::NAN);
        let mut session = session_at(1);

        session.step(&PERCENT, &mut parameters, Step::Increment);

        assert!(parameters.value(ParameterId::Setpoint).is_nan());
        assert!(!session.changed());
    }

    #[test]
    fn cycling_toggle_wraps_around_in_both_directions() {
        let mut parameters = FakeParameters::default();
        let mut session = EditSession::open(NodeId(1));

        session.cycle(&MODE, &mut parameters, Step::Increment);
        assert_eq!(parameters.option(OptionId::Mode), 1);
        session.cycle(&MODE, &mut parameters, Step::Increment);
        assert_eq!(parameters.option(OptionId::Mode), 0);
        session.cycle(&MODE, &mut parameters, Step::Decrement);
        assert_eq!(parameters.option(OptionId::Mode), 1);
        assert!(session.changed());
    }
}
