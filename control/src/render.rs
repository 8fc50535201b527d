//! Projection of the menu state onto the two row character display.
//!
//! Each row is laid out as follows:
//!
//! ```text
//! column:  0   1   2 ... 7
//!         [m] [i] [ field ]
//! ```
//!
//! Where `m` is the marker of the row, `i` the icon of value rows and the
//! rest the formatted value. Navigation and action rows print their label
//! right after the marker.

use heapless::String;

use crate::editor::EditSession;
use crate::field::{Field, FIELD_WIDTH};
use crate::menu::{Kind, MenuGraph, Node};
use crate::navigation::Cursor;
use crate::peripherals::{Activity, Background, CharacterDisplay, Operation, Parameters};

pub const COLUMNS: usize = 8;
pub const ROWS: usize = 2;

const FIELD_COLUMN: usize = 2;

const ERROR_PERIOD: u32 = 2000;
const ERROR_SHOWN: u32 = 1000;
const TUNING_PERIOD: u32 = 1500;
const TUNING_SHOWN: u32 = 500;
const PROFILE_PERIOD: u32 = 2000;
const PROFILE_LETTER_SHOWN: u32 = 500;
const PROFILE_STEP_SHOWN: u32 = 1000;

const MARKER_IDLE: u8 = b' ';
const MARKER_SELECTED: u8 = b'>';
const MARKER_LOCKED: u8 = b'|';
const MARKER_EDITING: u8 = b'[';

pub type Row = String<COLUMNS>;

/// Content of the display at one moment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub rows: [Row; ROWS],
    /// Column and row of the blinking text cursor, if shown.
    pub cursor: Option<(u8, u8)>,
}

impl Frame {
    pub fn row(&self, index: usize) -> &str {
        self.rows.get(index).map_or("", |row| row.as_str())
    }

    pub fn flush(&self, display: &mut impl CharacterDisplay) {
        for (index, row) in self.rows.iter().enumerate() {
            display.set_cursor(0, index as u8);
            display.write_str(row);
        }
        if let Some((column, row)) = self.cursor {
            display.set_cursor(column, row);
            display.show_cursor();
        } else {
            display.hide_cursor();
        }
    }
}

/// Fixed width line being composed.
struct Line {
    cells: [u8; COLUMNS],
    len: usize,
}

impl Line {
    fn new() -> Self {
        Self {
            cells: [b' '; COLUMNS],
            len: 0,
        }
    }

    fn put(&mut self, byte: u8) {
        if let Some(cell) = self.cells.get_mut(self.len) {
            *cell = if byte.is_ascii() { byte } else { b'?' };
            self.len += 1;
        }
    }

    fn put_str(&mut self, text: &str) {
        text.bytes().for_each(|byte| self.put(byte));
    }

    fn into_row(self) -> Row {
        let mut row = Row::new();
        for cell in self.cells {
            row.push(char::from(cell)).ok();
        }
        row
    }
}

/// Draw the visible window of the current level.
///
/// This holds no state of its own, blinking is decided from `now`.
pub fn draw(
    graph: &MenuGraph,
    cursor: Cursor,
    session: Option<&EditSession>,
    parameters: &impl Parameters,
    background: &impl Background,
    now: u32,
) -> Frame {
    let mut frame = Frame::default();

    for (row, rendered) in frame.rows.iter_mut().enumerate() {
        let index = cursor.topmost + row;
        let Some(node) = graph.item(cursor.level, index) else {
            *rendered = Line::new().into_row();
            continue;
        };

        let highlighted = index == cursor.highlighted;
        let edited = session.filter(|s| highlighted && s.node() == node.id);
        *rendered = draw_row(node, highlighted, edited.is_some(), parameters, background, now);

        if let Some(session) = edited {
            if let Some(column) = text_cursor_column(node, session) {
                frame.cursor = Some((column as u8, row as u8));
            }
        }
    }

    frame
}

fn draw_row(
    node: &Node,
    highlighted: bool,
    editing: bool,
    parameters: &impl Parameters,
    background: &impl Background,
    now: u32,
) -> Row {
    let activity = background.activity();
    let mut line = Line::new();

    line.put(marker(node, highlighted, editing, activity, parameters));

    match node.kind {
        Kind::Navigation => line.put_str(node.label),
        Kind::Action(operation) => line.put_str(action_text(node, operation, background)),
        Kind::Numeric(numeric) => {
            line.put(icon(node));
            draw_value(&mut line, parameters.value(numeric.parameter), numeric.decimals, now);
        }
        Kind::Readout(readout) => {
            line.put(icon(node));
            draw_value(&mut line, parameters.value(readout.parameter), readout.decimals, now);
        }
        Kind::Toggle(toggle) => {
            line.put(icon(node));
            line.put(b' ');
            let choice = toggle
                .choices
                .get(parameters.option(toggle.option))
                .copied()
                .unwrap_or("?");
            line.put_str(choice);
        }
    }

    if let Some(glyph) = status_glyph(node, activity, now) {
        line.cells[0] = glyph;
    }

    line.into_row()
}

fn marker(
    node: &Node,
    highlighted: bool,
    editing: bool,
    activity: Activity,
    parameters: &impl Parameters,
) -> u8 {
    if editing {
        return MARKER_EDITING;
    }
    if !highlighted {
        return MARKER_IDLE;
    }
    match node.kind {
        Kind::Navigation | Kind::Action(_) => MARKER_SELECTED,
        _ if node.is_editable() && !node.is_locked(activity, parameters) => MARKER_SELECTED,
        _ => MARKER_LOCKED,
    }
}

fn icon(node: &Node) -> u8 {
    node.label.bytes().next().unwrap_or(b' ')
}

fn action_text<'a>(node: &'a Node, operation: Operation, background: &'a impl Background) -> &'a str {
    if background.activity().runs(operation) {
        return "Cancel";
    }
    if !node.label.is_empty() {
        return node.label;
    }
    match operation {
        Operation::Autotune => "ATune",
        Operation::Profile => background.profile_name(),
    }
}

fn draw_value(line: &mut Line, value: f32, decimals: u8, now: u32) {
    match Field::new(decimals).format(value) {
        Some(text) => line.put_str(text.as_str()),
        None if now % ERROR_PERIOD < ERROR_SHOWN => line.put_str(" Error"),
        None => (0..FIELD_WIDTH).for_each(|_| line.put(b' ')),
    }
}

fn status_glyph(node: &Node, activity: Activity, now: u32) -> Option<u8> {
    match activity {
        Activity::Tuning if node.belongs_to(Operation::Autotune) => {
            (now % TUNING_PERIOD < TUNING_SHOWN).then_some(b'T')
        }
        Activity::Profile { step } if node.belongs_to(Operation::Profile) => {
            let phase = now % PROFILE_PERIOD;
            if phase < PROFILE_LETTER_SHOWN {
                Some(b'P')
            } else if phase < PROFILE_STEP_SHOWN {
                Some(step_glyph(step))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Single character naming a profile step: `0`-`9`, then `A`, `B`, ...
fn step_glyph(step: u8) -> u8 {
    if step < 10 {
        b'0' + step
    } else {
        b'A' + (step - 10).min(25)
    }
}

fn text_cursor_column(node: &Node, session: &EditSession) -> Option<usize> {
    match node.kind {
        Kind::Numeric(_) => Some(FIELD_COLUMN + session.position()),
        Kind::Toggle(_) => Some(FIELD_COLUMN + 1),
        _ => None,
    }
}

const _: () = assert!(FIELD_COLUMN + FIELD_WIDTH == COLUMNS);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::table::{MODE, SETPOINT};
    use crate::peripherals::{OptionId, ParameterId};
    use crate::testlib::{FakeBackground, FakeDisplay, FakeParameters};

    struct Fixture {
        graph: MenuGraph,
        parameters: FakeParameters,
        background: FakeBackground,
    }

    impl Fixture {
        fn new() -> Self {
            let mut parameters = FakeParameters::default();
            parameters.set_value(ParameterId::Setpoint, 25.0);
            parameters.set_value(ParameterId::Input, 21.37);
            Self {
                graph: MenuGraph::controller().unwrap(),
                parameters,
                background: FakeBackground::default(),
            }
        }

        fn draw(&self, cursor: Cursor, session: Option<&EditSession>, now: u32) -> Frame {
            draw(
                &self.graph,
                cursor,
                session,
                &self.parameters,
                &self.background,
                now,
            )
        }
    }

    fn cursor(level: usize, highlighted: usize, topmost: usize) -> Cursor {
        Cursor {
            level,
            highlighted,
            topmost,
        }
    }

    #[test]
    fn root_level_lists_labels_with_the_highlight_marked() {
        let frame = Fixture::new().draw(Cursor::default(), None, 0);
        assert_eq!(frame.row(0), ">DashBrd");
        assert_eq!(frame.row(1), " Config ");
        assert_eq!(frame.cursor, None);
    }

    #[test]
    fn idle_actions_show_their_names() {
        let frame = Fixture::new().draw(cursor(0, 3, 2), None, 0);
        assert_eq!(frame.row(0), " ATune  ");
        assert_eq!(frame.row(1), ">No Prof");
    }

    #[test]
    fn running_autotune_offers_cancel_and_blinks_its_glyph() {
        let mut fixture = Fixture::new();
        fixture.background.activity = Activity::Tuning;

        assert_eq!(fixture.draw(cursor(0, 2, 2), None, 0).row(0), "TCancel ");
        assert_eq!(fixture.draw(cursor(0, 2, 2), None, 600).row(0), ">Cancel ");
        assert_eq!(fixture.draw(cursor(0, 2, 2), None, 1500).row(0), "TCancel ");
        assert_eq!(fixture.draw(cursor(0, 2, 2), None, 600).row(1), " No Prof");
    }

    #[test]
    fn values_are_printed_behind_their_icons() {
        let frame = Fixture::new().draw(cursor(1, 0, 0), None, 0);
        assert_eq!(frame.row(0), ">S  25.0");
        assert_eq!(frame.row(1), " I  21.4");
    }

    #[test]
    fn highlighted_readout_is_marked_as_locked() {
        let frame = Fixture::new().draw(cursor(1, 1, 0), None, 0);
        assert_eq!(frame.row(0), " S  25.0");
        assert_eq!(frame.row(1), "|I  21.4");
    }

    #[test]
    fn edited_value_shows_bracket_and_text_cursor() {
        let fixture = Fixture::new();
        let mut session = EditSession::open(SETPOINT);

        let frame = fixture.draw(cursor(1, 0, 0), Some(&session), 0);
        assert_eq!(frame.row(0), "[S  25.0");
        assert_eq!(frame.cursor, Some((3, 0)));

        session.advance(Field::new(1));
        session.advance(Field::new(1));
        let frame = fixture.draw(cursor(1, 0, 0), Some(&session), 0);
        assert_eq!(frame.cursor, Some((5, 0)));
    }

    #[test]
    fn setpoint_during_profile_alternates_letter_and_step() {
        let mut fixture = Fixture::new();
        fixture.background.activity = Activity::Profile { step: 3 };

        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 100).row(0), "PS  25.0");
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 700).row(0), "3S  25.0");
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 1500).row(0), "|S  25.0");

        fixture.background.activity = Activity::Profile { step: 12 };
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 2700).row(0), "CS  25.0");
    }

    #[test]
    fn output_outside_manual_mode_is_marked_as_locked() {
        let mut fixture = Fixture::new();
        fixture.parameters.set_option(OptionId::Mode, 1);
        let frame = fixture.draw(cursor(1, 2, 1), None, 0);
        assert_eq!(frame.row(0), " I  21.4");
        assert_eq!(frame.row(1), "|O   0.0");
    }

    #[test]
    fn invalid_value_blinks_an_error() {
        let mut fixture = Fixture::new();
        fixture.parameters.set_value(ParameterId::Setpoint, f32::NAN);
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 0).row(0), ">S Error");
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 999).row(0), ">S Error");
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 1000).row(0), ">S      ");
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 1999).row(0), ">S      ");
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 2000).row(0), ">S Error");
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 3000).row(0), ">S      ");
    }

    #[test]
    fn value_too_large_for_the_field_is_hashed_out() {
        let mut fixture = Fixture::new();
        fixture.parameters.set_value(ParameterId::Setpoint, 123_456.0);
        assert_eq!(fixture.draw(cursor(1, 0, 0), None, 0).row(0), ">S####.#");
    }

    #[test]
    fn toggle_shows_current_choice_and_cursor_on_its_first_letter() {
        let mut fixture = Fixture::new();
        fixture.parameters.set_option(OptionId::Mode, 1);
        let session = EditSession::open(MODE);

        let frame = fixture.draw(cursor(1, 3, 2), Some(&session), 0);

        assert_eq!(frame.row(0), " O   0.0");
        assert_eq!(frame.row(1), "[M Auto ");
        assert_eq!(frame.cursor, Some((3, 1)));
    }

    #[test]
    fn five_letter_choices_fill_the_row() {
        let frame = Fixture::new().draw(cursor(2, 3, 2), None, 0);
        assert_eq!(frame.row(1), ">A Direc");
    }

    #[test]
    fn rows_past_the_end_of_level_are_blank() {
        let frame = Fixture::new().draw(cursor(0, 3, 3), None, 0);
        assert_eq!(frame.row(0), ">No Prof");
        assert_eq!(frame.row(1), "        ");
    }

    #[test]
    fn every_row_spans_the_whole_display() {
        let fixture = Fixture::new();
        for level in 0..3 {
            for topmost in 0..3 {
                let frame = fixture.draw(cursor(level, topmost, topmost), None, 0);
                for row in &frame.rows {
                    assert_eq!(row.len(), COLUMNS);
                }
            }
        }
    }

    #[test]
    fn flush_writes_rows_and_places_cursor() {
        let fixture = Fixture::new();
        let session = EditSession::open(SETPOINT);
        let mut display = FakeDisplay::default();

        fixture
            .draw(cursor(1, 0, 0), Some(&session), 0)
            .flush(&mut display);

        assert_eq!(display.row(0), "[S  25.0");
        assert_eq!(display.row(1), " I  21.4");
        assert!(display.cursor_visible);
        assert_eq!(display.position, (3, 0));

        fixture.draw(cursor(1, 0, 0), None, 0).flush(&mut display);
        assert_eq!(display.row(0), ">S  25.0");
        assert!(!display.cursor_visible);
    }

    #[test]
    fn profile_steps_are_named_by_digits_then_letters() {
        assert_eq!(step_glyph(0), b'0');
        assert_eq!(step_glyph(9), b'9');
        assert_eq!(step_glyph(10), b'A');
        assert_eq!(step_glyph(35), b'Z');
        assert_eq!(step_glyph(200), b'Z');
    }
}
