//! Reacting to debounced buttons: browsing the menu and editing values.

use crate::editor::{EditSession, Step};
use crate::field::Field;
use crate::input::Button;
use crate::log;
use crate::menu::{Kind, MenuGraph, Node};
use crate::peripherals::{Background, Operation, Parameters};
use crate::render::{self, Frame};

/// Position within the menu.
///
/// Two consecutive items of the level are visible, the highlighted one is
/// always among them: `topmost <= highlighted <= topmost + 1`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub level: usize,
    pub highlighted: usize,
    pub topmost: usize,
}

/// The menu state machine.
///
/// Owns the cursor, the edit session if one is open, and tracks which
/// levels hold edits that were not committed yet.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Controller {
    graph: MenuGraph,
    cursor: Cursor,
    session: Option<EditSession>,
    /// One bit per level with uncommitted edits.
    dirty: u32,
}

impl Controller {
    #[must_use]
    pub fn new(graph: MenuGraph) -> Self {
        Self {
            graph,
            cursor: Cursor::default(),
            session: None,
            dirty: 0,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Whether the current level holds edits that were not committed yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty & level_bit(self.cursor.level) != 0
    }

    pub fn highlighted(&self) -> Option<&Node> {
        self.graph.item(self.cursor.level, self.cursor.highlighted)
    }

    pub fn draw(
        &self,
        parameters: &impl Parameters,
        background: &impl Background,
        now: u32,
    ) -> Frame {
        render::draw(
            &self.graph,
            self.cursor,
            self.session.as_ref(),
            parameters,
            background,
            now,
        )
    }

    /// Process a single debounced button.
    pub fn apply(
        &mut self,
        button: Button,
        parameters: &mut impl Parameters,
        background: &mut impl Background,
    ) {
        let Some(node) = self.highlighted().copied() else {
            return;
        };

        match (button, self.session.is_some()) {
            (Button::None, _) => (),
            (Button::Back, true) => self.retreat(&node),
            (Button::Back, false) => self.ascend(&node, parameters),
            (Button::Up, true) => self.edit(&node, parameters, &*background, Step::Increment),
            (Button::Down, true) => self.edit(&node, parameters, &*background, Step::Decrement),
            (Button::Up, false) => self.move_up(),
            (Button::Down, false) => self.move_down(),
            (Button::Ok, true) => self.advance(&node),
            (Button::Ok, false) => self.activate(&node, parameters, background),
        }
    }

    fn level_len(&self) -> usize {
        self.graph
            .level(self.cursor.level)
            .map_or(0, |level| level.items.len())
    }

    fn move_up(&mut self) {
        if self.cursor.highlighted == 0 {
            return;
        }
        self.cursor.highlighted -= 1;
        if self.cursor.highlighted < self.cursor.topmost {
            self.cursor.topmost = self.cursor.highlighted;
        }
    }

    fn move_down(&mut self) {
        if self.cursor.highlighted + 1 >= self.level_len() {
            return;
        }
        self.cursor.highlighted += 1;
        if self.cursor.highlighted > self.cursor.topmost + 1 {
            self.cursor.topmost = self.cursor.highlighted - 1;
        }
    }

    fn show(&mut self, level: usize, index: usize) {
        self.cursor.level = level;
        self.cursor.highlighted = index;
        self.cursor.topmost = index.min(self.level_len().saturating_sub(2));
    }

    fn ascend(&mut self, node: &Node, parameters: &mut impl Parameters) {
        let bit = level_bit(self.cursor.level);
        if self.dirty & bit != 0 {
            if let Some(group) = self.graph.level(self.cursor.level).and_then(|l| l.group) {
                log::info!("Committing group={}", group);
                parameters.commit(group);
            }
            self.dirty &= !bit;
        }

        let parent = self.graph.transition(node.id, Button::Back);
        if parent == node.id {
            return;
        }
        if let Some((level, index)) = self.graph.locate(parent) {
            log::info!("Returning to level={}", level);
            self.show(level, index);
        }
    }

    fn activate(
        &mut self,
        node: &Node,
        parameters: &mut impl Parameters,
        background: &mut impl Background,
    ) {
        match node.kind {
            Kind::Navigation => {
                let child = self.graph.transition(node.id, Button::Ok);
                if let Some((level, index)) = self.graph.locate(child) {
                    log::info!("Entering level={}", level);
                    self.show(level, index);
                }
            }
            Kind::Numeric(numeric) => {
                if node.is_locked(background.activity(), &*parameters) {
                    log::info!("Refusing to edit locked node={}", node.id);
                } else if parameters.value(numeric.parameter).is_nan() {
                    log::info!("Refusing to edit invalid value of node={}", node.id);
                } else {
                    self.open(node);
                }
            }
            Kind::Toggle(_) => {
                if node.is_locked(background.activity(), &*parameters) {
                    log::info!("Refusing to edit locked node={}", node.id);
                } else {
                    self.open(node);
                }
            }
            Kind::Readout(_) => (),
            Kind::Action(operation) => trigger(operation, background),
        }
    }

    fn open(&mut self, node: &Node) {
        log::info!("Editing node={}", node.id);
        self.session = Some(EditSession::open(node.id));
    }

    fn close(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!(
                "Finished editing node={} changed={}",
                session.node(),
                session.changed()
            );
            if session.changed() {
                self.dirty |= level_bit(self.cursor.level);
            }
        }
    }

    fn retreat(&mut self, node: &Node) {
        let keep_open = match (node.kind, self.session.as_mut()) {
            (Kind::Numeric(numeric), Some(session)) => {
                session.retreat(Field::new(numeric.decimals))
            }
            _ => false,
        };
        if !keep_open {
            self.close();
        }
    }

    fn advance(&mut self, node: &Node) {
        if let (Kind::Numeric(numeric), Some(session)) = (node.kind, self.session.as_mut()) {
            session.advance(Field::new(numeric.decimals));
        }
    }

    fn edit(
        &mut self,
        node: &Node,
        parameters: &mut impl Parameters,
        background: &impl Background,
        step: Step,
    ) {
        if node.is_locked(background.activity(), &*parameters) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match node.kind {
            Kind::Numeric(numeric) => session.step(&numeric, parameters, step),
            Kind::Toggle(toggle) => session.cycle(&toggle, parameters, step),
            _ => (),
        }
    }
}

/// Validated tables have at most `MAX_NODES` non-empty levels.
fn level_bit(level: usize) -> u32 {
    1_u32.checked_shl(level as u32).unwrap_or(0)
}

fn trigger(operation: Operation, background: &mut impl Background) {
    let activity = background.activity();
    if activity.runs(operation) {
        log::info!("Stopping operation={}", operation);
        background.stop(operation);
    } else if activity.is_idle() {
        log::info!("Starting operation={}", operation);
        background.start(operation);
    } else {
        log::info!("Refusing to start operation={} while busy", operation);
    }
}
