//! Per-render context handed to the active scene.

use crossterm::event::KeyEvent;
use ratatui::style::Style;

use super::scene::{Scene, SceneCommand};
use crate::config::EngineConfig;
use crate::error::TableError;
use crate::screen::Screen;
use crate::ui::{
    edit_field,
    flex_table::{FlexTable, FlexTableState},
    markup,
};

/// Everything one render call may touch: the screen, the key that triggered
/// the frame, and a queue of scene-stack changes.
///
/// A frame lives for exactly one `Scene::render` call.  Stack changes are
/// applied by the engine after the scene returns, and the new top scene is
/// drawn before the engine waits for more input.
pub struct Frame<'a> {
    screen: &'a mut dyn Screen,
    config: &'a EngineConfig,
    key: Option<KeyEvent>,
    commands: Vec<SceneCommand>,
}

impl<'a> Frame<'a> {
    /// A frame over `screen`.  Useful for drawing widgets outside the engine.
    pub fn new(screen: &'a mut dyn Screen, config: &'a EngineConfig, key: Option<KeyEvent>) -> Self {
        Self {
            screen,
            config,
            key,
            commands: Vec::new(),
        }
    }

    /// The pending key, if this frame was caused by one.
    pub fn key(&self) -> Option<KeyEvent> {
        self.key
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// Terminal size as `(width, height)`.
    pub fn size(&self) -> (u16, u16) {
        self.screen.size()
    }

    // ── scene stack ────────────────────────────────────────────

    pub fn push_scene(&mut self, scene: impl Scene + 'static) {
        self.commands.push(SceneCommand::Push(Box::new(scene)));
    }

    /// Pop the scene that is rendering.  If that empties the stack the
    /// engine exits cleanly.
    pub fn pop_scene(&mut self) {
        self.commands.push(SceneCommand::Pop);
    }

    pub fn replace_scene(&mut self, scene: impl Scene + 'static) {
        self.commands.push(SceneCommand::Replace(Box::new(scene)));
    }

    pub(crate) fn into_commands(self) -> Vec<SceneCommand> {
        self.commands
    }

    // ── widgets ────────────────────────────────────────────────

    /// Draw `text` (with `[:color:]` markup) at `(x, y)`.  Returns the
    /// columns used.
    pub fn label(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        markup::label(self.screen, x, y, 0, text, style)
    }

    /// Like [`Frame::label`], but nothing is drawn at or past column `max_x`.
    pub fn label_clipped(&mut self, x: u16, max_x: u16, y: u16, text: &str, style: Style) -> u16 {
        markup::label(self.screen, x, y, max_x, text, style)
    }

    /// Editable field accepting any character.
    pub fn edit_field(&mut self, x: u16, y: u16, width: u16, text: &mut String, style: Style) -> u16 {
        self.edit_field_filtered(x, y, width, text, edit_field::accept_all, style)
    }

    /// Editable field: the pending key is applied to `text` (typed characters
    /// pass through `filter`, the erase key drops the last one), then `text`
    /// is drawn right-aligned in at least `width` columns.
    pub fn edit_field_filtered(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &mut String,
        filter: impl Fn(char) -> bool,
        style: Style,
    ) -> u16 {
        edit_field::edit(self.screen, self.config, self.key, x, y, width, text, filter, style)
    }

    /// Draw a [`FlexTable`], moving `state`'s selection with the pending key.
    pub fn flex_table<R, C>(
        &mut self,
        table: FlexTable<'_, R>,
        state: &mut FlexTableState,
    ) -> Result<u16, TableError>
    where
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        table.render::<C>(self.screen, self.config, self.key, state)
    }
}
