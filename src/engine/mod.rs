//! The scene stack and the event loop.
//!
//! Every input event clears the screen and re-renders the top scene from
//! scratch; the screen works out which cells actually changed.

mod frame;
mod scene;

use std::ops::ControlFlow;

use crossterm::event::KeyEvent;

pub use frame::Frame;
pub use scene::{ExitScene, Scene};

use crate::config::{Action, EngineConfig};
use crate::error::{is_normal_exit, EngineError};
use crate::screen::{Screen, ScreenEvent, TerminalScreen};
use scene::SceneCommand;

/// Owns the screen and the scene stack.
///
/// A fresh engine holds one [`ExitScene`] at the bottom of its stack, so
/// backing out of the last application scene ends [`Engine::run`].
pub struct Engine<S: Screen = TerminalScreen> {
    screen: S,
    config: EngineConfig,
    scenes: Vec<Box<dyn Scene>>,
    /// Set by any stack change; the top scene is drawn again before the
    /// engine waits for input.
    force_redraw: bool,
}

impl Engine<TerminalScreen> {
    /// Take over the terminal with the default key bindings.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_config(EngineConfig::default())
    }

    /// Take over the terminal.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        let screen = TerminalScreen::init().map_err(EngineError::Init)?;
        Ok(Engine::with_screen(screen, config))
    }
}

impl<S: Screen> Engine<S> {
    /// An engine drawing on `screen`.
    pub fn with_screen(screen: S, config: EngineConfig) -> Self {
        let mut engine = Self {
            screen,
            config,
            scenes: Vec::new(),
            force_redraw: false,
        };
        engine.push_scene(ExitScene);
        engine
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of scenes on the stack, the exit scene included.
    pub fn depth(&self) -> usize {
        self.scenes.len()
    }

    // ── scene stack ────────────────────────────────────────────

    pub fn push_scene(&mut self, scene: impl Scene + 'static) {
        self.push_boxed(Box::new(scene));
    }

    fn push_boxed(&mut self, scene: Box<dyn Scene>) {
        self.force_redraw = true;
        self.scenes.push(scene);
        tracing::debug!("scene pushed, depth={}", self.scenes.len());
    }

    /// Remove the top scene.  Returns whether any scene is left.
    pub fn pop_scene(&mut self) -> bool {
        self.force_redraw = true;
        if self.scenes.pop().is_some() {
            tracing::debug!("scene popped, depth={}", self.scenes.len());
        }
        !self.scenes.is_empty()
    }

    pub fn replace_scene(&mut self, scene: impl Scene + 'static) {
        self.pop_scene();
        self.push_scene(scene);
    }

    /// Single-scene mode: drop everything above the exit scene and show
    /// `scene`, so backing out of it ends the program.
    pub fn set_scene(&mut self, scene: impl Scene + 'static) {
        self.scenes.truncate(1);
        self.push_scene(scene);
    }

    fn apply(&mut self, commands: Vec<SceneCommand>) {
        for command in commands {
            match command {
                SceneCommand::Push(scene) => self.push_boxed(scene),
                SceneCommand::Pop => {
                    self.pop_scene();
                }
                SceneCommand::Replace(scene) => {
                    self.pop_scene();
                    self.push_boxed(scene);
                }
            }
        }
    }

    // ── event loop ─────────────────────────────────────────────

    /// Run until a scene exits, the stack empties, or the cancel key is
    /// pressed.  The screen is released on every way out.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let result = self.event_loop();
        self.screen.finalize();
        match &result {
            Ok(()) => tracing::debug!("event loop finished"),
            Err(err) => tracing::debug!("event loop failed: {err}"),
        }
        result
    }

    fn event_loop(&mut self) -> Result<(), EngineError> {
        // First paint, before any input arrives.
        self.force_redraw = false;
        if self.paint(None)?.is_break() {
            return Ok(());
        }

        loop {
            let Some(event) = self.screen.poll_event() else {
                return Err(EngineError::InputClosed);
            };

            match event {
                ScreenEvent::Resize(width, height) => {
                    tracing::debug!("resized to {width}x{height}");
                    self.screen.clear();
                    // Best effort: a failing scene is reported on the next key.
                    if let Err(err) = self.render_top(None) {
                        tracing::debug!("ignoring scene error during resize redraw: {err}");
                    }
                    self.screen.sync()?;
                }
                ScreenEvent::Key(key) => {
                    if self.config.matches(Action::Cancel, key) {
                        tracing::debug!("cancel key pressed");
                        return Ok(());
                    }
                    if self.config.matches(Action::Back, key) && !self.pop_scene() {
                        return Ok(());
                    }
                    if self.paint(Some(key))?.is_break() {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Clear, render the top scene with `key` pending, keep re-rendering
    /// while the stack changed, then flush.
    fn paint(&mut self, key: Option<KeyEvent>) -> Result<ControlFlow<()>, EngineError> {
        self.screen.clear();
        if self.render_top(key)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }

        while self.force_redraw {
            self.force_redraw = false;
            self.screen.clear();
            if self.render_top(None)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        self.screen.show()?;
        tracing::trace!("frame shown, depth={}", self.scenes.len());
        Ok(ControlFlow::Continue(()))
    }

    /// Render the top scene once.  `Break` means the program should end
    /// successfully: the scene returned `NormalExit` or no scene is left.
    fn render_top(&mut self, key: Option<KeyEvent>) -> Result<ControlFlow<()>, EngineError> {
        let Some(scene) = self.scenes.last_mut() else {
            tracing::debug!("scene stack empty");
            return Ok(ControlFlow::Break(()));
        };

        let mut frame = Frame::new(&mut self.screen, &self.config, key);
        let result = scene.render(&mut frame);
        let commands = frame.into_commands();
        self.apply(commands);

        match result {
            Ok(()) => Ok(ControlFlow::Continue(())),
            Err(err) if is_normal_exit(&err) => {
                tracing::debug!("scene requested exit");
                Ok(ControlFlow::Break(()))
            }
            Err(err) => Err(EngineError::Scene(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::Context;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::style::Style;

    use super::*;
    use crate::error::NormalExit;
    use crate::screen::MemoryScreen;

    type Log = Rc<RefCell<Vec<String>>>;

    fn key(code: KeyCode) -> ScreenEvent {
        ScreenEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl_c() -> ScreenEvent {
        ScreenEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
    }

    fn test_engine(events: Vec<ScreenEvent>) -> Engine<MemoryScreen> {
        let screen = MemoryScreen::new(20, 5).with_events(events);
        Engine::with_screen(screen, EngineConfig::default())
    }

    /// Scene that logs `name` plus the pending key and draws `name` on line 0.
    fn logging_scene(name: &'static str, log: &Log) -> impl Scene + 'static {
        let log = Rc::clone(log);
        move |frame: &mut Frame<'_>| -> anyhow::Result<()> {
            let pending = match frame.key().map(|k| k.code) {
                Some(KeyCode::Char(c)) => c.to_string(),
                Some(other) => format!("{other:?}"),
                None => "-".to_string(),
            };
            log.borrow_mut().push(format!("{name}:{pending}"));
            frame.label(0, 0, name, Style::default());
            Ok(())
        }
    }

    #[test]
    fn ctrl_c_exits_cleanly_and_finalizes_once() {
        let log = Log::default();
        let mut engine = test_engine(vec![key(KeyCode::Char('a')), ctrl_c(), key(KeyCode::Char('b'))]);
        engine.push_scene(logging_scene("main", &log));

        assert!(engine.run().is_ok());
        assert_eq!(engine.screen().finalize_count(), 1);
        assert_eq!(*log.borrow(), vec!["main:-", "main:a"]);
        assert_eq!(engine.screen().poll_count(), 2);
    }

    #[test]
    fn sentinel_on_first_render_exits_without_polling() {
        let mut engine = test_engine(vec![key(KeyCode::Char('a'))]);
        engine.push_scene(|_: &mut Frame<'_>| -> anyhow::Result<()> { Err(NormalExit.into()) });

        assert!(engine.run().is_ok());
        assert_eq!(engine.screen().poll_count(), 0);
        assert_eq!(engine.screen().finalize_count(), 1);
    }

    #[test]
    fn sentinel_wrapped_in_context_still_exits_cleanly() {
        let mut engine = test_engine(vec![key(KeyCode::Enter)]);
        engine.push_scene(|frame: &mut Frame<'_>| -> anyhow::Result<()> {
            if frame.key().is_some() {
                return Err(NormalExit).context("user confirmed");
            }
            Ok(())
        });

        assert!(engine.run().is_ok());
    }

    #[test]
    fn scene_errors_are_surfaced_and_screen_released() {
        let mut engine = test_engine(vec![key(KeyCode::Char('x'))]);
        engine.push_scene(|frame: &mut Frame<'_>| -> anyhow::Result<()> {
            match frame.key() {
                Some(_) => anyhow::bail!("bad input"),
                None => Ok(()),
            }
        });

        let err = engine.run().unwrap_err();
        assert!(matches!(err, EngineError::Scene(_)));
        assert_eq!(err.to_string(), "scene returned an error: bad input");
        assert_eq!(engine.screen().finalize_count(), 1);
    }

    #[test]
    fn exhausted_input_is_an_error() {
        let log = Log::default();
        let mut engine = test_engine(Vec::new());
        engine.push_scene(logging_scene("main", &log));

        assert!(matches!(engine.run(), Err(EngineError::InputClosed)));
        assert_eq!(engine.screen().finalize_count(), 1);
    }

    #[test]
    fn first_paint_is_shown() {
        let log = Log::default();
        let mut engine = test_engine(vec![ctrl_c()]);
        engine.push_scene(logging_scene("hello", &log));

        engine.run().unwrap();
        assert_eq!(engine.screen().line(0), "hello");
        assert_eq!(engine.screen().show_count(), 1);
        // Pushing before `run` does not cause a second first paint.
        assert_eq!(*log.borrow(), vec!["hello:-"]);
    }

    #[test]
    fn escape_pops_then_exits_through_the_exit_scene() {
        let log = Log::default();
        let mut engine = test_engine(vec![key(KeyCode::Esc), ctrl_c()]);
        engine.push_scene(logging_scene("first", &log));
        engine.push_scene(logging_scene("second", &log));

        assert!(engine.run().is_ok());
        assert_eq!(*log.borrow(), vec!["second:-", "first:Esc", "first:-"]);
        assert_eq!(engine.screen().line(0), "first");

        // With a single scene, Esc uncovers the exit scene.
        let log = Log::default();
        let mut engine = test_engine(vec![key(KeyCode::Esc), key(KeyCode::Esc)]);
        engine.push_scene(logging_scene("only", &log));
        assert!(engine.run().is_ok());
        assert_eq!(*log.borrow(), vec!["only:-"]);
    }

    #[test]
    fn push_then_pop_restores_previous_scene() {
        let mut engine = test_engine(Vec::new());
        let log = Log::default();
        engine.push_scene(logging_scene("base", &log));
        engine.push_scene(logging_scene("overlay", &log));
        assert_eq!(engine.depth(), 3);
        assert!(engine.pop_scene());
        assert_eq!(engine.depth(), 2);

        assert!(matches!(engine.run(), Err(EngineError::InputClosed)));
        assert_eq!(*log.borrow(), vec!["base:-"]);
    }

    #[test]
    fn pop_on_empty_stack_reports_empty() {
        let mut engine = test_engine(Vec::new());
        assert!(!engine.pop_scene());
        assert!(!engine.pop_scene());
        assert_eq!(engine.depth(), 0);
        assert!(engine.run().is_ok());
        assert_eq!(engine.screen().poll_count(), 0);
    }

    #[test]
    fn scene_pushed_from_a_frame_is_painted_before_next_key() {
        let log = Log::default();
        let mut engine = test_engine(vec![key(KeyCode::Enter), ctrl_c()]);
        let inner_log = Rc::clone(&log);
        engine.push_scene(move |frame: &mut Frame<'_>| -> anyhow::Result<()> {
            inner_log.borrow_mut().push("menu".to_string());
            frame.label(0, 0, "menu", Style::default());
            if frame.key().map(|k| k.code) == Some(KeyCode::Enter) {
                frame.push_scene(logging_scene("detail", &inner_log));
            }
            Ok(())
        });

        assert!(engine.run().is_ok());
        assert_eq!(*log.borrow(), vec!["menu", "menu", "detail:-"]);
        assert_eq!(engine.screen().line(0), "detail");
        assert_eq!(engine.screen().show_count(), 2);
        assert_eq!(engine.depth(), 3);
    }

    #[test]
    fn replace_and_pop_from_a_frame() {
        let log = Log::default();
        let mut engine = test_engine(vec![key(KeyCode::Char('r')), key(KeyCode::Char('p'))]);
        let inner_log = Rc::clone(&log);
        engine.push_scene(move |frame: &mut Frame<'_>| -> anyhow::Result<()> {
            if frame.key().map(|k| k.code) == Some(KeyCode::Char('r')) {
                let log = Rc::clone(&inner_log);
                frame.replace_scene(move |frame: &mut Frame<'_>| -> anyhow::Result<()> {
                    log.borrow_mut().push("replacement".to_string());
                    if frame.key().is_some() {
                        frame.pop_scene();
                    }
                    Ok(())
                });
            }
            Ok(())
        });

        // `p` pops the replacement, which uncovers the exit scene.
        assert!(engine.run().is_ok());
        assert_eq!(*log.borrow(), vec!["replacement", "replacement"]);
        assert_eq!(engine.depth(), 1);
    }

    #[test]
    fn set_scene_keeps_only_the_exit_scene_below() {
        let log = Log::default();
        let mut engine = test_engine(vec![key(KeyCode::Esc)]);
        engine.push_scene(logging_scene("a", &log));
        engine.push_scene(logging_scene("b", &log));
        engine.set_scene(logging_scene("single", &log));
        assert_eq!(engine.depth(), 2);

        assert!(engine.run().is_ok());
        assert_eq!(*log.borrow(), vec!["single:-"]);
    }

    #[test]
    fn resize_redraws_and_syncs_ignoring_scene_errors() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut engine = test_engine(vec![ScreenEvent::Resize(30, 6), ctrl_c()]);
        engine.push_scene(move |frame: &mut Frame<'_>| -> anyhow::Result<()> {
            *counter.borrow_mut() += 1;
            frame.label(0, 0, "resized?", Style::default());
            if *counter.borrow() > 1 {
                anyhow::bail!("only fails after the first paint");
            }
            Ok(())
        });

        assert!(engine.run().is_ok());
        assert_eq!(*calls.borrow(), 2);
        assert_eq!(engine.screen().sync_count(), 1);
        assert_eq!(engine.screen().size(), (30, 6));
        assert_eq!(engine.screen().line(0), "resized?");
    }

    #[test]
    fn rebound_cancel_key_is_honoured() {
        let config = EngineConfig::parse_config("cancel = q\n");
        let screen = MemoryScreen::new(10, 2).with_events(vec![key(KeyCode::Char('q')), ctrl_c()]);
        let mut engine = Engine::with_screen(screen, config);
        let log = Log::default();
        engine.push_scene(logging_scene("main", &log));

        assert!(engine.run().is_ok());
        assert_eq!(*log.borrow(), vec!["main:-"]);
        assert_eq!(engine.screen().poll_count(), 1);
    }
}
