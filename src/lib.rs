//! Immediate-mode terminal UI.
//!
//! Nothing is retained between frames: every key press clears the screen and
//! the active [`Scene`] draws itself again from its own variables.  Widgets
//! are plain calls on [`Frame`] that read the pending key, update the state
//! the caller handed in, and paint the result.
//!
//! ```no_run
//! use imtui::{Engine, Frame, Style};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut name = String::new();
//!     let mut engine = Engine::new()?;
//!     engine.set_scene(move |frame: &mut Frame<'_>| -> anyhow::Result<()> {
//!         let w = frame.label(0, 0, "Name: ", Style::default());
//!         frame.edit_field(w, 0, 12, &mut name, Style::default());
//!         frame.label(0, 1, "[:gray:]Esc to quit", Style::default());
//!         Ok(())
//!     });
//!     engine.run()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod screen;
pub mod ui;

pub use config::{Action, EngineConfig, KeyBind};
pub use engine::{Engine, ExitScene, Frame, Scene};
pub use error::{is_normal_exit, EngineError, NormalExit, TableError};
pub use screen::{MemoryScreen, Screen, ScreenEvent, TerminalScreen};
pub use ui::edit_field::{accept_all, filter_decimal, typed_char};
pub use ui::flex_table::{FlexTable, FlexTableState};

pub use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
pub use ratatui::style::{Color, Modifier, Style};
