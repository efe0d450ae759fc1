//! Scenes: the views the engine stacks.

use crate::error::NormalExit;

use super::Frame;

/// One renderable, input-handling view.
///
/// The engine calls `render` once per frame while the scene is on top of the
/// stack.  Any state the scene needs between frames lives in the implementor
/// (or in whatever a closure captured).
pub trait Scene {
    fn render(&mut self, frame: &mut Frame<'_>) -> anyhow::Result<()>;
}

impl<F> Scene for F
where
    F: FnMut(&mut Frame<'_>) -> anyhow::Result<()>,
{
    fn render(&mut self, frame: &mut Frame<'_>) -> anyhow::Result<()> {
        self(frame)
    }
}

/// Bottom of every stack: ends the loop as soon as it becomes visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExitScene;

impl Scene for ExitScene {
    fn render(&mut self, _frame: &mut Frame<'_>) -> anyhow::Result<()> {
        Err(NormalExit.into())
    }
}

/// Stack changes a scene asks for while it renders.
pub(crate) enum SceneCommand {
    Push(Box<dyn Scene>),
    Pop,
    Replace(Box<dyn Scene>),
}
