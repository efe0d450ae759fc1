//! Error types surfaced by the engine and its widgets.

use std::io;

/// Sentinel a scene returns to end [`Engine::run`](crate::Engine::run)
/// successfully.
///
/// ```ignore
/// return Err(NormalExit.into());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("regular exit")]
pub struct NormalExit;

/// Returns `true` when `NormalExit` appears anywhere in the error chain.
pub fn is_normal_exit(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<NormalExit>())
}

/// Failures that end the event loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("init screen: {0}")]
    Init(#[source] io::Error),

    #[error("terminal i/o: {0}")]
    Io(#[from] io::Error),

    /// Carries the scene's whole error chain in its message.
    #[error("scene returned an error: {0:#}")]
    Scene(anyhow::Error),

    #[error("input source closed")]
    InputClosed,
}

/// Misconfigured table input. Indicates a caller bug, not a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("flex table needs at least one column weight")]
    NoColumns,

    #[error("misconfigured flex: row {row} has {columns} columns but {weights} weights were given")]
    ColumnMismatch {
        row: usize,
        columns: usize,
        weights: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn bare_sentinel_is_normal_exit() {
        let err = anyhow::Error::from(NormalExit);
        assert!(is_normal_exit(&err));
    }

    #[test]
    fn sentinel_survives_context() {
        let err = Err::<(), _>(NormalExit)
            .context("closing picker")
            .unwrap_err();
        assert!(is_normal_exit(&err));
    }

    #[test]
    fn other_errors_are_not_normal_exit() {
        let err = anyhow::anyhow!("boom");
        assert!(!is_normal_exit(&err));
    }

    #[test]
    fn scene_error_mentions_origin() {
        let err = EngineError::Scene(anyhow::anyhow!("bad price"));
        assert_eq!(err.to_string(), "scene returned an error: bad price");
    }

    #[test]
    fn scene_error_chain_is_printed_once() {
        let inner = anyhow::anyhow!("bad price").context("pricing");
        let err = anyhow::Error::from(EngineError::Scene(inner));
        assert_eq!(format!("{err:#}"), "scene returned an error: pricing: bad price");
        assert_eq!(err.chain().count(), 1);
    }
}
