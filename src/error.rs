//! Library error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HudError {
    /// Timers need a tokio runtime to run on
    #[error("no tokio runtime available for HUD timers")]
    NoRuntime,
}
