//! HUD state types
//!
//! What the HUD is currently showing and where it is in its lifecycle.

use std::time::Duration;

use crate::geometry::Size;

/// A caller-supplied view shown in place of the indicator
#[derive(Debug, Clone, PartialEq)]
pub struct CustomView {
    /// Host-side identity of the view
    pub id: u64,
    /// Natural size of the view
    pub size: Size,
}

impl CustomView {
    pub fn new(id: u64, size: Size) -> Self {
        Self { id, size }
    }
}

/// What the indicator area shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HudMode {
    /// Spinning fins
    #[default]
    Indeterminate,
    /// Progress ring filled to the given fraction
    Determinate(f64),
    Info,
    Success,
    Error,
    Custom(CustomView),
}

impl HudMode {
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, HudMode::Indeterminate)
    }

    /// Modes that dismiss themselves after a computed delay
    pub fn auto_dismisses(&self) -> bool {
        matches!(self, HudMode::Info | HudMode::Success | HudMode::Error)
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            HudMode::Indeterminate => "indeterminate",
            HudMode::Determinate(_) => "determinate",
            HudMode::Info => "info",
            HudMode::Success => "success",
            HudMode::Error => "error",
            HudMode::Custom(_) => "custom",
        }
    }
}

/// Lifecycle phase of the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Detached, nothing on screen
    #[default]
    Hidden,
    /// Attached; fading in or fully visible
    Showing,
    /// Attached; fading out toward `Hidden`
    Dismissing,
}

/// Mutable state of the HUD
#[derive(Debug, Clone, Default)]
pub struct HudState {
    pub mode: HudMode,
    pub status: String,
    pub phase: Phase,
    /// A delayed dismiss is scheduled
    pub dismiss_pending: bool,
}

impl HudState {
    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Hidden
    }

    /// Progress fraction when in determinate mode
    pub fn progress(&self) -> Option<f64> {
        match self.mode {
            HudMode::Determinate(p) => Some(p),
            _ => None,
        }
    }

    /// Back to hidden with no content
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// How long an info/success/error HUD stays up.
///
/// Grows with the message length: 0.06s per character plus 0.5s, bounded to
/// `min..=max`.
pub fn display_duration(status: &str, min: Duration, max: Duration) -> Duration {
    let chars = status.chars().count() as f64;
    let secs = chars * 0.06 + 0.5;
    let (lo, hi) = (min.as_secs_f64(), max.as_secs_f64().max(min.as_secs_f64()));
    Duration::from_secs_f64(secs.clamp(lo, hi))
}
