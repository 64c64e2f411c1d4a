//! HUD configuration
//!
//! One owned `HudConfig` value is built at startup (defaults, a TOML file, or
//! the builder setters) and handed to the controller. Setters are meant to be
//! applied before a `show`; layout and paint read the config on every redraw.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::host::ContainerId;
use crate::style::{Font, HudStyle, MaskType, Position};

/// Appearance and behaviour of the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    pub style: HudStyle,
    pub mask: MaskType,
    pub position: Position,
    /// Surface to attach to (None = full-screen overlay window)
    #[serde(skip)]
    pub container: Option<ContainerId>,
    pub font: Font,
    /// Opacity of the box background (0.0 - 1.0)
    pub opacity: f64,
    /// Diameter of the spinner, progress ring and glyphs
    pub spinner_diameter: f64,
    /// Inset between the box edge and its content, and the box and the host edge
    pub margin: f64,
    /// Gap between the indicator and the status text
    pub padding: f64,
    pub corner_radius: f64,
    /// Stroke width of the progress ring and glyphs
    pub ring_thickness: f64,
    /// Force a square box when it still fits the host
    pub square: bool,
    /// Clicking the HUD dismisses it (only when a mask is set)
    pub dismissible: bool,
    pub animations_enabled: bool,
    pub fade_in_secs: f64,
    pub fade_out_secs: f64,
    /// Lower bound of the computed auto-dismiss duration
    pub min_dismiss_secs: f64,
    /// Upper bound of the computed auto-dismiss duration
    pub max_dismiss_secs: f64,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            style: HudStyle::Light,
            mask: MaskType::None,
            position: Position::Center,
            container: None,
            font: Font::default(),
            opacity: 0.9,
            spinner_diameter: 60.0,
            margin: 20.0,
            padding: 10.0,
            corner_radius: 14.0,
            ring_thickness: 4.0,
            square: false,
            dismissible: true,
            animations_enabled: true,
            fade_in_secs: 0.15,
            fade_out_secs: 0.20,
            min_dismiss_secs: 5.0,
            max_dismiss_secs: 10.0,
        }
    }
}

impl HudConfig {
    /// Load config from a TOML file, falling back to defaults when it is absent
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("hud config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config: HudConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!("loaded hud config from {}", path.display());
        Ok(config)
    }

    pub fn with_style(mut self, style: HudStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_mask(mut self, mask: MaskType) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Attach to a container surface; `None` selects the full-screen overlay
    pub fn with_container(mut self, container: Option<ContainerId>) -> Self {
        self.container = container;
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_spinner_diameter(mut self, diameter: f64) -> Self {
        self.spinner_diameter = diameter;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    pub fn with_square(mut self, square: bool) -> Self {
        self.square = square;
        self
    }

    pub fn with_animations(mut self, enabled: bool) -> Self {
        self.animations_enabled = enabled;
        self
    }

    /// Fade-in duration, zero when animations are disabled
    pub fn fade_in(&self) -> Duration {
        self.animated(self.fade_in_secs)
    }

    /// Fade-out duration, zero when animations are disabled
    pub fn fade_out(&self) -> Duration {
        self.animated(self.fade_out_secs)
    }

    /// Bounds of the computed auto-dismiss duration
    pub fn dismiss_bounds(&self) -> (Duration, Duration) {
        (secs(self.min_dismiss_secs), secs(self.max_dismiss_secs))
    }

    fn animated(&self, value: f64) -> Duration {
        if self.animations_enabled {
            secs(value)
        } else {
            Duration::ZERO
        }
    }
}

/// Seconds from config as a duration; negative or NaN values become zero
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
