//! progress-hud - a modal progress overlay
//!
//! A rounded, semi-opaque box with an activity spinner, progress ring or
//! result glyph plus optional status text, drawn over a container or a
//! full-screen overlay. The crate is toolkit-agnostic: the host toolkit
//! plugs in through [`Host`], and the controller hands it display lists to
//! put on screen. A terminal host lives in [`display`].

pub mod animation;
pub mod config;
pub mod display;
pub mod error;
pub mod geometry;
pub mod host;
pub mod hud;
pub mod layout;
pub mod paint;
pub mod paths;
pub mod scheduler;
pub mod spinner;
pub mod state;
pub mod style;
pub mod testing;

pub use config::HudConfig;
pub use error::HudError;
pub use geometry::{Point, Rect, Size};
pub use host::{ClickOutcome, ContainerId, Host, Surface};
pub use hud::Hud;
pub use paint::{DrawCmd, Frame};
pub use state::{CustomView, HudMode, Phase};
pub use style::{Color, Font, HudStyle, MaskType, Position};
