//! Host toolkit boundary
//!
//! The HUD never touches a window system directly. Everything it needs from
//! the toolkit (view hierarchy, the overlay window, text measurement, getting
//! pixels on screen) goes through [`Host`].

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};
use crate::paint::Frame;
use crate::style::Font;

/// Opaque handle of a container view owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u64);

/// Where the HUD is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// A caller-provided container view
    Container(ContainerId),
    /// Full-screen borderless overlay window, created on demand
    Overlay,
}

/// What happened to a click delivered to the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The HUD handled the click; the content beneath never sees it
    Consumed,
    /// The click should be delivered to the content beneath
    Forwarded,
}

/// Toolkit services used by the controller
pub trait Host {
    /// Insert the HUD into `surface` and return the surface bounds.
    ///
    /// For [`Surface::Overlay`] this creates the overlay window. Returns
    /// `None` when the surface does not exist, in which case the HUD stays
    /// hidden.
    fn attach(&mut self, surface: Surface) -> Option<Rect>;

    /// Remove the HUD from `surface` (closing the overlay window)
    fn detach(&mut self, surface: Surface);

    /// Current bounds of an attached surface
    fn bounds(&self, surface: Surface) -> Option<Rect>;

    /// Size of `text` set in `font`, wrapped at `max_width`
    fn measure_text(&self, text: &str, font: &Font, max_width: f64) -> Size;

    /// Put a frame on screen
    fn present(&mut self, frame: &Frame);
}
