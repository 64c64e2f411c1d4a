//! Terminal display
//!
//! A [`Host`](crate::host::Host) that renders HUD frames as ANSI character
//! cells, used by the preview binary. Frames are rasterised into a
//! [`CellBuffer`] and written out whole.

pub mod buffer;
pub mod ctrl;
pub mod raster;
mod terminal;

pub use buffer::{Cell, CellBuffer};
pub use raster::{rasterize, surface_for, CELL_HEIGHT, CELL_WIDTH};
pub use terminal::TerminalHost;
