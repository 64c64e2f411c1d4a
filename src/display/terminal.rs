//! Terminal host
//!
//! Presents the HUD as character cells. The whole terminal is the overlay
//! surface; containers are cell-aligned regions registered by the caller.

use std::collections::HashMap;

use tracing::debug;

use crate::geometry::{Rect, Size};
use crate::host::{ContainerId, Host, Surface};
use crate::paint::Frame;
use crate::style::{Color, Font};

use super::buffer::CellBuffer;
use super::ctrl;
use super::raster::{rasterize, surface_for, CELL_HEIGHT, CELL_WIDTH};

/// Host that renders frames into an ANSI cell buffer
#[derive(Debug)]
pub struct TerminalHost {
    cols: u16,
    rows: u16,
    backdrop: Color,
    containers: HashMap<ContainerId, Rect>,
    attached: Option<Surface>,
    buffer: CellBuffer,
    dirty: bool,
}

impl TerminalHost {
    pub fn new(cols: u16, rows: u16) -> Self {
        let backdrop = Color::BLACK;
        Self {
            cols,
            rows,
            backdrop,
            containers: HashMap::new(),
            attached: None,
            buffer: CellBuffer::new(cols, rows, backdrop),
            dirty: true,
        }
    }

    /// Register a container region, in cells
    pub fn add_container(&mut self, id: ContainerId, col: u16, row: u16, cols: u16, rows: u16) {
        let bounds = Rect::new(
            col as f64 * CELL_WIDTH,
            row as f64 * CELL_HEIGHT,
            cols as f64 * CELL_WIDTH,
            rows as f64 * CELL_HEIGHT,
        );
        self.containers.insert(id, bounds);
    }

    /// Terminal was resized
    pub fn resize(&mut self, cols: u16, rows: u16) {
        debug!(cols, rows, "terminal resized");
        self.cols = cols;
        self.rows = rows;
        self.buffer = CellBuffer::new(cols, rows, self.backdrop);
        self.dirty = true;
    }

    pub fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    pub fn attached(&self) -> Option<Surface> {
        self.attached
    }

    /// ANSI text for the latest frame, if it changed since the last call
    pub fn take_output(&mut self) -> Option<String> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(format!("{}{}", ctrl::home(), self.buffer.to_ansi()))
    }
}

impl Host for TerminalHost {
    fn attach(&mut self, surface: Surface) -> Option<Rect> {
        let bounds = self.bounds(surface)?;
        self.attached = Some(surface);
        Some(bounds)
    }

    fn detach(&mut self, surface: Surface) {
        if self.attached == Some(surface) {
            self.attached = None;
            self.buffer = CellBuffer::new(self.cols, self.rows, self.backdrop);
            self.dirty = true;
        }
    }

    fn bounds(&self, surface: Surface) -> Option<Rect> {
        match surface {
            Surface::Overlay => Some(surface_for(self.cols, self.rows)),
            Surface::Container(id) => self.containers.get(&id).copied(),
        }
    }

    /// One cell per display column, one cell height per line
    fn measure_text(&self, text: &str, _font: &Font, max_width: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let natural = unicode_display_width::width(text) as f64 * CELL_WIDTH;
        let max_cols = (max_width / CELL_WIDTH).floor();
        if max_cols < 1.0 {
            return Size::new(0.0, CELL_HEIGHT);
        }
        let max_width = max_cols * CELL_WIDTH;
        let lines = (natural / max_width).ceil().max(1.0);
        Size::new(natural.min(max_width), lines * CELL_HEIGHT)
    }

    fn present(&mut self, frame: &Frame) {
        let mut buffer = CellBuffer::new(self.cols, self.rows, self.backdrop);
        rasterize(frame, &mut buffer);
        self.buffer = buffer;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_covers_terminal() {
        let host = TerminalHost::new(80, 24);
        assert_eq!(
            host.bounds(Surface::Overlay),
            Some(Rect::new(0.0, 0.0, 640.0, 384.0))
        );
    }

    #[test]
    fn test_container_bounds_in_cells() {
        let mut host = TerminalHost::new(80, 24);
        host.add_container(ContainerId(1), 10, 2, 20, 10);
        assert_eq!(
            host.bounds(Surface::Container(ContainerId(1))),
            Some(Rect::new(80.0, 32.0, 160.0, 160.0))
        );
        assert!(host.attach(Surface::Container(ContainerId(9))).is_none());
    }

    #[test]
    fn test_measure_wraps_on_cells() {
        let host = TerminalHost::new(80, 24);
        let font = Font::default();
        assert_eq!(host.measure_text("hello", &font, 400.0), Size::new(40.0, 16.0));
        assert_eq!(host.measure_text("hello", &font, 20.0), Size::new(16.0, 48.0));
        assert_eq!(host.measure_text("", &font, 400.0), Size::ZERO);
    }

    #[test]
    fn test_output_only_when_dirty() {
        let mut host = TerminalHost::new(10, 2);
        assert!(host.take_output().is_some());
        assert!(host.take_output().is_none());

        host.present(&Frame {
            alpha: 1.0,
            bounds: surface_for(10, 2),
            commands: Vec::new(),
        });
        let out = host.take_output().unwrap();
        assert!(out.starts_with(&ctrl::home()));
    }

    #[test]
    fn test_detach_clears_buffer() {
        let mut host = TerminalHost::new(10, 2);
        host.attach(Surface::Overlay);
        host.present(&Frame {
            alpha: 1.0,
            bounds: surface_for(10, 2),
            commands: vec![crate::paint::DrawCmd::FillRect {
                rect: surface_for(10, 2),
                color: Color::WHITE,
            }],
        });
        assert!(host.buffer().get(0, 0).unwrap().bg.is_some());

        host.detach(Surface::Overlay);
        assert!(host.attached().is_none());
        assert!(host.buffer().get(0, 0).unwrap().bg.is_none());
    }

    #[test]
    fn test_resize_rebuilds_buffer() {
        let mut host = TerminalHost::new(80, 24);
        host.take_output();
        host.resize(100, 30);
        assert_eq!((host.buffer().width(), host.buffer().height()), (100, 30));
        assert_eq!(
            host.bounds(Surface::Overlay),
            Some(Rect::new(0.0, 0.0, 800.0, 480.0))
        );
        assert!(host.take_output().is_some());
    }
}
