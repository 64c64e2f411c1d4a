//! In-memory host
//!
//! A [`Host`] with no window system behind it: surfaces are plain rects,
//! text is measured with a fixed advance per character, and presented frames
//! are recorded. Useful for headless runs and for tests.

use std::collections::HashMap;

use crate::geometry::{Rect, Size};
use crate::host::{ContainerId, Host, Surface};
use crate::paint::Frame;
use crate::style::Font;

#[derive(Debug, Clone)]
pub struct MemoryHost {
    screen: Rect,
    containers: HashMap<ContainerId, Rect>,
    attached: Vec<Surface>,
    attach_count: usize,
    detach_count: usize,
    frames: Vec<Frame>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Host with a 1280x800 screen and no containers
    pub fn new() -> Self {
        Self::with_screen(Rect::new(0.0, 0.0, 1280.0, 800.0))
    }

    pub fn with_screen(screen: Rect) -> Self {
        Self {
            screen,
            containers: HashMap::new(),
            attached: Vec::new(),
            attach_count: 0,
            detach_count: 0,
            frames: Vec::new(),
        }
    }

    pub fn add_container(&mut self, id: ContainerId, bounds: Rect) {
        self.containers.insert(id, bounds);
    }

    /// Change the bounds of the screen or a container
    pub fn resize(&mut self, surface: Surface, bounds: Rect) {
        match surface {
            Surface::Overlay => self.screen = bounds,
            Surface::Container(id) => {
                self.containers.insert(id, bounds);
            }
        }
    }

    /// Surfaces the HUD is currently attached to
    pub fn attached(&self) -> &[Surface] {
        &self.attached
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    pub fn detach_count(&self) -> usize {
        self.detach_count
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Host for MemoryHost {
    fn attach(&mut self, surface: Surface) -> Option<Rect> {
        let bounds = self.bounds(surface)?;
        self.attached.push(surface);
        self.attach_count += 1;
        Some(bounds)
    }

    fn detach(&mut self, surface: Surface) {
        self.attached.retain(|s| *s != surface);
        self.detach_count += 1;
    }

    fn bounds(&self, surface: Surface) -> Option<Rect> {
        match surface {
            Surface::Overlay => Some(self.screen),
            Surface::Container(id) => self.containers.get(&id).copied(),
        }
    }

    fn measure_text(&self, text: &str, font: &Font, max_width: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let advance = font.size * 0.5;
        let line_height = font.size * 1.25;
        let natural = text.chars().count() as f64 * advance;
        if max_width <= 0.0 {
            return Size::new(0.0, line_height);
        }
        let lines = (natural / max_width).ceil().max(1.0);
        Size::new(natural.min(max_width), lines * line_height)
    }

    fn present(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}
