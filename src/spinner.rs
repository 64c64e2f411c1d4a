//! Indeterminate spinner
//!
//! A ring of twelve fins. Instead of rotating anything, every 50ms the next
//! fin is flashed to full opacity (an immediate change, never interpolated)
//! and then faded back to its resting opacity over 0.7s. The staggered fades
//! read as a comet trail chasing around the ring.

use std::f64::consts::TAU;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::animation::{AnimatedValue, Transaction};
use crate::geometry::{Point, Rect};
use crate::scheduler::{Scheduler, TimerHandle, TimerId};
use crate::style::Color;

/// Number of fins in the ring
pub const FIN_COUNT: usize = 12;
/// Tick period of the spinner timer
pub const TICK_PERIOD: Duration = Duration::from_millis(50);
/// How long a lit fin takes to fade back to rest
pub const FADE_DURATION: Duration = Duration::from_millis(700);
/// Opacity of a fin that is not part of the trail
pub const REST_OPACITY: f64 = 0.0;

const FIN_WIDTH_RATIO: f64 = 0.095;
const FIN_HEIGHT_RATIO: f64 = 0.30;

/// Geometry shared by every fin, derived from the spinner diameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinGeometry {
    pub diameter: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    /// Distance from the ring center to the inner end of each fin
    pub inner_radius: f64,
}

impl FinGeometry {
    pub fn new(diameter: f64) -> Self {
        let side = diameter.max(0.0);
        let width = side * FIN_WIDTH_RATIO;
        let height = side * FIN_HEIGHT_RATIO;
        Self {
            diameter,
            width,
            height,
            corner_radius: width / 2.0,
            inner_radius: side / 2.0 - height,
        }
    }

    /// Rotation anchor in the fin's unit coordinates.
    ///
    /// x is centered; y lies beyond the fin's inner end, at the ring center, so
    /// rotating about it swings the fin around the circle.
    pub fn anchor(&self) -> Point {
        let y = if self.height > 0.0 {
            1.0 + self.inner_radius / self.height
        } else {
            0.0
        };
        Point::new(0.5, y)
    }

    /// Fin bounds relative to the ring center, for an unrotated (upright) fin
    pub fn bounds(&self) -> Rect {
        Rect::new(
            -self.width / 2.0,
            -(self.inner_radius + self.height),
            self.width,
            self.height,
        )
    }
}

/// One blade of the spinner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinLayer {
    pub index: usize,
    /// Clockwise rotation from twelve o'clock
    pub angle: f64,
    pub opacity: AnimatedValue,
}

impl FinLayer {
    fn new(index: usize) -> Self {
        Self {
            index,
            angle: index as f64 * TAU / FIN_COUNT as f64,
            opacity: AnimatedValue::new(REST_OPACITY),
        }
    }
}

/// The spinner animation engine
#[derive(Debug)]
pub struct SpinnerEngine {
    geometry: FinGeometry,
    color: Color,
    fins: Vec<FinLayer>,
    current: usize,
    timer: Option<TimerHandle>,
    visible: bool,
}

impl SpinnerEngine {
    pub fn new(diameter: f64, color: Color) -> Self {
        Self {
            geometry: FinGeometry::new(diameter),
            color,
            fins: (0..FIN_COUNT).map(FinLayer::new).collect(),
            current: FIN_COUNT - 1,
            timer: None,
            visible: false,
        }
    }

    /// Recompute fin geometry for a new diameter and color.
    ///
    /// Fins share one geometry value, so every fin changes in the same step.
    pub fn configure(&mut self, diameter: f64, color: Color) {
        self.geometry = FinGeometry::new(diameter);
        self.color = color;
    }

    pub fn geometry(&self) -> &FinGeometry {
        &self.geometry
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn fins(&self) -> &[FinLayer] {
        &self.fins
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether `id` belongs to this engine's live timer
    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.timer.as_ref().is_some_and(|t| t.id() == id)
    }

    /// Arm the tick timer. No-op while already running.
    pub fn start(&mut self, scheduler: &mut Scheduler) {
        if self.is_running() {
            return;
        }
        self.current = FIN_COUNT - 1;
        self.timer = Some(scheduler.repeating(TICK_PERIOD));
        self.visible = true;
        debug!("spinner started");
    }

    /// Disarm the tick timer, leaving fins as last drawn. No-op when stopped.
    pub fn stop(&mut self, now: Instant) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        timer.cancel();
        for fin in &mut self.fins {
            fin.opacity.freeze(now);
        }
        debug!("spinner stopped");
    }

    /// Advance the trail by one fin
    pub fn tick(&mut self, at: Instant) {
        self.current = (self.current + 1) % FIN_COUNT;
        let fin = &mut self.fins[self.current];
        fin.opacity.set(1.0, Transaction::immediate(), at);
        fin.opacity.animate_to(REST_OPACITY, FADE_DURATION, at);
    }

    /// Index of the most recently lit fin
    pub fn current(&self) -> usize {
        self.current
    }

    /// Fin opacities presented at `now`
    pub fn opacities(&self, now: Instant) -> [f64; FIN_COUNT] {
        let mut out = [REST_OPACITY; FIN_COUNT];
        for fin in &self.fins {
            out[fin.index] = fin.opacity.value_at(now);
        }
        out
    }
}

impl Drop for SpinnerEngine {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.fins.clear();
    }
}
