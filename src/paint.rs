//! Paint routine
//!
//! Turns a layout plus the current state into a flat display list. Hosts
//! rasterise the list however they like; the HUD itself never draws pixels.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::Serialize;
use tokio::time::Instant;

use crate::config::HudConfig;
use crate::geometry::{Point, Rect};
use crate::layout::HudLayout;
use crate::spinner::SpinnerEngine;
use crate::state::{HudMode, HudState};
use crate::style::{Color, Font, MaskType};

/// Angle of twelve o'clock; determinate arcs start here
pub const ARC_START: f64 = -FRAC_PI_2;

/// One drawing operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCmd {
    FillRect {
        rect: Rect,
        color: Color,
    },
    /// Radial gradient from `inner` at the center to `outer` at `radius`
    RadialGradient {
        rect: Rect,
        center: Point,
        radius: f64,
        inner: Color,
        outer: Color,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f64,
        color: Color,
    },
    /// Arc swept clockwise from `start_angle` to `end_angle`
    StrokeArc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        width: f64,
        color: Color,
    },
    StrokePolyline {
        points: Vec<Point>,
        width: f64,
        color: Color,
    },
    /// A spinner fin: `bounds` is the upright fin relative to `center`,
    /// rotated clockwise by `angle`
    Fin {
        center: Point,
        angle: f64,
        bounds: Rect,
        corner_radius: f64,
        color: Color,
    },
    Text {
        rect: Rect,
        text: String,
        font: Font,
        color: Color,
    },
    /// Placeholder for a host-owned custom view
    CustomView {
        id: u64,
        frame: Rect,
    },
}

/// A complete paint of the HUD at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Layer opacity for the whole HUD (fades)
    pub alpha: f64,
    pub bounds: Rect,
    pub commands: Vec<DrawCmd>,
}

/// Checkmark in unit coordinates
pub const CHECKMARK: [(f64, f64); 3] = [(0.15, 0.55), (0.40, 0.80), (0.85, 0.25)];
/// The two strokes of the error cross in unit coordinates
pub const CROSS: [[(f64, f64); 2]; 2] = [[(0.2, 0.2), (0.8, 0.8)], [(0.8, 0.2), (0.2, 0.8)]];
/// Info glyph: dot and stem in unit coordinates
pub const INFO: [[(f64, f64); 2]; 2] = [[(0.5, 0.20), (0.5, 0.26)], [(0.5, 0.42), (0.5, 0.82)]];

/// Map unit-square points into `frame`
pub fn map_polyline(points: &[(f64, f64)], frame: Rect) -> Vec<Point> {
    points
        .iter()
        .map(|&(x, y)| frame.map_unit(Point::new(x, y)))
        .collect()
}

/// End angle of a determinate arc.
///
/// Progress is not clamped; values outside 0..=1 under- or over-sweep.
pub fn progress_end_angle(progress: f64) -> f64 {
    ARC_START + TAU * progress
}

/// Paint the HUD
pub fn paint(
    config: &HudConfig,
    layout: &HudLayout,
    state: &HudState,
    spinner: Option<&SpinnerEngine>,
    alpha: f64,
    now: Instant,
) -> Frame {
    let mut commands = Vec::new();
    let fg = config.style.foreground();

    paint_mask(config.mask, layout.host, &mut commands);

    commands.push(DrawCmd::FillRoundedRect {
        rect: layout.hud_box,
        radius: config.corner_radius,
        color: config.style.background().fade(config.opacity),
    });

    if let Some(frame) = layout.indicator {
        match &state.mode {
            HudMode::Indeterminate => {
                if let Some(engine) = spinner {
                    paint_spinner(engine, frame.center(), now, &mut commands);
                }
            }
            HudMode::Determinate(progress) => {
                paint_ring(config, frame, *progress, fg, &mut commands);
            }
            HudMode::Success => {
                commands.push(DrawCmd::StrokePolyline {
                    points: map_polyline(&CHECKMARK, glyph_frame(config, frame)),
                    width: config.ring_thickness,
                    color: fg,
                });
            }
            HudMode::Error => {
                for stroke in CROSS {
                    commands.push(DrawCmd::StrokePolyline {
                        points: map_polyline(&stroke, glyph_frame(config, frame)),
                        width: config.ring_thickness,
                        color: fg,
                    });
                }
            }
            HudMode::Info => {
                for stroke in INFO {
                    commands.push(DrawCmd::StrokePolyline {
                        points: map_polyline(&stroke, glyph_frame(config, frame)),
                        width: config.ring_thickness,
                        color: fg,
                    });
                }
            }
            HudMode::Custom(view) => {
                commands.push(DrawCmd::CustomView { id: view.id, frame });
            }
        }
    }

    if let Some(rect) = layout.status {
        commands.push(DrawCmd::Text {
            rect,
            text: state.status.clone(),
            font: config.font.clone(),
            color: fg,
        });
    }

    Frame {
        alpha,
        bounds: layout.host,
        commands,
    }
}

fn paint_mask(mask: MaskType, host: Rect, commands: &mut Vec<DrawCmd>) {
    match mask {
        // Clear still blocks clicks but has nothing to draw
        MaskType::None | MaskType::Clear => {}
        MaskType::Black => commands.push(DrawCmd::FillRect {
            rect: host,
            color: MaskType::DIM,
        }),
        MaskType::Gradient => commands.push(DrawCmd::RadialGradient {
            rect: host,
            center: host.center(),
            radius: host.width.max(host.height) / 2.0,
            inner: Color::TRANSPARENT,
            outer: MaskType::DIM,
        }),
        MaskType::Custom(color) => commands.push(DrawCmd::FillRect { rect: host, color }),
    }
}

fn paint_spinner(engine: &SpinnerEngine, center: Point, now: Instant, commands: &mut Vec<DrawCmd>) {
    let geometry = engine.geometry();
    let opacities = engine.opacities(now);
    for fin in engine.fins() {
        commands.push(DrawCmd::Fin {
            center,
            angle: fin.angle,
            bounds: geometry.bounds(),
            corner_radius: geometry.corner_radius,
            color: engine.color().fade(opacities[fin.index]),
        });
    }
}

fn paint_ring(config: &HudConfig, frame: Rect, progress: f64, fg: Color, commands: &mut Vec<DrawCmd>) {
    let center = frame.center();
    let radius = ((frame.width.min(frame.height) - config.ring_thickness) / 2.0).max(0.0);

    commands.push(DrawCmd::StrokeArc {
        center,
        radius,
        start_angle: 0.0,
        end_angle: TAU,
        width: config.ring_thickness,
        color: fg.fade(0.1),
    });
    commands.push(DrawCmd::StrokeArc {
        center,
        radius,
        start_angle: ARC_START,
        end_angle: progress_end_angle(progress),
        width: config.ring_thickness,
        color: fg,
    });
}

/// Glyph polylines are inset so their strokes stay inside the indicator frame
fn glyph_frame(config: &HudConfig, frame: Rect) -> Rect {
    frame.inset(config.ring_thickness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::layout::layout;
    use crate::style::HudStyle;

    fn state(mode: HudMode, status: &str) -> HudState {
        HudState {
            mode,
            status: status.to_string(),
            ..Default::default()
        }
    }

    fn host() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 300.0)
    }

    fn paint_mode(config: &HudConfig, mode: HudMode) -> Frame {
        let l = layout(config, host(), Some(Size::square(60.0)), Size::ZERO);
        paint(config, &l, &state(mode, ""), None, 1.0, Instant::now())
    }

    fn arcs(frame: &Frame) -> Vec<(f64, f64)> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::StrokeArc {
                    start_angle,
                    end_angle,
                    ..
                } => Some((*start_angle, *end_angle)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_determinate_arc_sweep() {
        let frame = paint_mode(&HudConfig::default(), HudMode::Determinate(0.37));
        let arcs = arcs(&frame);
        assert_eq!(arcs.len(), 2);
        let (start, end) = arcs[1];
        assert_eq!(start, ARC_START);
        assert!(((end - start) - 0.37 * TAU).abs() < 1e-9);
    }

    #[test]
    fn test_full_progress_closes_ring() {
        let frame = paint_mode(&HudConfig::default(), HudMode::Determinate(1.0));
        let (start, end) = arcs(&frame)[1];
        assert!(((end - start) - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_progress_is_not_rejected() {
        assert!(progress_end_angle(1.5) - ARC_START > TAU);
        assert!(progress_end_angle(-0.1) < ARC_START);
    }

    #[test]
    fn test_box_uses_background_at_opacity() {
        let config = HudConfig::default()
            .with_style(HudStyle::Dark)
            .with_opacity(0.5);
        let frame = paint_mode(&config, HudMode::Success);
        let color = frame.commands.iter().find_map(|c| match c {
            DrawCmd::FillRoundedRect { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(color, Some(Color::BLACK.with_alpha(0.5)));
    }

    #[test]
    fn test_mask_variants() {
        let none = paint_mode(&HudConfig::default(), HudMode::Info);
        assert!(matches!(none.commands[0], DrawCmd::FillRoundedRect { .. }));

        let clear = paint_mode(&HudConfig::default().with_mask(MaskType::Clear), HudMode::Info);
        assert!(matches!(clear.commands[0], DrawCmd::FillRoundedRect { .. }));

        let black = paint_mode(&HudConfig::default().with_mask(MaskType::Black), HudMode::Info);
        assert!(matches!(black.commands[0], DrawCmd::FillRect { rect, .. } if rect == host()));

        let gradient = paint_mode(&HudConfig::default().with_mask(MaskType::Gradient), HudMode::Info);
        match &gradient.commands[0] {
            DrawCmd::RadialGradient { inner, outer, .. } => {
                assert_eq!(inner.a, 0.0);
                assert!(outer.a > 0.0);
            }
            other => panic!("expected gradient, got {:?}", other),
        }
    }

    #[test]
    fn test_checkmark_maps_into_glyph_frame() {
        let config = HudConfig::default();
        let l = layout(&config, host(), Some(Size::square(60.0)), Size::ZERO);
        let frame = paint(&config, &l, &state(HudMode::Success, ""), None, 1.0, Instant::now());
        let points = frame
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCmd::StrokePolyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(points.len(), 3);
        let glyph = l.indicator.unwrap().inset(config.ring_thickness);
        for p in points {
            assert!(glyph.contains(p));
        }
    }

    #[test]
    fn test_error_draws_two_strokes() {
        let frame = paint_mode(&HudConfig::default(), HudMode::Error);
        let strokes = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::StrokePolyline { .. }))
            .count();
        assert_eq!(strokes, 2);
    }

    #[test]
    fn test_spinner_paints_every_fin() {
        let config = HudConfig::default();
        let engine = SpinnerEngine::new(60.0, Color::BLACK);
        let l = layout(&config, host(), Some(Size::square(60.0)), Size::ZERO);
        let frame = paint(
            &config,
            &l,
            &state(HudMode::Indeterminate, ""),
            Some(&engine),
            1.0,
            Instant::now(),
        );
        let fins = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Fin { .. }))
            .count();
        assert_eq!(fins, crate::spinner::FIN_COUNT);
    }

    #[test]
    fn test_status_text_drawn_last() {
        let config = HudConfig::default();
        let l = layout(&config, host(), None, Size::new(80.0, 18.0));
        let frame = paint(&config, &l, &state(HudMode::Info, "Saved"), None, 1.0, Instant::now());
        match frame.commands.last() {
            Some(DrawCmd::Text { text, .. }) => assert_eq!(text, "Saved"),
            other => panic!("expected text, got {:?}", other),
        }
    }
}
