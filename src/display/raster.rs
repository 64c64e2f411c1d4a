//! Frame rasteriser for character cells
//!
//! Samples every draw command at the center of each cell. A cell stands for
//! `CELL_WIDTH` x `CELL_HEIGHT` surface units, so a terminal of 80x24 cells is
//! a 640x384 surface.

use std::f64::consts::TAU;

use crate::geometry::{Point, Rect};
use crate::paint::{DrawCmd, Frame};
use crate::style::Color;

use super::buffer::{char_width, CellBuffer};

pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

const SOLID: char = '█';
const CUSTOM: char = '▒';

/// Surface rect covered by a buffer of `cols` x `rows` cells
pub fn surface_for(cols: u16, rows: u16) -> Rect {
    Rect::new(0.0, 0.0, cols as f64 * CELL_WIDTH, rows as f64 * CELL_HEIGHT)
}

fn cell_center(x: u16, y: u16) -> Point {
    Point::new(
        (x as f64 + 0.5) * CELL_WIDTH,
        (y as f64 + 0.5) * CELL_HEIGHT,
    )
}

/// Cells whose centers may fall inside `rect`
fn cells_in(rect: Rect, buf: &CellBuffer) -> impl Iterator<Item = (u16, u16)> {
    let clamp_x = |v: f64| v.clamp(0.0, buf.width() as f64) as u16;
    let clamp_y = |v: f64| v.clamp(0.0, buf.height() as f64) as u16;
    let x0 = clamp_x((rect.x / CELL_WIDTH).floor());
    let x1 = clamp_x((rect.right() / CELL_WIDTH).ceil());
    let y0 = clamp_y((rect.y / CELL_HEIGHT).floor());
    let y1 = clamp_y((rect.bottom() / CELL_HEIGHT).ceil());
    (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
}

/// Draw `frame` into `buf`
pub fn rasterize(frame: &Frame, buf: &mut CellBuffer) {
    let alpha = frame.alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    for cmd in &frame.commands {
        draw(cmd, alpha, buf);
    }
}

fn draw(cmd: &DrawCmd, alpha: f64, buf: &mut CellBuffer) {
    match cmd {
        DrawCmd::FillRect { rect, color } => {
            for (x, y) in cells_in(*rect, buf) {
                if rect.contains(cell_center(x, y)) {
                    buf.fill(x, y, color.fade(alpha));
                }
            }
        }
        DrawCmd::RadialGradient {
            rect,
            center,
            radius,
            inner,
            outer,
        } => {
            for (x, y) in cells_in(*rect, buf) {
                let p = cell_center(x, y);
                if !rect.contains(p) {
                    continue;
                }
                let t = if *radius > 0.0 {
                    (distance(p, *center) / radius).min(1.0)
                } else {
                    1.0
                };
                buf.fill(x, y, lerp(*inner, *outer, t).fade(alpha));
            }
        }
        DrawCmd::FillRoundedRect {
            rect,
            radius,
            color,
        } => {
            for (x, y) in cells_in(*rect, buf) {
                if in_rounded_rect(cell_center(x, y), *rect, *radius) {
                    buf.fill(x, y, color.fade(alpha));
                }
            }
        }
        DrawCmd::StrokeArc {
            center,
            radius,
            start_angle,
            end_angle,
            width,
            color,
        } => {
            let reach = radius + width / 2.0 + CELL_HEIGHT;
            let area = Rect::new(center.x - reach, center.y - reach, reach * 2.0, reach * 2.0);
            for (x, y) in cells_in(area, buf) {
                let p = cell_center(x, y);
                if on_ring(p, *center, *radius, *width)
                    && in_sweep(angle_of(p, *center), *start_angle, *end_angle)
                {
                    buf.put(x, y, SOLID, color.fade(alpha));
                }
            }
        }
        DrawCmd::StrokePolyline {
            points,
            width,
            color,
        } => {
            let Some(area) = bounding_rect(points, *width + CELL_HEIGHT) else {
                return;
            };
            for (x, y) in cells_in(area, buf) {
                let p = cell_center(x, y);
                let hit = points
                    .windows(2)
                    .any(|seg| segment_distance(p, seg[0], seg[1]) <= stroke_reach(*width));
                if hit {
                    buf.put(x, y, SOLID, color.fade(alpha));
                }
            }
        }
        DrawCmd::Fin {
            center,
            angle,
            bounds,
            corner_radius,
            color,
        } => {
            if color.a <= 0.0 {
                return;
            }
            let reach = bounds.x.abs().max(bounds.right().abs()) + bounds.y.abs().max(bounds.bottom().abs());
            let area = Rect::new(center.x - reach, center.y - reach, reach * 2.0, reach * 2.0);
            for (x, y) in cells_in(area, buf) {
                let local = unrotate(cell_center(x, y), *center, *angle);
                // Fins are thinner than a cell; widen the hit area to one cell
                let hit_rect = Rect::new(
                    bounds.x.min(-CELL_WIDTH / 2.0),
                    bounds.y,
                    bounds.width.max(CELL_WIDTH),
                    bounds.height,
                );
                if in_rounded_rect(local, hit_rect, *corner_radius) {
                    buf.put(x, y, SOLID, color.fade(alpha));
                }
            }
        }
        DrawCmd::Text {
            rect, text, color, ..
        } => draw_text(*rect, text, color.fade(alpha), buf),
        DrawCmd::CustomView { frame, .. } => {
            for (x, y) in cells_in(*frame, buf) {
                if frame.contains(cell_center(x, y)) {
                    buf.put(x, y, CUSTOM, Color::WHITE.fade(alpha * 0.5));
                }
            }
        }
    }
}

fn draw_text(rect: Rect, text: &str, color: Color, buf: &mut CellBuffer) {
    let col = to_cell(rect.x / CELL_WIDTH);
    let cols = to_cell(rect.width / CELL_WIDTH).max(1);
    let row = to_cell(rect.y / CELL_HEIGHT);
    let rows = to_cell(rect.height / CELL_HEIGHT).max(1);

    for (i, (line, width)) in wrap(text, cols).into_iter().take(rows as usize).enumerate() {
        // Center short lines within the text rect
        let pad = (cols - width) / 2;
        let y = row.saturating_add(u16::try_from(i).unwrap_or(u16::MAX));
        buf.print(col.saturating_add(pad), y, col.saturating_add(cols), &line, color);
    }
}

/// Surface units to a whole cell index, clamped to the u16 range
fn to_cell(v: f64) -> u16 {
    v.round().clamp(0.0, u16::MAX as f64) as u16
}

/// Break `text` into lines at most `cols` display columns wide
fn wrap(text: &str, cols: u16) -> Vec<(String, u16)> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0u16;
    for ch in text.chars() {
        let w = char_width(ch);
        if w > cols {
            continue;
        }
        if width.saturating_add(w) > cols {
            lines.push((std::mem::take(&mut line), width));
            width = 0;
        }
        line.push(ch);
        width += w;
    }
    if !line.is_empty() {
        lines.push((line, width));
    }
    lines
}

fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn lerp(a: Color, b: Color, t: f64) -> Color {
    Color::rgba(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

/// Strokes narrower than a cell still light the cells they pass through
fn stroke_reach(width: f64) -> f64 {
    (width / 2.0).max(CELL_WIDTH / 2.0)
}

fn on_ring(p: Point, center: Point, radius: f64, width: f64) -> bool {
    (distance(p, center) - radius).abs() <= stroke_reach(width)
}

/// Clockwise angle of `p` around `center`, y-down
fn angle_of(p: Point, center: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Whether `angle` lies on the clockwise sweep from `start` to `end`
fn in_sweep(angle: f64, start: f64, end: f64) -> bool {
    let sweep = end - start;
    if sweep >= TAU {
        return true;
    }
    if sweep <= 0.0 {
        return false;
    }
    (angle - start).rem_euclid(TAU) <= sweep
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

fn bounding_rect(points: &[Point], pad: f64) -> Option<Rect> {
    let first = points.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in points {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    Some(Rect::new(x0 - pad, y0 - pad, x1 - x0 + pad * 2.0, y1 - y0 + pad * 2.0))
}

/// Rotate `p` about `center` by `-angle`, relative to `center`
fn unrotate(p: Point, center: Point, angle: f64) -> Point {
    let theta = -angle;
    let (dx, dy) = (p.x - center.x, p.y - center.y);
    let (sin, cos) = theta.sin_cos();
    Point::new(dx * cos - dy * sin, dx * sin + dy * cos)
}

fn in_rounded_rect(p: Point, rect: Rect, radius: f64) -> bool {
    if p.x < rect.x || p.x > rect.right() || p.y < rect.y || p.y > rect.bottom() {
        return false;
    }
    let r = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
    if r == 0.0 {
        return true;
    }
    let cx = p.x.clamp(rect.x + r, rect.right() - r);
    let cy = p.y.clamp(rect.y + r, rect.bottom() - r);
    distance(p, Point::new(cx, cy)) <= r
}
