//! Box layout
//!
//! Stacks the indicator (or custom view) above the status text, wraps them in
//! a margin, optionally squares the box, and centers it in the host with a
//! position-dependent vertical bias.
//!
//! # Rules
//!
//! - Only non-empty elements take part; padding separates consecutive
//!   elements and an absent element contributes no padding
//! - Each element is centered horizontally in the box
//! - Square mode uses the larger side, but only when that square still fits
//!   inside the host minus a margin on every side
//! - The box is never anchored to an edge: top/bottom shift it by a fifth of
//!   the host height

use tracing::trace;

use crate::config::HudConfig;
use crate::geometry::{Point, Rect, Size};

/// Resolved frames of everything the HUD draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudLayout {
    /// Bounds of the host surface (and the mask)
    pub host: Rect,
    /// The rounded content box
    pub hud_box: Rect,
    /// Indicator, glyph or custom view frame
    pub indicator: Option<Rect>,
    /// Status text frame
    pub status: Option<Rect>,
}

/// Width available to the status text inside a host of `host_width`
pub fn text_max_width(config: &HudConfig, host_width: f64) -> f64 {
    (host_width - 4.0 * config.margin).max(0.0)
}

/// Box size after square forcing.
///
/// `natural` is the box size including margins. The square side is the larger
/// of the two dimensions; if it does not fit the host minus `margin` on both
/// axes the natural size is kept.
pub fn square_box(natural: Size, host: Size, margin: f64) -> Size {
    let side = natural.width.max(natural.height);
    let fits = side <= host.width - 2.0 * margin && side <= host.height - 2.0 * margin;
    if fits {
        Size::square(side)
    } else {
        natural
    }
}

/// Lay out the HUD inside `host`.
///
/// `indicator` is the size of the indicator or custom view (None when the mode
/// shows nothing there); `status` is the measured status text (zero when the
/// text is empty).
pub fn layout(config: &HudConfig, host: Rect, indicator: Option<Size>, status: Size) -> HudLayout {
    let elements: Vec<(Slot, Size)> = [
        indicator.map(|s| (Slot::Indicator, s)),
        Some((Slot::Status, status)),
    ]
    .into_iter()
    .flatten()
    .filter(|(_, size)| !size.is_empty())
    .collect();

    let content_width = elements.iter().map(|(_, s)| s.width).fold(0.0, f64::max);
    let gaps = elements.len().saturating_sub(1) as f64;
    let content_height = elements.iter().map(|(_, s)| s.height).sum::<f64>() + gaps * config.padding;

    let natural = Size::new(
        content_width + 2.0 * config.margin,
        content_height + 2.0 * config.margin,
    );
    let box_size = if config.square {
        square_box(natural, host.size(), config.margin)
    } else {
        natural
    };

    let offset = config.position.offset(host.height);
    let center = Point::new(host.center().x + offset.x, host.center().y + offset.y);
    let hud_box = Rect::centered_at(center, box_size);

    // Content is vertically centered so a squared box keeps it in the middle
    let mut y = hud_box.y + (hud_box.height - content_height) / 2.0;
    let mut result = HudLayout {
        host,
        hud_box,
        indicator: None,
        status: None,
    };
    for (slot, size) in elements {
        let frame = Rect::new(
            hud_box.x + (hud_box.width - size.width) / 2.0,
            y,
            size.width,
            size.height,
        );
        match slot {
            Slot::Indicator => result.indicator = Some(frame),
            Slot::Status => result.status = Some(frame),
        }
        y += size.height + config.padding;
    }

    trace!(?result, "hud layout");
    result
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Indicator,
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Position;

    fn config() -> HudConfig {
        HudConfig::default().with_margin(20.0).with_padding(10.0)
    }

    fn host() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 400.0)
    }

    #[test]
    fn test_square_box_fits() {
        let size = square_box(Size::new(200.0, 80.0), Size::new(400.0, 400.0), 20.0);
        assert_eq!(size, Size::square(200.0));
    }

    #[test]
    fn test_square_box_falls_back_when_too_big() {
        // 380 > 400 - 2*20 = 360 on the height axis
        let size = square_box(Size::new(380.0, 80.0), Size::new(400.0, 400.0), 20.0);
        assert_eq!(size, Size::new(380.0, 80.0));

        // exactly at the limit still fits
        let size = square_box(Size::new(360.0, 80.0), Size::new(400.0, 400.0), 20.0);
        assert_eq!(size, Size::square(360.0));
    }

    #[test]
    fn test_indicator_and_status_stack_with_padding() {
        let l = layout(
            &config(),
            host(),
            Some(Size::square(60.0)),
            Size::new(100.0, 20.0),
        );
        // 60 + 10 + 20 content, 100 wide, 20 margin each side
        assert_eq!(l.hud_box.size(), Size::new(140.0, 130.0));
        let ind = l.indicator.unwrap();
        let status = l.status.unwrap();
        assert_eq!(ind.y, l.hud_box.y + 20.0);
        assert_eq!(status.y, ind.bottom() + 10.0);
        assert_eq!(ind.center().x, l.hud_box.center().x);
        assert_eq!(status.center().x, l.hud_box.center().x);
    }

    #[test]
    fn test_empty_status_contributes_nothing() {
        let l = layout(&config(), host(), Some(Size::square(60.0)), Size::ZERO);
        assert!(l.status.is_none());
        assert_eq!(l.hud_box.size(), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_status_only() {
        let l = layout(&config(), host(), None, Size::new(80.0, 20.0));
        assert!(l.indicator.is_none());
        assert_eq!(l.hud_box.size(), Size::new(120.0, 60.0));
    }

    #[test]
    fn test_box_centered_in_host() {
        let l = layout(&config(), host(), Some(Size::square(60.0)), Size::ZERO);
        assert_eq!(l.hud_box.center(), Point::new(200.0, 200.0));
    }

    #[test]
    fn test_position_bias() {
        let top = layout(
            &config().with_position(Position::Top),
            host(),
            Some(Size::square(60.0)),
            Size::ZERO,
        );
        assert_eq!(top.hud_box.center().y, 200.0 - 80.0);

        let bottom = layout(
            &config().with_position(Position::Bottom),
            host(),
            Some(Size::square(60.0)),
            Size::ZERO,
        );
        assert_eq!(bottom.hud_box.center().y, 200.0 + 80.0);
    }

    #[test]
    fn test_square_layout_centers_content() {
        let l = layout(
            &config().with_square(true),
            host(),
            Some(Size::square(40.0)),
            Size::new(160.0, 20.0),
        );
        // natural 200 x 130 -> square 200
        assert_eq!(l.hud_box.size(), Size::square(200.0));
        let ind = l.indicator.unwrap();
        let status = l.status.unwrap();
        let top_gap = ind.y - l.hud_box.y;
        let bottom_gap = l.hud_box.bottom() - status.bottom();
        assert!((top_gap - bottom_gap).abs() < 1e-9);
    }

    #[test]
    fn test_text_max_width() {
        assert_eq!(text_max_width(&config(), 400.0), 320.0);
        assert_eq!(text_max_width(&config(), 50.0), 0.0);
    }
}
