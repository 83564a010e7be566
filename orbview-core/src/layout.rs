//! Viewport rectangles and their projections.
//!
//! [`ViewLayout::compute`] is the only way to build a layout, so rectangles and
//! projections are always derived together from one canvas size.

use std::fmt;

use crate::config::ViewerConfig;
use crate::projection::Projection;

/// Render target within the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Normal,
    Left,
    Right,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::Normal, ViewId::Left, ViewId::Right];

    fn index(self) -> usize {
        match self {
            ViewId::Normal => 0,
            ViewId::Left => 1,
            ViewId::Right => 2,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewId::Normal => "normal",
            ViewId::Left => "left",
            ViewId::Right => "right",
        })
    }
}

/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// The three view rectangles of a canvas plus one projection per rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct ViewLayout {
    rects: [ViewRect; 3],
    projections: [Projection; 3],
}

impl ViewLayout {
    /// Derive the layout for a `width` x `height` canvas; both are clamped to at least 1.
    pub fn compute(width: u32, height: u32, config: &ViewerConfig) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let half = width / 2;

        let rects = [
            ViewRect::new(0, 0, width, height),
            ViewRect::new(0, 0, half, height),
            ViewRect::new(half, 0, width - half, height),
        ];
        let projections = rects.map(|rect| Projection::for_rect(&rect, config));

        Self { rects, projections }
    }

    pub fn rect(&self, view: ViewId) -> ViewRect {
        self.rects[view.index()]
    }

    pub fn projection(&self, view: ViewId) -> &Projection {
        &self.projections[view.index()]
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        let normal = self.rect(ViewId::Normal);
        (normal.width, normal.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_800_by_600() {
        let layout = ViewLayout::compute(800, 600, &ViewerConfig::default());
        assert_eq!(layout.rect(ViewId::Normal), ViewRect::new(0, 0, 800, 600));
        assert_eq!(layout.rect(ViewId::Left), ViewRect::new(0, 0, 400, 600));
        assert_eq!(layout.rect(ViewId::Right), ViewRect::new(400, 0, 400, 600));

        for view in [ViewId::Left, ViewId::Right] {
            let projection = layout.projection(view);
            assert!((projection.aspect - 400.0 / 600.0).abs() < 1e-6);
            assert!((projection.fovy - 45f32.to_radians()).abs() < 1e-6);
            assert_eq!(projection.near, 0.1);
            assert_eq!(projection.far, 200.0);
        }
    }

    #[test]
    fn test_half_widths_sum_to_full_width() {
        let config = ViewerConfig::default();
        for width in [1, 2, 3, 799, 800, 1921] {
            for height in [1, 7, 600] {
                let layout = ViewLayout::compute(width, height, &config);
                let left = layout.rect(ViewId::Left);
                let right = layout.rect(ViewId::Right);
                let normal = layout.rect(ViewId::Normal);
                assert_eq!(left.width + right.width, normal.width);
                assert_eq!(right.x, left.width);
                assert!(ViewId::ALL.iter().all(|&v| layout.rect(v).height == height));
            }
        }
    }

    #[test]
    fn test_degenerate_size_is_clamped() {
        let layout = ViewLayout::compute(0, 0, &ViewerConfig::default());
        assert_eq!(layout.canvas_size(), (1, 1));
        for view in ViewId::ALL {
            assert!(layout.projection(view).matrix.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_view_id_display() {
        assert_eq!(ViewId::Right.to_string(), "right");
    }
}
