//! Geometry primitives and shape-path math.
//!
//! Pure functions shared by the canvas controller (pointer deltas), the
//! style resolver (clip polygons), and the raster exporter (mask paths,
//! centered placement). Nothing here touches the layer model.

use std::fmt;

/// A point in container-local coordinates (origin = container top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The delta vector from `other` to `self`.
    pub fn delta_from(&self, other: Point) -> Vec2 {
        Vec2 {
            dx: self.x - other.x,
            dy: self.y - other.y,
        }
    }
}

/// A 2D displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub dx: f32,
    pub dy: f32,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Scales percent-space polygon points (0–100 per axis) to absolute pixels.
pub fn scale_percent_points(points: &[(f32, f32)], width: u32, height: u32) -> Vec<(f32, f32)> {
    points
        .iter()
        .map(|&(px, py)| (px / 100.0 * width as f32, py / 100.0 * height as f32))
        .collect()
}

/// Builds an SVG path `d` attribute from absolute polygon points.
pub fn polygon_path(points: &[(f32, f32)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd} {x} {y} "));
    }
    d.push('Z');
    d
}

/// SVG element for an ellipse filling a `width`×`height` box.
pub fn ellipse_element(width: u32, height: u32) -> String {
    let rx = width as f32 / 2.0;
    let ry = height as f32 / 2.0;
    format!(r#"<ellipse cx="{rx}" cy="{ry}" rx="{rx}" ry="{ry}" fill="#ffffff"/>"#)
}

/// SVG element for a rounded rectangle filling a `width`×`height` box.
///
/// The radius is clamped so opposing corners never overlap.
pub fn rounded_rect_element(width: u32, height: u32, radius: u32) -> String {
    let max_r = width.min(height) / 2;
    let r = radius.min(max_r);
    format!(r#"<rect x="0" y="0" width="{width}" height="{height}" rx="{r}" ry="{r}" fill="#ffffff"/>"#)
}

/// Top-left corner at which a `size`×`size` box sits centered in the container.
pub fn centered_box(container_width: u32, container_height: u32, size: u32) -> (i32, i32) {
    (
        (container_width as i32 - size as i32) / 2,
        (container_height as i32 - size as i32) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_new_minus_last() {
        let last = Point::new(10.0, 20.0);
        let now = Point::new(13.0, 19.0);
        let d = now.delta_from(last);
        assert_eq!(d.dx, 3.0);
        assert_eq!(d.dy, -1.0);
    }

    #[test]
    fn percent_points_scale_to_pixels() {
        let tri = [(50.0, 0.0), (0.0, 100.0), (100.0, 100.0)];
        let abs = scale_percent_points(&tri, 400, 200);
        assert_eq!(abs, vec![(200.0, 0.0), (0.0, 200.0), (400.0, 200.0)]);
    }

    #[test]
    fn polygon_path_closes() {
        let d = polygon_path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(d.starts_with("M 0 0 "));
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn centered_box_positions() {
        assert_eq!(centered_box(400, 400, 200), (100, 100));
        // Oversized boxes go negative rather than clamping; compositing crops.
        assert_eq!(centered_box(100, 100, 200), (-50, -50));
    }

    #[test]
    fn rounded_rect_clamps_radius() {
        let el = rounded_rect_element(100, 60, 500);
        assert!(el.contains(r#"rx="30""#));
    }
}
