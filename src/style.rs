//! Pure derivation from snapshot state to renderable visual parameters.
//!
//! The resolver is the contract that keeps the live preview and the export
//! engine in agreement: both consume the same [`ContainerStyle`],
//! [`TextStyle`], and [`IconTreatment`] values, and the functions here are
//! pure: resolving the same snapshot twice yields identical outputs.
//!
//! # Shape table
//!
//! | Shape            | Clip                     | Radius        |
//! |------------------|--------------------------|---------------|
//! | circle, oval     | -                        | 50%           |
//! | rounded          | -                        | 40 px         |
//! | square, rectangle| -                        | 0 px          |
//! | triangle         | 3-point polygon          | 0 px          |
//! | hexagon          | 6-point symmetric polygon| 0 px          |
//! | none             | -                        | `corner_radius` verbatim |

use std::fmt;

use crate::color::Color;
use crate::design::{Container, IconLayer, Shape, TextAlign, TextLayer};
use crate::geometry::scale_percent_points;

/// Triangle clip: apex top-center, base corners. Percent space.
pub const TRIANGLE_POINTS: [(f32, f32); 3] = [(50.0, 0.0), (0.0, 100.0), (100.0, 100.0)];

/// Hexagon clip: six symmetric points. Percent space.
pub const HEXAGON_POINTS: [(f32, f32); 6] = [
    (25.0, 0.0),
    (75.0, 0.0),
    (100.0, 50.0),
    (75.0, 100.0),
    (25.0, 100.0),
    (0.0, 50.0),
];

// ============================================================================
// Container style
// ============================================================================

/// Corner rounding for the container box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radius {
    /// Percentage of the box (50% = full round).
    Percent(u8),
    /// Absolute pixels.
    Px(u32),
}

/// Resolved rendering parameters for a container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStyle {
    /// Polygonal clip in percent space, when the shape needs one.
    pub clip: Option<&'static [(f32, f32)]>,
    /// Corner rounding applied when there is no polygonal clip.
    pub radius: Radius,
}

impl ContainerStyle {
    /// The CSS-style clip-path expression, when a polygonal clip applies.
    pub fn clip_path_expression(&self) -> Option<String> {
        let points = self.clip?;
        let parts: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{x:.0}% {y:.0}%"))
            .collect();
        Some(format!("polygon({})", parts.join(", ")))
    }

    /// The clip polygon scaled to absolute pixels for a given box.
    pub fn clip_points(&self, width: u32, height: u32) -> Option<Vec<(f32, f32)>> {
        self.clip.map(|p| scale_percent_points(p, width, height))
    }

    /// True when the style clips nothing (the full rectangle shows).
    pub fn is_unclipped(&self) -> bool {
        self.clip.is_none() && self.radius == Radius::Px(0)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Radius::Percent(p) => write!(f, "{p}%"),
            Radius::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// Resolves the clip/radius pair for a container.
pub fn resolve_container(container: &Container) -> ContainerStyle {
    let (clip, radius): (Option<&'static [(f32, f32)]>, Radius) = match container.shape {
        Shape::Circle | Shape::Oval => (None, Radius::Percent(50)),
        Shape::Rounded => (None, Radius::Px(40)),
        Shape::Square | Shape::Rectangle => (None, Radius::Px(0)),
        Shape::Triangle => (Some(&TRIANGLE_POINTS), Radius::Px(0)),
        Shape::Hexagon => (Some(&HEXAGON_POINTS), Radius::Px(0)),
        Shape::None => (None, Radius::Px(container.corner_radius)),
    };
    ContainerStyle { clip, radius }
}

// ============================================================================
// Text style
// ============================================================================

/// Resolved screen transform for a text layer.
///
/// Translation and rotation compose in that order (translate to the layer
/// center first, then rotate) so rotation pivots around the layer's own
/// center rather than the container origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextTransform {
    pub translate: (f32, f32),
    pub rotate_deg: f32,
}

impl TextTransform {
    /// SVG transform attribute value.
    pub fn svg(&self) -> String {
        let (x, y) = self.translate;
        if self.rotate_deg == 0.0 {
            format!("translate({x} {y})")
        } else {
            format!("translate({x} {y}) rotate({})", self.rotate_deg)
        }
    }
}

/// Resolved rendering parameters for a text layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub transform: TextTransform,
    /// SVG text-anchor keyword for the layer's alignment.
    pub anchor: &'static str,
}

/// Resolves the screen transform and anchor for a text layer.
pub fn resolve_text(layer: &TextLayer) -> TextStyle {
    TextStyle {
        transform: TextTransform {
            translate: (layer.x, layer.y),
            rotate_deg: layer.rotation as f32,
        },
        anchor: match layer.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        },
    }
}

// ============================================================================
// Icon treatment
// ============================================================================

/// How the icon bitmap is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconTreatment {
    /// The source image renders unmodified.
    Original,
    /// A solid-color silhouette: the source alpha channel masks a flat fill,
    /// and the image's own colors are not shown.
    Silhouette(Color),
}

/// Resolves the render treatment for the icon layer.
pub fn resolve_icon(icon: &IconLayer) -> IconTreatment {
    if icon.tint {
        IconTreatment::Silhouette(icon.tint_color)
    } else {
        IconTreatment::Original
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{ContainerPatch, DesignSnapshot, TextLayerPatch};

    #[test]
    fn resolve_is_idempotent() {
        let mut design = DesignSnapshot::default();
        design.update_container(ContainerPatch::new().shape(Shape::Hexagon));
        let id = design.add_text_layer(TextLayerPatch::new().rotation(45));

        let c1 = resolve_container(&design.container);
        let c2 = resolve_container(&design.container);
        assert_eq!(c1, c2);

        let layer = design.text_layer(id).unwrap();
        assert_eq!(resolve_text(layer), resolve_text(layer));
    }

    #[test]
    fn shape_table_matches_fixed_mapping() {
        let style = |shape| {
            let c = Container {
                shape,
                corner_radius: 12,
                ..Container::default()
            };
            resolve_container(&c)
        };

        assert_eq!(style(Shape::Circle).radius, Radius::Percent(50));
        assert_eq!(style(Shape::Oval).radius, Radius::Percent(50));
        assert_eq!(style(Shape::Rounded).radius, Radius::Px(40));
        assert_eq!(style(Shape::Square).radius, Radius::Px(0));
        assert_eq!(style(Shape::Rectangle).radius, Radius::Px(0));
        // `none` passes the stored corner radius through verbatim.
        assert_eq!(style(Shape::None).radius, Radius::Px(12));

        assert_eq!(style(Shape::Triangle).clip, Some(&TRIANGLE_POINTS[..]));
        assert_eq!(style(Shape::Hexagon).clip, Some(&HEXAGON_POINTS[..]));
        assert_eq!(style(Shape::Circle).clip, None);
    }

    #[test]
    fn clip_path_expression_formats_polygon() {
        let c = Container {
            shape: Shape::Triangle,
            ..Container::default()
        };
        assert_eq!(
            resolve_container(&c).clip_path_expression().unwrap(),
            "polygon(50% 0%, 0% 100%, 100% 100%)"
        );
    }

    #[test]
    fn text_transform_translates_then_rotates() {
        let mut design = DesignSnapshot::default();
        let id = design.add_text_layer(TextLayerPatch::new().position(200.0, 280.0).rotation(30));
        let style = resolve_text(design.text_layer(id).unwrap());

        assert_eq!(style.transform.translate, (200.0, 280.0));
        assert_eq!(style.transform.rotate_deg, 30.0);
        assert_eq!(style.transform.svg(), "translate(200 280) rotate(30)");
    }

    #[test]
    fn zero_rotation_omits_rotate() {
        let t = TextTransform {
            translate: (10.0, 20.0),
            rotate_deg: 0.0,
        };
        assert_eq!(t.svg(), "translate(10 20)");
    }

    #[test]
    fn tint_resolves_to_silhouette() {
        let mut icon = IconLayer::default();
        assert_eq!(resolve_icon(&icon), IconTreatment::Original);
        icon.tint = true;
        icon.tint_color = Color::Rgb(0xd4, 0xaf, 0x37);
        assert_eq!(
            resolve_icon(&icon),
            IconTreatment::Silhouette(Color::Rgb(0xd4, 0xaf, 0x37))
        );
    }
}
