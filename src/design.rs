//! The layer model for one logo composition.
//!
//! A [`DesignSnapshot`] is the complete, persistable state of a design: the
//! shaped [`Container`], an optional [`IconLayer`], and an ordered list of
//! [`TextLayer`]s (order = creation order = paint order). The snapshot is
//! mutated in place through typed patch operations: there is no raw
//! property-bag splatting, and every patch either applies atomically or is a
//! no-op.
//!
//! # Patches
//!
//! Each entity has a dedicated patch type ([`ContainerPatch`],
//! [`TextLayerPatch`], [`IconPatch`]) whose fields are all optional. A patch
//! against an unknown layer id is a no-op rather than an error: selection
//! and the collection can go momentarily stale around a delete, and the
//! model must absorb that.
//!
//! # Example
//!
//! ```
//! use logoforge::{DesignSnapshot, Shape, ContainerPatch, TextLayerPatch};
//!
//! let mut design = DesignSnapshot::default();
//! design.update_container(ContainerPatch::new().shape(Shape::Circle));
//!
//! let id = design.add_text_layer(TextLayerPatch::new().text("ACME"));
//! design.update_text_layer(id, TextLayerPatch::new().font_size(48));
//! ```

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Point;

/// Tightest allowed letter tracking; updates below this clamp to it.
pub const LETTER_SPACING_FLOOR: i32 = -5;

/// Vertical offset below container center for newly added text layers.
pub const NEW_LAYER_OFFSET_Y: f32 = 80.0;

// ============================================================================
// Shape
// ============================================================================

/// The container outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    /// No shaped outline; the corner radius applies verbatim.
    #[default]
    None,
    Circle,
    Square,
    Rounded,
    Triangle,
    Hexagon,
    Rectangle,
    Oval,
}

impl Shape {
    /// Every shape, in panel order.
    pub const ALL: [Shape; 8] = [
        Shape::None,
        Shape::Circle,
        Shape::Square,
        Shape::Rounded,
        Shape::Triangle,
        Shape::Hexagon,
        Shape::Rectangle,
        Shape::Oval,
    ];

    /// Returns true for the wide-aspect shapes (rectangle and oval).
    pub fn is_wide(self) -> bool {
        matches!(self, Shape::Rectangle | Shape::Oval)
    }

    /// The (width, height) a container resets to when this shape is applied.
    pub fn default_size(self) -> (u32, u32) {
        if self.is_wide() { (500, 300) } else { (400, 400) }
    }
}

// ============================================================================
// Container
// ============================================================================

/// The outer shaped/background region that bounds a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    pub shape: Shape,
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Meaningful only when `shape` is [`Shape::None`] (applied verbatim)
    /// or as the stored value behind the fixed-table radii.
    pub corner_radius: u32,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            shape: Shape::None,
            width: 400,
            height: 400,
            background: Color::Transparent,
            corner_radius: 0,
        }
    }
}

impl Container {
    /// The container-local center point.
    pub fn center(&self) -> Point {
        Point::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Partial update for the container.
///
/// A shape change applies the aspect-reset rule atomically: rectangle/oval
/// reset the size to 500×300, every other shape to 400×400. Explicit
/// `width`/`height` in the same patch are applied after the reset, so a
/// caller can change shape and size in one consistent step.
#[derive(Debug, Clone, Default)]
pub struct ContainerPatch {
    pub shape: Option<Shape>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background: Option<Color>,
    pub corner_radius: Option<u32>,
}

impl ContainerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn corner_radius(mut self, radius: u32) -> Self {
        self.corner_radius = Some(radius);
        self
    }
}

// ============================================================================
// Icon layer
// ============================================================================

/// The generated icon layer: one raster image, centered in the container.
///
/// The bitmap itself is never serialized; it is regenerated on demand and
/// lives only for the editor session, so a record loaded from the store
/// starts with the settings intact and the image pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconLayer {
    /// The source bitmap; absent while generation is pending.
    #[serde(skip)]
    pub source: Option<RgbaImage>,
    /// Square bounding box edge, in pixels. Only this affects the footprint.
    pub size: u32,
    /// Render as a solid-color silhouette through the alpha channel.
    pub tint: bool,
    /// Fill color used when `tint` is on.
    pub tint_color: Color,
}

impl Default for IconLayer {
    fn default() -> Self {
        Self {
            source: None,
            size: 200,
            tint: false,
            tint_color: Color::Rgb(0x33, 0x33, 0x33),
        }
    }
}

/// Partial update for the icon layer settings.
#[derive(Debug, Clone, Default)]
pub struct IconPatch {
    pub size: Option<u32>,
    pub tint: Option<bool>,
    pub tint_color: Option<Color>,
}

impl IconPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn tint(mut self, tint: bool) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn tint_color(mut self, color: Color) -> Self {
        self.tint_color = Some(color);
        self
    }
}

// ============================================================================
// Text layers
// ============================================================================

/// Stable identifier for a text layer. Never reused within a design.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct LayerId(pub u64);

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font weight token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// The CSS/SVG keyword for this weight.
    pub fn keyword(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// One independently positioned and styled string of text.
///
/// `(x, y)` is the layer's visual center in container-local coordinates;
/// rotation pivots around that center, not the container origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextLayer {
    pub id: LayerId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: u32,
    pub font_family: String,
    pub color: Color,
    /// Tracking in pixels; may be negative down to [`LETTER_SPACING_FLOOR`].
    pub letter_spacing: i32,
    /// Degrees, always held in 0–359; assignments wrap.
    pub rotation: u16,
    pub font_weight: FontWeight,
    pub align: TextAlign,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            id: LayerId(0),
            text: String::new(),
            x: 0.0,
            y: 0.0,
            font_size: 32,
            font_family: "Montserrat".to_string(),
            color: Color::BLACK,
            letter_spacing: 0,
            rotation: 0,
            font_weight: FontWeight::Bold,
            align: TextAlign::Center,
        }
    }
}

/// Partial update for one text layer.
#[derive(Debug, Clone, Default)]
pub struct TextLayerPatch {
    pub text: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub font_size: Option<u32>,
    pub font_family: Option<String>,
    pub color: Option<Color>,
    pub letter_spacing: Option<i32>,
    pub rotation: Option<i32>,
    pub font_weight: Option<FontWeight>,
    pub align: Option<TextAlign>,
}

impl TextLayerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn position(self, x: f32, y: f32) -> Self {
        self.x(x).y(y)
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn letter_spacing(mut self, spacing: i32) -> Self {
        self.letter_spacing = Some(spacing);
        self
    }

    pub fn rotation(mut self, degrees: i32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }
}

// ============================================================================
// Design snapshot
// ============================================================================

/// The complete, persistable state of one logo composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSnapshot {
    pub container: Container,
    pub icon: Option<IconLayer>,
    pub text_layers: Vec<TextLayer>,
    /// Monotonic id counter; re-anchored above existing ids after a load
    /// from a store that predates this field.
    next_id: u64,
}

impl DesignSnapshot {
    /// Adds a text layer at the default position (container center, offset
    /// below center), applies `patch` over the defaults, and appends it so
    /// it paints above the icon and every existing layer.
    pub fn add_text_layer(&mut self, patch: TextLayerPatch) -> LayerId {
        let id = self.allocate_id();
        let center = self.container.center();
        let mut layer = TextLayer {
            id,
            x: center.x,
            y: center.y + NEW_LAYER_OFFSET_Y,
            ..TextLayer::default()
        };
        apply_text_patch(&mut layer, patch);
        self.text_layers.push(layer);
        id
    }

    /// Applies a partial update to the layer with the given id.
    ///
    /// Returns whether anything changed. An unknown id is a no-op; callers
    /// are expected to have validated selection, but selection and the
    /// collection can go stale around a delete.
    pub fn update_text_layer(&mut self, id: LayerId, patch: TextLayerPatch) -> bool {
        let Some(layer) = self.text_layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        let before = layer.clone();
        apply_text_patch(layer, patch);
        *layer != before
    }

    /// Removes the layer with the given id. Returns whether it existed.
    ///
    /// The snapshot carries no selection state; if the removed id was
    /// selected, the caller clears its selection.
    pub fn remove_text_layer(&mut self, id: LayerId) -> bool {
        let before = self.text_layers.len();
        self.text_layers.retain(|l| l.id != id);
        self.text_layers.len() != before
    }

    /// Applies a partial update to the container.
    ///
    /// A shape change resets width/height to the shape's default size before
    /// any explicit width/height in the same patch is applied, so shape and
    /// size are never momentarily inconsistent.
    pub fn update_container(&mut self, patch: ContainerPatch) {
        if let Some(shape) = patch.shape {
            let (w, h) = shape.default_size();
            self.container.shape = shape;
            self.container.width = w;
            self.container.height = h;
        }
        if let Some(w) = patch.width {
            self.container.width = w.max(1);
        }
        if let Some(h) = patch.height {
            self.container.height = h.max(1);
        }
        if let Some(bg) = patch.background {
            self.container.background = bg;
        }
        if let Some(r) = patch.corner_radius {
            self.container.corner_radius = r;
        }
    }

    /// Applies a partial update to the icon settings, creating them with
    /// defaults if no icon layer exists yet.
    pub fn update_icon(&mut self, patch: IconPatch) {
        let icon = self.icon.get_or_insert_with(IconLayer::default);
        if let Some(size) = patch.size {
            icon.size = size.max(1);
        }
        if let Some(tint) = patch.tint {
            icon.tint = tint;
        }
        if let Some(color) = patch.tint_color {
            icon.tint_color = color;
        }
    }

    /// Installs a freshly generated icon bitmap, overwriting any prior one.
    pub fn set_icon_source(&mut self, source: RgbaImage) {
        let icon = self.icon.get_or_insert_with(IconLayer::default);
        icon.source = Some(source);
    }

    /// Looks up a text layer by id.
    pub fn text_layer(&self, id: LayerId) -> Option<&TextLayer> {
        self.text_layers.iter().find(|l| l.id == id)
    }

    /// Returns true if a text layer with this id exists.
    pub fn contains_text_layer(&self, id: LayerId) -> bool {
        self.text_layer(id).is_some()
    }

    fn allocate_id(&mut self) -> LayerId {
        // A record loaded from an older store may carry layers but a zeroed
        // counter; anchor above the max existing id so ids are never reused.
        let max_existing = self.text_layers.iter().map(|l| l.id.0).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_existing) + 1;
        LayerId(self.next_id)
    }
}

fn apply_text_patch(layer: &mut TextLayer, patch: TextLayerPatch) {
    if let Some(text) = patch.text {
        layer.text = text;
    }
    if let Some(x) = patch.x {
        layer.x = x;
    }
    if let Some(y) = patch.y {
        layer.y = y;
    }
    if let Some(size) = patch.font_size {
        layer.font_size = size.max(1);
    }
    if let Some(family) = patch.font_family {
        layer.font_family = family;
    }
    if let Some(color) = patch.color {
        layer.color = color;
    }
    if let Some(spacing) = patch.letter_spacing {
        layer.letter_spacing = spacing.max(LETTER_SPACING_FLOOR);
    }
    if let Some(degrees) = patch.rotation {
        layer.rotation = degrees.rem_euclid(360) as u16;
    }
    if let Some(weight) = patch.font_weight {
        layer.font_weight = weight;
    }
    if let Some(align) = patch.align {
        layer.align = align;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_container_seeding() {
        let design = DesignSnapshot::default();
        assert_eq!(design.container.shape, Shape::None);
        assert_eq!(design.container.width, 400);
        assert_eq!(design.container.height, 400);
        assert!(design.container.background.is_transparent());
        assert!(design.text_layers.is_empty());
        assert!(design.icon.is_none());
    }

    #[test]
    fn shape_change_resets_size_for_all_shapes() {
        for shape in Shape::ALL {
            let mut design = DesignSnapshot::default();
            design.update_container(ContainerPatch::new().shape(Shape::Rectangle));
            assert_eq!(
                (design.container.width, design.container.height),
                (500, 300),
                "rectangle always resets to 500x300"
            );

            design.update_container(ContainerPatch::new().shape(shape));
            let expected = shape.default_size();
            assert_eq!(
                (design.container.width, design.container.height),
                expected,
                "{shape:?} should reset to its default size"
            );
        }
    }

    #[test]
    fn shape_and_explicit_size_apply_atomically() {
        let mut design = DesignSnapshot::default();
        design.update_container(ContainerPatch::new().shape(Shape::Circle).width(320));
        assert_eq!(design.container.shape, Shape::Circle);
        // Explicit width wins over the reset within the same patch.
        assert_eq!(design.container.width, 320);
        assert_eq!(design.container.height, 400);
    }

    #[test]
    fn new_layers_append_in_paint_order() {
        let mut design = DesignSnapshot::default();
        let a = design.add_text_layer(TextLayerPatch::new().text("a"));
        let b = design.add_text_layer(TextLayerPatch::new().text("b"));
        assert_ne!(a, b);
        assert_eq!(design.text_layers[0].id, a);
        assert_eq!(design.text_layers[1].id, b);
    }

    #[test]
    fn new_layer_defaults_below_center() {
        let mut design = DesignSnapshot::default();
        let id = design.add_text_layer(TextLayerPatch::new());
        let layer = design.text_layer(id).unwrap();
        assert_eq!(layer.x, 200.0);
        assert_eq!(layer.y, 200.0 + NEW_LAYER_OFFSET_Y);
    }

    #[test]
    fn ids_are_never_reused_after_removal() {
        let mut design = DesignSnapshot::default();
        let a = design.add_text_layer(TextLayerPatch::new());
        design.remove_text_layer(a);
        let b = design.add_text_layer(TextLayerPatch::new());
        assert!(b > a);
    }

    #[test]
    fn ids_reanchor_after_lossy_load() {
        // Simulate a record from a store predating the id counter.
        let json = r#"{
            "container": {},
            "textLayers": [{"id": 7, "text": "old"}]
        }"#;
        let mut design: DesignSnapshot = serde_json::from_str(json).unwrap();
        let id = design.add_text_layer(TextLayerPatch::new());
        assert!(id.0 > 7);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut design = DesignSnapshot::default();
        let changed = design.update_text_layer(LayerId(99), TextLayerPatch::new().text("x"));
        assert!(!changed);
        assert!(design.text_layers.is_empty());
    }

    #[test]
    fn letter_spacing_clamps_at_floor() {
        let mut design = DesignSnapshot::default();
        let id = design.add_text_layer(TextLayerPatch::new());

        design.update_text_layer(id, TextLayerPatch::new().letter_spacing(-5));
        assert_eq!(design.text_layer(id).unwrap().letter_spacing, -5);

        design.update_text_layer(id, TextLayerPatch::new().letter_spacing(-6));
        assert_eq!(design.text_layer(id).unwrap().letter_spacing, -5);
    }

    #[test]
    fn rotation_wraps() {
        let mut design = DesignSnapshot::default();
        let id = design.add_text_layer(TextLayerPatch::new());

        design.update_text_layer(id, TextLayerPatch::new().rotation(365));
        assert_eq!(design.text_layer(id).unwrap().rotation, 5);

        design.update_text_layer(id, TextLayerPatch::new().rotation(-90));
        assert_eq!(design.text_layer(id).unwrap().rotation, 270);
    }

    #[test]
    fn icon_patch_creates_settings_on_demand() {
        let mut design = DesignSnapshot::default();
        design.update_icon(IconPatch::new().tint(true).tint_color(Color::WHITE));
        let icon = design.icon.as_ref().unwrap();
        assert!(icon.tint);
        assert_eq!(icon.tint_color, Color::WHITE);
        assert!(icon.source.is_none());
    }

    #[test]
    fn regeneration_overwrites_icon_source() {
        let mut design = DesignSnapshot::default();
        design.set_icon_source(RgbaImage::new(4, 4));
        design.set_icon_source(RgbaImage::new(8, 8));
        let icon = design.icon.as_ref().unwrap();
        assert_eq!(icon.source.as_ref().unwrap().width(), 8);
    }

    #[test]
    fn snapshot_roundtrip_skips_bitmap() {
        let mut design = DesignSnapshot::default();
        design.update_container(ContainerPatch::new().shape(Shape::Hexagon));
        design.set_icon_source(RgbaImage::new(4, 4));
        let id = design.add_text_layer(TextLayerPatch::new().text("hello"));

        let json = serde_json::to_string(&design).unwrap();
        let restored: DesignSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.container.shape, Shape::Hexagon);
        assert_eq!(restored.text_layer(id).unwrap().text, "hello");
        // The bitmap is session-only; settings survive, pixels do not.
        assert!(restored.icon.as_ref().unwrap().source.is_none());
        assert_eq!(restored.icon.as_ref().unwrap().size, 200);
    }

    #[test]
    fn empty_object_deserializes_with_defaults() {
        let design: DesignSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(design, DesignSnapshot::default());
    }
}
