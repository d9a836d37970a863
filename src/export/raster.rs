//! Deterministic rasterization of a design snapshot.
//!
//! The renderer consumes the same resolved style values as the live
//! preview: the container background is filled, the icon composites
//! centered (as-is or as a tinted silhouette), text layers composite in
//! paint order, and the whole composition is clipped by the container's
//! shape mask. Rendering the same snapshot twice produces identical pixels.

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree, fontdb};

use crate::color::Color;
use crate::design::{Container, DesignSnapshot, TextLayer};
use crate::geometry::{self, centered_box};
use crate::store::ProjectRecord;
use crate::style::{IconTreatment, resolve_container, resolve_icon, resolve_text};

use super::{ExportError, ExportedFile, file_stem};

/// Rasterizes a snapshot at its displayed resolution (the container size).
pub fn render_snapshot(design: &DesignSnapshot) -> RgbaImage {
    let container = &design.container;
    let (width, height) = (container.width.max(1), container.height.max(1));
    let mut canvas = RgbaImage::new(width, height);

    if !container.background.is_transparent() {
        let fill = container.background.to_rgba();
        for pixel in canvas.pixels_mut() {
            *pixel = fill;
        }
    }

    if let Some(icon) = &design.icon {
        if let Some(source) = &icon.source {
            let size = icon.size.max(1);
            let scaled = image::imageops::resize(
                source,
                size,
                size,
                image::imageops::FilterType::Triangle,
            );
            let treated = match resolve_icon(icon) {
                IconTreatment::Original => scaled,
                IconTreatment::Silhouette(color) => tint_silhouette(&scaled, color),
            };
            let (x, y) = centered_box(width, height, size);
            composite_over(&mut canvas, &treated, x, y);
        }
    }

    for layer in &design.text_layers {
        if let Some(rendered) = rasterize_text_layer(layer, width, height) {
            composite_over(&mut canvas, &rendered, 0, 0);
        }
    }

    if let Some(mask) = shape_mask(container) {
        apply_mask(&mut canvas, &mask);
    }

    canvas
}

/// Rasterizes the current composition and wraps it as a downloadable PNG.
pub fn export_png(project: &ProjectRecord) -> Result<ExportedFile, ExportError> {
    let canvas = render_snapshot(&project.design);
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(ExportedFile {
        filename: format!("{}_logo.png", file_stem(&project.name)),
        bytes,
    })
}

// ============================================================================
// Icon treatment
// ============================================================================

/// Renders a solid-color silhouette: the flat fill takes the source's alpha
/// channel, and the source's own colors are discarded entirely. Toggling
/// the tint off therefore restores the untouched source.
pub fn tint_silhouette(source: &RgbaImage, color: Color) -> RgbaImage {
    let (r, g, b) = color.components();
    let mut result = source.clone();
    for pixel in result.pixels_mut() {
        let alpha = pixel.0[3];
        pixel.0 = [r, g, b, alpha];
    }
    result
}

// ============================================================================
// Shape masks
// ============================================================================

/// Rasterizes the container's clip mask, or `None` when nothing is clipped.
fn shape_mask(container: &Container) -> Option<RgbaImage> {
    let style = resolve_container(container);
    if style.is_unclipped() {
        return None;
    }
    let (w, h) = (container.width.max(1), container.height.max(1));
    let element = if let Some(points) = style.clip_points(w, h) {
        let d = geometry::polygon_path(&points);
        format!(r##"<path d="{d}" fill="#ffffff"/>"##)
    } else {
        match style.radius {
            crate::style::Radius::Percent(_) => geometry::ellipse_element(w, h),
            crate::style::Radius::Px(r) => geometry::rounded_rect_element(w, h, r),
        }
    };
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{element}</svg>"#
    );
    render_svg_exact(&svg, w, h)
}

/// Multiplies the canvas alpha by the mask alpha, pixel for pixel.
fn apply_mask(canvas: &mut RgbaImage, mask: &RgbaImage) {
    for (pixel, mask_pixel) in canvas.pixels_mut().zip(mask.pixels()) {
        let a = pixel.0[3] as u16 * mask_pixel.0[3] as u16 / 255;
        pixel.0[3] = a as u8;
    }
}

// ============================================================================
// Text layers
// ============================================================================

/// Rasterizes one text layer onto a transparent container-sized image.
///
/// The layer becomes an SVG `<text>` element carrying the resolved
/// transform (translate to center, then rotate about it), anchor, and
/// tracking, so the exported pixels and any live preview derive from the
/// same style contract.
fn rasterize_text_layer(layer: &TextLayer, width: u32, height: u32) -> Option<RgbaImage> {
    if layer.text.is_empty() || layer.color.is_transparent() {
        return None;
    }
    let style = resolve_text(layer);
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text transform="{transform}" font-family="{family}" font-size="{size}" "#,
            r#"font-weight="{weight}" letter-spacing="{spacing}" fill="{fill}" "#,
            r#"text-anchor="{anchor}" dominant-baseline="central">{text}</text></svg>"#
        ),
        w = width,
        h = height,
        transform = style.transform.svg(),
        family = xml_escape(&layer.font_family),
        size = layer.font_size,
        weight = layer.font_weight.keyword(),
        spacing = layer.letter_spacing,
        fill = layer.color.hex(),
        anchor = style.anchor,
        text = xml_escape(&layer.text),
    );
    render_svg_exact(&svg, width, height)
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// SVG rendering
// ============================================================================

/// Shared font database for text rasterization; system fonts load once per
/// process.
fn font_database() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

/// Renders an SVG string to an RGBA image at exactly `width`×`height`.
///
/// Returns `None` if the SVG cannot be parsed or the pixmap cannot be
/// allocated; callers treat that as a skipped asset, never a failure.
fn render_svg_exact(svg: &str, width: u32, height: u32) -> Option<RgbaImage> {
    let mut opts = Options::default();
    opts.fontdb = font_database();
    let tree = match Tree::from_str(svg, &opts) {
        Ok(tree) => tree,
        Err(err) => {
            log::warn!("skipping unrenderable layer: {err}");
            return None;
        }
    };

    let mut pixmap = Pixmap::new(width, height)?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Some(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia pixmap (premultiplied alpha) to an RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let pixel = pixmap.pixel(x, y).unwrap();
            let (r, g, b, a) =
                unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
            img.put_pixel(x, y, Rgba([r, g, b, a]));
        }
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites `src` onto `dest` at the given position (source over).
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for sy in 0..src.height() {
        for sx in 0..src.width() {
            let dx = x + sx as i32;
            let dy = y + sy as i32;

            if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
                continue;
            }

            let src_pixel = src.get_pixel(sx, sy);
            let dst_pixel = dest.get_pixel(dx as u32, dy as u32);
            let blended = alpha_blend(*src_pixel, *dst_pixel);
            dest.put_pixel(dx as u32, dy as u32, blended);
        }
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::design::{ContainerPatch, IconPatch, Shape};

    fn white_circle_design() -> DesignSnapshot {
        let mut design = DesignSnapshot::default();
        design.update_container(
            ContainerPatch::new()
                .shape(Shape::Circle)
                .background(Color::WHITE),
        );
        design
    }

    fn solid_icon(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn render_is_deterministic() {
        let mut design = white_circle_design();
        design.set_icon_source(solid_icon(64, 64, [10, 20, 30, 255]));
        let first = render_snapshot(&design);
        let second = render_snapshot(&design);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn circle_clip_cuts_corners_keeps_center() {
        let design = white_circle_design();
        let out = render_snapshot(&design);
        assert_eq!(out.dimensions(), (400, 400));
        // Center stays opaque white, corners clip to transparent.
        assert_eq!(out.get_pixel(200, 200).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(2, 2).0[3], 0);
        assert_eq!(out.get_pixel(397, 397).0[3], 0);
    }

    #[test]
    fn transparent_background_renders_transparent() {
        let design = DesignSnapshot::default();
        let out = render_snapshot(&design);
        assert_eq!(out.get_pixel(200, 200).0[3], 0);
    }

    #[test]
    fn icon_composites_centered() {
        let mut design = DesignSnapshot::default();
        design.update_icon(IconPatch::new().size(100));
        design.set_icon_source(solid_icon(50, 50, [255, 0, 0, 255]));

        let out = render_snapshot(&design);
        // Icon box spans 150..250 in a 400x400 container.
        assert_eq!(out.get_pixel(200, 200).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(100, 100).0[3], 0);
    }

    #[test]
    fn tint_toggle_roundtrip_restores_original_render() {
        let mut design = DesignSnapshot::default();
        design.update_icon(IconPatch::new().size(100));
        design.set_icon_source(solid_icon(50, 50, [20, 120, 220, 255]));

        let untinted = render_snapshot(&design);

        design.update_icon(
            IconPatch::new()
                .tint(true)
                .tint_color(Color::Rgb(0xff, 0x17, 0x44)),
        );
        let tinted = render_snapshot(&design);
        assert_eq!(tinted.get_pixel(200, 200).0, [0xff, 0x17, 0x44, 255]);

        // Toggling back off reproduces the original render exactly: the
        // silhouette never touched the source.
        design.update_icon(IconPatch::new().tint(false));
        let restored = render_snapshot(&design);
        assert_eq!(restored.as_raw(), untinted.as_raw());
        assert_eq!(restored.get_pixel(200, 200).0, [20, 120, 220, 255]);
    }

    #[test]
    fn silhouette_preserves_alpha_channel() {
        let mut src = solid_icon(2, 2, [10, 10, 10, 255]);
        src.put_pixel(0, 0, Rgba([10, 10, 10, 0]));
        src.put_pixel(1, 0, Rgba([10, 10, 10, 128]));

        let out = tint_silhouette(&src, Color::Rgb(200, 100, 50));
        assert_eq!(out.get_pixel(0, 0).0, [200, 100, 50, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [200, 100, 50, 128]);
        assert_eq!(out.get_pixel(0, 1).0, [200, 100, 50, 255]);
    }

    #[test]
    fn triangle_mask_clips_top_corners() {
        let mut design = DesignSnapshot::default();
        design.update_container(
            ContainerPatch::new()
                .shape(Shape::Triangle)
                .background(Color::WHITE),
        );
        let out = render_snapshot(&design);
        // Apex region is inside; top-left corner is outside the triangle.
        assert_eq!(out.get_pixel(200, 380).0[3], 255);
        assert_eq!(out.get_pixel(4, 4).0[3], 0);
    }

    #[test]
    fn png_export_produces_png_bytes_and_filename() {
        let mut project =
            ProjectRecord::new("p1", "Acme Brewing Co", crate::content::BrandBrief::default());
        project.design = white_circle_design();

        let file = export_png(&project).unwrap();
        assert_eq!(file.filename, "Acme_Brewing_Co_logo.png");
        assert_eq!(&file.bytes[1..4], b"PNG");
    }
}
