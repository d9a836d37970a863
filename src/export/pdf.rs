//! Paginated PDF brand kit assembly.
//!
//! Three sections, each starting on a fresh page: a cover (project name,
//! icon, attribution footer), the brand strategy (taglines plus the story
//! sections, flowing through [`PageCursor`]), and the visual identity
//! (selected-palette swatches, font names, short description). Text is
//! wrapped with the same Helvetica metrics the cursor uses for overflow
//! checks, and non-Latin-1 characters degrade to `?` in the built-in font.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::content::BrandContent;
use crate::design::IconLayer;
use crate::export::layout::{CONTENT_WIDTH, MARGIN, PAGE_HEIGHT, PAGE_WIDTH, PageCursor, text_width, wrap_text};
use crate::store::ProjectRecord;
use crate::style::{IconTreatment, resolve_icon};

use super::{ExportError, ExportedFile, file_stem};

const TITLE_SIZE: f32 = 30.0;
const SECTION_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const FOOTER_SIZE: f32 = 9.0;

const COVER_ICON_PT: f32 = 180.0;
const SWATCH_SIZE: f32 = 56.0;
const SWATCH_GAP: f32 = 14.0;

/// Builds the brand kit for a project. Requires generated content; a
/// missing or unusable icon degrades to a logged skip.
pub fn export_pdf(project: &ProjectRecord) -> Result<ExportedFile, ExportError> {
    let content = project
        .content
        .as_ref()
        .ok_or(ExportError::MissingContent)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let icon_name = match embed_icon(&mut doc, project.design.icon.as_ref()) {
        Some(id) => {
            let name = "Im0".to_string();
            Some((name, id))
        }
        None => None,
    };

    let mut flow = TextFlow::new();
    cover_page(&mut flow, &project.name, icon_name.as_ref().map(|(n, _)| n.as_str()));

    flow.break_page();
    strategy_section(&mut flow, project, content);

    flow.break_page();
    identity_section(&mut flow, content);

    // Assemble the document.
    let mut page_ids: Vec<ObjectId> = Vec::new();
    for operations in flow.pages {
        let data = Content { operations }.encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, data));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let font_dict = dictionary! {
        "F1" => font_regular,
        "F2" => font_bold,
    };
    let mut resources = dictionary! { "Font" => font_dict };
    if let Some((name, id)) = &icon_name {
        let mut xobjects = Dictionary::new();
        xobjects.set(name.as_bytes(), *id);
        resources.set("XObject", xobjects);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| id.into()).collect();
    let count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(ExportedFile {
        filename: format!("{}_brandkit.pdf", file_stem(&project.name)),
        bytes,
    })
}

// ============================================================================
// Sections
// ============================================================================

fn cover_page(flow: &mut TextFlow, name: &str, icon: Option<&str>) {
    let title = if name.trim().is_empty() { "Brand Kit" } else { name };
    flow.centered_text(title, TITLE_SIZE, true, 180.0);

    if let Some(image_name) = icon {
        let x = (PAGE_WIDTH - COVER_ICON_PT) / 2.0;
        let top = 260.0;
        flow.image(image_name, x, top, COVER_ICON_PT, COVER_ICON_PT);
    }

    flow.centered_text(
        &format!("{title} · brand identity kit"),
        FOOTER_SIZE,
        false,
        PAGE_HEIGHT - 40.0,
    );
}

fn strategy_section(flow: &mut TextFlow, project: &ProjectRecord, content: &BrandContent) {
    flow.heading("Brand Strategy", SECTION_SIZE, true);
    flow.spacer(10.0);

    let candidate = content
        .names
        .iter()
        .find(|n| n.name == project.name)
        .or_else(|| content.names.first());
    if let Some(candidate) = candidate {
        if !candidate.taglines.is_empty() {
            flow.heading("Taglines", HEADING_SIZE, true);
            for tagline in &candidate.taglines {
                flow.paragraph(&format!("- {tagline}"), BODY_SIZE);
            }
            flow.spacer(8.0);
        }
    }

    for (title, body) in content.story.sections() {
        if body.is_empty() {
            continue;
        }
        flow.heading(title, HEADING_SIZE, true);
        flow.paragraph(body, BODY_SIZE);
        flow.spacer(8.0);
    }
}

fn identity_section(flow: &mut TextFlow, content: &BrandContent) {
    flow.heading("Visual Identity", SECTION_SIZE, true);
    flow.spacer(10.0);

    // Only the currently selected palette is part of the kit.
    if let Some(palette) = content.selected_palette() {
        flow.heading("Color Palette", HEADING_SIZE, true);
        flow.spacer(4.0);
        flow.swatch_row(&palette.colors);
        flow.spacer(10.0);
    }

    flow.heading("Typography", HEADING_SIZE, true);
    // Family names are printed in the document font; glyph rendering of the
    // brand fonts is not part of the kit.
    for (role, family) in content.fonts.roles() {
        flow.paragraph(&format!("{role}: {family}"), BODY_SIZE);
    }
    flow.spacer(10.0);

    if !content.marketing.short_description.is_empty() {
        flow.heading("Short Description", HEADING_SIZE, true);
        flow.paragraph(&content.marketing.short_description, BODY_SIZE);
    }
}

// ============================================================================
// Text flow
// ============================================================================

/// Accumulates content-stream operations per page while a [`PageCursor`]
/// tracks vertical placement.
struct TextFlow {
    pages: Vec<Vec<Operation>>,
    cursor: PageCursor,
}

impl TextFlow {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PageCursor::a4(),
        }
    }

    fn page_ops(&mut self, page: usize) -> &mut Vec<Operation> {
        while self.pages.len() <= page {
            self.pages.push(Vec::new());
        }
        &mut self.pages[page]
    }

    fn break_page(&mut self) {
        self.cursor.break_page();
        self.page_ops(self.cursor.page());
    }

    fn spacer(&mut self, height: f32) {
        self.cursor.advance(height);
    }

    /// One line placed through the cursor.
    fn heading(&mut self, text: &str, size: f32, bold: bool) {
        let (page, y) = self.cursor.place(line_height(size));
        self.text_at(page, MARGIN, y, text, size, bold);
    }

    /// A wrapped paragraph. If the whole block no longer fits but would fit
    /// on a fresh page, the page breaks before placement; paragraphs longer
    /// than a full page flow line by line.
    fn paragraph(&mut self, text: &str, size: f32) {
        let lines = wrap_text(text, size, CONTENT_WIDTH);
        let lh = line_height(size);
        let block = lines.len() as f32 * lh;
        if !self.cursor.fits(block) && block <= page_capacity() {
            self.break_page();
        }
        for line in lines {
            let (page, y) = self.cursor.place(lh);
            self.text_at(page, MARGIN, y, &line, size, false);
        }
    }

    /// Text centered horizontally at an absolute distance from the page top.
    fn centered_text(&mut self, text: &str, size: f32, bold: bool, y_top: f32) {
        let x = (PAGE_WIDTH - text_width(text, size)) / 2.0;
        let page = self.cursor.page();
        self.text_at(page, x.max(MARGIN), y_top, text, size, bold);
    }

    fn text_at(&mut self, page: usize, x: f32, y_top: f32, text: &str, size: f32, bold: bool) {
        let font = if bold { "F2" } else { "F1" };
        let baseline = PAGE_HEIGHT - y_top - size;
        let ops = self.page_ops(page);
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(latin1_bytes(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    /// An image drawn at an absolute position on the current page.
    fn image(&mut self, name: &str, x: f32, y_top: f32, width: f32, height: f32) {
        let y = PAGE_HEIGHT - y_top - height;
        let page = self.cursor.page();
        let ops = self.page_ops(page);
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        ops.push(Operation::new("Do", vec![name.into()]));
        ops.push(Operation::new("Q", vec![]));
    }

    /// Five fixed-size swatches left to right, hex label under each.
    fn swatch_row(&mut self, colors: &[crate::color::Color; 5]) {
        let label_h = line_height(FOOTER_SIZE);
        let (page, y) = self.cursor.place(SWATCH_SIZE + 4.0 + label_h);
        for (i, color) in colors.iter().enumerate() {
            let x = MARGIN + i as f32 * (SWATCH_SIZE + SWATCH_GAP);
            let (r, g, b) = color.components();
            let rect_y = PAGE_HEIGHT - y - SWATCH_SIZE;
            let ops = self.page_ops(page);
            ops.push(Operation::new(
                "rg",
                vec![
                    (r as f32 / 255.0).into(),
                    (g as f32 / 255.0).into(),
                    (b as f32 / 255.0).into(),
                ],
            ));
            ops.push(Operation::new(
                "re",
                vec![x.into(), rect_y.into(), SWATCH_SIZE.into(), SWATCH_SIZE.into()],
            ));
            ops.push(Operation::new("f", vec![]));

            let label = color.hex();
            let label_x = x + (SWATCH_SIZE - text_width(&label, FOOTER_SIZE)) / 2.0;
            self.page_ops(page)
                .push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
            self.text_at(page, label_x, y + SWATCH_SIZE + 4.0, &label, FOOTER_SIZE, false);
        }
    }
}

fn line_height(size: f32) -> f32 {
    size * 1.45
}

/// Vertical space available on an empty page.
fn page_capacity() -> f32 {
    PAGE_HEIGHT - 2.0 * MARGIN
}

/// Encodes text for the built-in Latin-1 fonts; anything outside the range
/// degrades to `?` rather than corrupting the stream.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF { code as u8 } else { b'?' }
        })
        .collect()
}

// ============================================================================
// Icon embedding
// ============================================================================

/// Embeds the icon bitmap as an RGB image XObject, flattened over white.
///
/// Any missing or unusable bitmap is a skip, never an export failure: the
/// cover simply omits the icon.
fn embed_icon(doc: &mut Document, icon: Option<&IconLayer>) -> Option<ObjectId> {
    let icon = icon?;
    let source = icon.source.as_ref().or_else(|| {
        log::warn!("cover icon skipped: no bitmap available");
        None
    })?;
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        log::warn!("cover icon skipped: empty bitmap");
        return None;
    }

    // The cover shows the icon as the composer renders it.
    let treated = match resolve_icon(icon) {
        IconTreatment::Original => source.clone(),
        IconTreatment::Silhouette(color) => super::raster::tint_silhouette(source, color),
    };

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in treated.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        // Flatten over white paper.
        rgb.push(((r as u16 * alpha + 255 * (255 - alpha)) / 255) as u8);
        rgb.push(((g as u16 * alpha + 255 * (255 - alpha)) / 255) as u8);
        rgb.push(((b as u16 * alpha + 255 * (255 - alpha)) / 255) as u8);
    }

    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb,
    );
    Some(doc.add_object(stream))
}

// ============================================================================
// Tests
// ============================================================================
