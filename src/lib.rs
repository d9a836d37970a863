//! logoforge: brand-identity composition and export library
//!
//! This crate provides the core of a brand-identity authoring tool: a typed
//! layer model for logo compositions, an explicit pointer-interaction state
//! machine, a pure style resolver, and deterministic PNG/PDF export that
//! reproduces the composed layout exactly.
//!
//! # Example
//!
//! ```
//! use logoforge::{
//!     Color, ComposerController, ContainerPatch, DesignSnapshot, Point, Shape,
//!     TextLayerPatch,
//! };
//!
//! let mut design = DesignSnapshot::default();
//! design.update_container(ContainerPatch::new().shape(Shape::Circle).background(Color::WHITE));
//! let id = design.add_text_layer(TextLayerPatch::new().text("ACME").font_size(32));
//!
//! // Drag the layer 10px right through the controller.
//! let mut controller = ComposerController::new();
//! controller.pointer_down(&design, Some(id), Point::new(0.0, 0.0));
//! controller.pointer_move(&mut design, Point::new(10.0, 0.0));
//! controller.pointer_up();
//!
//! let png = logoforge::export::raster::render_snapshot(&design);
//! assert_eq!(png.dimensions(), (400, 400));
//! ```
//!
//! # Sessions
//!
//! For the full editor flow (content arrival, icon generation with an
//! in-flight guard, persistence-on-change, chat fallback) wrap a project
//! in a [`StudioSession`]:
//!
//! ```no_run
//! use logoforge::{BrandBrief, MemoryStore, ProjectRecord, StudioSession};
//!
//! let record = ProjectRecord::new("p1", "Acme", BrandBrief::default());
//! let mut session = StudioSession::open(MemoryStore::new(), record);
//! let kit = session.export_pdf();
//! ```

mod color;
mod content;
mod controller;
mod design;
pub mod export;
mod geometry;
mod provider;
mod session;
mod store;
mod style;

pub use color::{Color, ColorParseError};
pub use content::{
    BrandBrief, BrandContent, BrandStory, ContentError, FontTrio, Language, MarkKind,
    MarketingCopy, NameCandidate, Palette, Tone, catalog, icon_prompt,
};
pub use controller::{ComposerController, Interaction};
pub use design::{
    Container, ContainerPatch, DesignSnapshot, FontWeight, IconLayer, IconPatch, LayerId,
    LETTER_SPACING_FLOOR, Shape, TextAlign, TextLayer, TextLayerPatch,
};
pub use export::{ExportError, ExportedFile, file_stem};
pub use geometry::{Point, Vec2};
pub use provider::{
    ADVISOR_FALLBACK, Advisor, ChatRole, ChatTurn, ContentProvider, IconProvider, InFlight,
    ProviderError, ValidationError, validate_brief,
};
pub use session::{SessionError, StudioSession};
pub use store::{JsonFileStore, MemoryStore, ProjectRecord, ProjectStore, StoreError};
pub use style::{
    ContainerStyle, IconTreatment, Radius, TextStyle, TextTransform, resolve_container,
    resolve_icon, resolve_text,
};
