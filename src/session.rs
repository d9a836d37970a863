//! The editor session: exclusive ownership of one project while it is open
//! in the composer.
//!
//! A [`StudioSession`] wires the layer model, the interaction controller,
//! the in-flight generation guard, and the project store together. Every
//! mutating operation forwards to the snapshot and then schedules a
//! best-effort persistence write; a failing store is logged and never
//! blocks interaction. Only one session may own a given project at a time;
//! the embedding UI mounts at most one editor.

use image::RgbaImage;

use crate::content::{BrandContent, MarkKind, icon_prompt};
use crate::controller::ComposerController;
use crate::design::{
    ContainerPatch, DesignSnapshot, IconPatch, LayerId, TextLayerPatch,
};
use crate::export::{ExportError, ExportedFile, pdf, raster};
use crate::geometry::Point;
use crate::provider::{
    ADVISOR_FALLBACK, Advisor, ChatRole, ChatTurn, IconProvider, InFlight, ProviderError,
    ValidationError, validate_brief,
};
use crate::store::{ProjectRecord, ProjectStore};
use thiserror::Error;

/// Errors surfaced to the user from session-level actions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("an icon generation request is already in progress")]
    GenerationPending,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One project open for editing.
pub struct StudioSession<S: ProjectStore> {
    store: S,
    project: ProjectRecord,
    controller: ComposerController,
    icon_request: InFlight,
    chat: Vec<ChatTurn>,
}

impl<S: ProjectStore> StudioSession<S> {
    /// Opens the project with the given id, loading it from the store or
    /// starting fresh when the store has nothing (first run is normal).
    pub fn open(store: S, record: ProjectRecord) -> Self {
        let project = match store.get(&record.id) {
            Ok(Some(existing)) => existing,
            Ok(None) => record,
            Err(err) => {
                log::warn!("store read failed, starting fresh: {err}");
                record
            }
        };
        Self {
            store,
            project,
            controller: ComposerController::new(),
            icon_request: InFlight::default(),
            chat: Vec::new(),
        }
    }

    pub fn project(&self) -> &ProjectRecord {
        &self.project
    }

    pub fn design(&self) -> &DesignSnapshot {
        &self.project.design
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.controller.selected()
    }

    pub fn chat_history(&self) -> &[ChatTurn] {
        &self.chat
    }

    pub fn icon_generation_pending(&self) -> bool {
        self.icon_request.is_pending()
    }

    // ---- Content arrival ----

    /// Installs a freshly generated content bundle.
    ///
    /// The first bundle seeds the design snapshot with container defaults
    /// and the icon tint color with the selected palette's first color, a
    /// one-time default that is never re-synced on later palette changes.
    pub fn set_content(&mut self, content: BrandContent) {
        let first_arrival = self.project.content.is_none();
        if first_arrival {
            self.project.design = DesignSnapshot::default();
            if let Some(palette) = content.selected_palette() {
                self.project
                    .design
                    .update_icon(IconPatch::new().tint_color(palette.colors[0]));
            }
        }
        self.project.content = Some(content);
        self.persist();
    }

    // ---- Layer model operations ----

    pub fn add_text_layer(&mut self, patch: TextLayerPatch) -> LayerId {
        let id = self.project.design.add_text_layer(patch);
        self.persist();
        id
    }

    pub fn update_text_layer(&mut self, id: LayerId, patch: TextLayerPatch) {
        if self.project.design.update_text_layer(id, patch) {
            self.persist();
        }
    }

    /// Updates the currently selected layer, if any.
    pub fn update_selected(&mut self, patch: TextLayerPatch) {
        if let Some(id) = self.controller.selected() {
            self.update_text_layer(id, patch);
        }
    }

    pub fn remove_text_layer(&mut self, id: LayerId) {
        if self.project.design.remove_text_layer(id) {
            // The model carries no selection; clearing it is on us.
            self.controller.layer_removed(id);
            self.persist();
        }
    }

    pub fn update_container(&mut self, patch: ContainerPatch) {
        self.project.design.update_container(patch);
        self.persist();
    }

    pub fn update_icon(&mut self, patch: IconPatch) {
        self.project.design.update_icon(patch);
        self.persist();
    }

    // ---- Pointer events ----

    pub fn pointer_down(&mut self, hit: Option<LayerId>, pos: Point) {
        self.controller.pointer_down(&self.project.design, hit, pos);
    }

    pub fn pointer_move(&mut self, pos: Point) {
        self.controller.pointer_move(&mut self.project.design, pos);
    }

    /// Release settles the drag; the moved position persists now, not on
    /// every intermediate move.
    pub fn pointer_up(&mut self) {
        let was_dragging = matches!(
            self.controller.state(),
            crate::controller::Interaction::Dragging { .. }
        );
        self.controller.pointer_up();
        if was_dragging {
            self.persist();
        }
    }

    pub fn pointer_leave(&mut self) {
        let was_dragging = matches!(
            self.controller.state(),
            crate::controller::Interaction::Dragging { .. }
        );
        self.controller.pointer_leave();
        if was_dragging {
            self.persist();
        }
    }

    // ---- Icon generation ----

    /// Requests a new icon from the provider, replacing any prior one.
    ///
    /// Validation failures block before any provider call; a second request
    /// while one is outstanding is rejected; the in-flight flag always
    /// clears on settle, success or failure.
    pub fn generate_icon(
        &mut self,
        provider: &dyn IconProvider,
        kind: MarkKind,
        style: &str,
    ) -> Result<(), SessionError> {
        validate_brief(&self.project.brief)?;
        let Some(content) = &self.project.content else {
            return Err(ProviderError::Request("generate brand content first".into()).into());
        };
        let Some(palette) = content.selected_palette() else {
            return Err(ProviderError::Request("no palette available".into()).into());
        };
        if !self.icon_request.try_begin() {
            return Err(SessionError::GenerationPending);
        }

        let prompt = icon_prompt(
            &self.project.name,
            &self.project.brief.industry,
            palette,
            kind,
            self.project.brief.tone,
        );
        let result = provider.generate_icon(&prompt, style);
        self.icon_request.settle();

        match result {
            Ok(image) => {
                self.apply_generated_icon(image);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Installs a generated icon bitmap directly (used by embedders that
    /// drive the provider themselves).
    pub fn apply_generated_icon(&mut self, image: RgbaImage) {
        self.project.design.set_icon_source(image);
        self.persist();
    }

    // ---- Advisor chat ----

    /// Sends one message to the advisor and appends both turns to the
    /// transcript. Provider failures become the fixed fallback reply; the
    /// transcript never carries an error.
    pub fn chat_send(&mut self, advisor: &dyn Advisor, message: &str) -> String {
        let reply = match advisor.reply(&self.chat, message) {
            Ok(reply) => reply,
            Err(err) => {
                log::warn!("advisor unavailable: {err}");
                ADVISOR_FALLBACK.to_string()
            }
        };
        self.chat.push(ChatTurn {
            role: ChatRole::User,
            content: message.to_string(),
        });
        self.chat.push(ChatTurn {
            role: ChatRole::Assistant,
            content: reply.clone(),
        });
        reply
    }

    // ---- Export ----

    pub fn export_png(&self) -> Result<ExportedFile, ExportError> {
        raster::export_png(&self.project)
    }

    pub fn export_pdf(&self) -> Result<ExportedFile, ExportError> {
        pdf::export_pdf(&self.project)
    }

    // ---- Persistence ----

    /// Best-effort write-behind; a failing store never interrupts editing.
    fn persist(&mut self) {
        if let Err(err) = self.store.put(&self.project) {
            log::warn!("project persistence failed: {err}");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
