//! External collaborator seams: generative content, icon images, and the
//! conversational advisor.
//!
//! The composer depends on these contracts, not on any concrete backend.
//! Provider failures are terminal for the triggering action only; they are
//! surfaced once and never corrupt the in-memory design.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{BrandBrief, BrandContent, ContentError};

/// Fixed reply shown in the chat transcript when the advisor fails.
pub const ADVISOR_FALLBACK: &str =
    "I couldn't reach the consultant service just now. Please try again in a moment.";

/// Errors from external providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("malformed provider payload: {0}")]
    Malformed(#[from] ContentError),
}

/// Local input validation; blocks the action before any provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please provide an industry first")]
    MissingIndustry,
    #[error("please describe the business first")]
    MissingDescription,
}

/// Checks that a brief has the fields generation requires.
pub fn validate_brief(brief: &BrandBrief) -> Result<(), ValidationError> {
    if brief.industry.trim().is_empty() {
        return Err(ValidationError::MissingIndustry);
    }
    if brief.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    Ok(())
}

// ============================================================================
// Provider traits
// ============================================================================

/// Produces the structured brand bundle for a brief.
///
/// Implementations must return [`ProviderError::Malformed`] for payloads
/// that fail [`BrandContent::validate`]; there are no silent defaults for
/// brand content.
pub trait ContentProvider {
    fn generate(&self, brief: &BrandBrief) -> Result<BrandContent, ProviderError>;
}

/// Produces one raster icon for a prompt and style keyword.
///
/// Each successful call fully replaces the previous icon; results are never
/// merged.
pub trait IconProvider {
    fn generate_icon(&self, prompt: &str, style: &str) -> Result<RgbaImage, ProviderError>;
}

/// One turn of the consultant chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// The conversational branding advisor.
pub trait Advisor {
    fn reply(&self, history: &[ChatTurn], message: &str) -> Result<String, ProviderError>;
}

// ============================================================================
// In-flight guard
// ============================================================================

/// Re-entry guard for a single asynchronous operation.
///
/// The flag gates only the guarded action (e.g. the Generate button); the
/// rest of the composer stays interactive while a request is outstanding.
/// It is always cleared on settle, success or failure, so the UI can never
/// stick in a disabled loading state.
#[derive(Debug, Clone, Copy, Default)]
pub struct InFlight {
    pending: bool,
}

impl InFlight {
    /// Attempts to begin the operation. Returns false if one is already
    /// outstanding.
    pub fn try_begin(&mut self) -> bool {
        if self.pending {
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Marks the outstanding operation as settled.
    pub fn settle(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_validation_blocks_locally() {
        let mut brief = BrandBrief::default();
        assert_eq!(validate_brief(&brief), Err(ValidationError::MissingIndustry));

        brief.industry = "Food".into();
        assert_eq!(
            validate_brief(&brief),
            Err(ValidationError::MissingDescription)
        );

        brief.description = "A sourdough bakery".into();
        assert_eq!(validate_brief(&brief), Ok(()));
    }

    #[test]
    fn whitespace_only_fields_do_not_pass() {
        let brief = BrandBrief {
            industry: "  ".into(),
            description: "x".into(),
            ..BrandBrief::default()
        };
        assert_eq!(validate_brief(&brief), Err(ValidationError::MissingIndustry));
    }

    #[test]
    fn in_flight_gates_reentry_until_settle() {
        let mut flight = InFlight::default();
        assert!(flight.try_begin());
        assert!(flight.is_pending());
        assert!(!flight.try_begin());

        flight.settle();
        assert!(!flight.is_pending());
        assert!(flight.try_begin());
    }
}
