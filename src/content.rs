//! Generated brand content: the structured bundle a content provider
//! returns for a brief, plus the fixed catalogs the composer panels and
//! prompt builder draw from.
//!
//! Brand content is never silently defaulted: a malformed bundle (empty
//! name list, palette without exactly five parseable colors) is a loud
//! [`ContentError`] surfaced to the user, not patched over.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;

/// Errors for malformed generated content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("provider returned no name candidates")]
    NoNames,
    #[error("palette must contain exactly 5 colors, got {0}")]
    PaletteSize(usize),
    #[error("provider returned no color palettes")]
    NoPalettes,
    #[error("invalid palette color: {0}")]
    BadColor(String),
    #[error("font selection {0:?} is not in the catalog")]
    UnknownFont(String),
}

// ============================================================================
// Catalogs
// ============================================================================

/// Fixed font catalog, by role.
pub mod catalog {
    pub const LOGO_FONTS: [&str; 5] = [
        "Montserrat",
        "Playfair Display",
        "Bebas Neue",
        "Raleway",
        "Oswald",
    ];

    pub const HEADING_FONTS: [&str; 5] =
        ["Poppins", "Roboto", "Open Sans", "Lato", "Merriweather"];

    pub const BODY_FONTS: [&str; 5] = ["Inter", "Source Sans Pro", "Nunito", "Work Sans", "Karla"];

    /// Palette style names with the descriptor phrase handed to providers.
    pub const PALETTE_STYLES: [(&str, &str); 7] = [
        ("Pastel", "soft, muted pastel colors with gentle tones"),
        ("Bold Modern", "vibrant, high-contrast modern colors"),
        (
            "Luxury",
            "sophisticated, premium colors like deep blues, golds, blacks",
        ),
        ("Earthy", "natural, organic earth tones and greens"),
        ("Monochrome", "grayscale with subtle variations"),
        ("Vibrant", "bright, energetic, attention-grabbing colors"),
        ("Neutral", "balanced, professional neutral tones"),
    ];

    /// True if `family` appears anywhere in the catalog.
    pub fn contains_font(family: &str) -> bool {
        LOGO_FONTS
            .iter()
            .chain(HEADING_FONTS.iter())
            .chain(BODY_FONTS.iter())
            .any(|f| *f == family)
    }
}

/// Supported content languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
    Tamil,
    Spanish,
    French,
    German,
}

impl Language {
    /// ISO 639-1 code for provider requests.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Telugu => "te",
            Language::Tamil => "ta",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
        }
    }
}

/// Overall tone of the brand voice, as judged from the story text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tone {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Tone {
    /// The mood phrase injected into icon prompts.
    pub fn mood(self) -> &'static str {
        match self {
            Tone::Positive => "energetic, vibrant, uplifting",
            Tone::Neutral => "balanced, professional, clean",
            Tone::Negative => "serious, bold, impactful",
        }
    }
}

/// The kind of logo mark being composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkKind {
    Lettermark,
    Wordmark,
    #[default]
    SymbolBased,
    CombinationMark,
}

impl MarkKind {
    fn describe(self, name: &str) -> String {
        match self {
            MarkKind::Lettermark => format!("lettermark logo using initials of {name}"),
            MarkKind::Wordmark => format!("wordmark logo with stylized text '{name}'"),
            MarkKind::SymbolBased => format!("abstract symbol logo representing {name} concept"),
            MarkKind::CombinationMark => {
                format!("combination logo with both symbol and text '{name}'")
            }
        }
    }
}

// ============================================================================
// Brief and bundle
// ============================================================================

/// What the user tells us about the business before generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandBrief {
    pub industry: String,
    pub description: String,
    pub tone: Tone,
    pub language: Language,
}

/// One generated name with its rationale and taglines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NameCandidate {
    pub name: String,
    pub meaning: String,
    pub taglines: Vec<String>,
}

/// The five-part brand story.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandStory {
    pub vision: String,
    pub mission: String,
    pub problem: String,
    pub solution: String,
    pub positioning: String,
}

impl BrandStory {
    /// The sections in export order, paired with their headings.
    pub fn sections(&self) -> [(&'static str, &str); 5] {
        [
            ("Vision", self.vision.as_str()),
            ("Mission", self.mission.as_str()),
            ("Problem", self.problem.as_str()),
            ("Solution", self.solution.as_str()),
            ("Positioning", self.positioning.as_str()),
        ]
    }
}

/// Marketing copy fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketingCopy {
    pub short_description: String,
    pub long_description: String,
    pub social_caption: String,
    pub ad_copy: String,
    pub email_copy: String,
}

/// A palette of exactly five colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    pub colors: [Color; 5],
}

impl Palette {
    pub fn new(colors: [Color; 5]) -> Self {
        Self { colors }
    }

    /// Parses a provider's hex list, strictly: exactly five entries, all
    /// valid hex, or a [`ContentError`].
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, ContentError> {
        if hex.len() != 5 {
            return Err(ContentError::PaletteSize(hex.len()));
        }
        let mut colors = [Color::BLACK; 5];
        for (slot, value) in colors.iter_mut().zip(hex) {
            *slot = value
                .as_ref()
                .parse()
                .map_err(|_| ContentError::BadColor(value.as_ref().to_string()))?;
        }
        Ok(Self { colors })
    }
}

/// The font trio picked for the brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontTrio {
    pub logo: String,
    pub heading: String,
    pub body: String,
}

impl Default for FontTrio {
    fn default() -> Self {
        Self {
            logo: "Montserrat".to_string(),
            heading: "Poppins".to_string(),
            body: "Inter".to_string(),
        }
    }
}

impl FontTrio {
    /// The families in display order, paired with their roles.
    pub fn roles(&self) -> [(&'static str, &str); 3] {
        [
            ("Logo", self.logo.as_str()),
            ("Heading", self.heading.as_str()),
            ("Body", self.body.as_str()),
        ]
    }
}

/// The full generated bundle for one project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandContent {
    pub names: Vec<NameCandidate>,
    pub story: BrandStory,
    pub marketing: MarketingCopy,
    pub palettes: Vec<Palette>,
    pub selected_palette: usize,
    pub fonts: FontTrio,
    /// The textual icon concept the image provider should realize.
    pub icon_concept: String,
}

impl BrandContent {
    /// The currently selected palette; a stale index falls back to the
    /// first palette rather than panicking.
    pub fn selected_palette(&self) -> Option<&Palette> {
        self.palettes
            .get(self.selected_palette)
            .or_else(|| self.palettes.first())
    }

    /// Validates the bundle the way provider payloads must be validated:
    /// loudly, before anything is stored.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.names.is_empty() {
            return Err(ContentError::NoNames);
        }
        if self.palettes.is_empty() {
            return Err(ContentError::NoPalettes);
        }
        for role in [&self.fonts.logo, &self.fonts.heading, &self.fonts.body] {
            if !catalog::contains_font(role) {
                return Err(ContentError::UnknownFont(role.clone()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Icon prompt
// ============================================================================

/// Builds the icon-provider prompt from the brand facts.
///
/// Uses at most the first three palette colors, the mark-kind phrasing, and
/// the tone-derived mood.
pub fn icon_prompt(
    name: &str,
    industry: &str,
    palette: &Palette,
    kind: MarkKind,
    tone: Tone,
) -> String {
    let color_desc: Vec<String> = palette.colors[..3].iter().map(|c| c.hex()).collect();
    format!(
        "Professional {}, {} industry, {} aesthetic, vector style, clean design, \
         modern, colors: {}, flat design, minimalist, high quality, centered \
         composition, white background, suitable for branding",
        kind.describe(name),
        industry,
        tone.mood(),
        color_desc.join(", "),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pastel() -> Palette {
        Palette::from_hex(&["#FFD6E8", "#C5E1F5", "#E8F5C8", "#FFF4E0", "#E5D4F0"]).unwrap()
    }

    #[test]
    fn palette_requires_exactly_five() {
        let err = Palette::from_hex(&["#ffffff"]).unwrap_err();
        assert_eq!(err, ContentError::PaletteSize(1));

        let err = Palette::from_hex(&["#1", "#2", "#3", "#4", "#5"]).unwrap_err();
        assert!(matches!(err, ContentError::BadColor(_)));
    }

    #[test]
    fn validate_rejects_empty_bundles() {
        let mut content = BrandContent::default();
        assert_eq!(content.validate(), Err(ContentError::NoNames));

        content.names.push(NameCandidate {
            name: "Acme".into(),
            ..NameCandidate::default()
        });
        assert_eq!(content.validate(), Err(ContentError::NoPalettes));

        content.palettes.push(pastel());
        assert_eq!(content.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_off_catalog_fonts() {
        let mut content = BrandContent {
            names: vec![NameCandidate::default()],
            palettes: vec![pastel()],
            ..BrandContent::default()
        };
        content.fonts.logo = "Comic Sans".into();
        assert!(matches!(
            content.validate(),
            Err(ContentError::UnknownFont(_))
        ));
    }

    #[test]
    fn stale_palette_index_falls_back_to_first() {
        let content = BrandContent {
            palettes: vec![pastel()],
            selected_palette: 9,
            ..BrandContent::default()
        };
        assert_eq!(content.selected_palette(), Some(&pastel()));
    }

    #[test]
    fn icon_prompt_carries_brand_facts() {
        let prompt = icon_prompt(
            "Acme",
            "Technology",
            &pastel(),
            MarkKind::Wordmark,
            Tone::Positive,
        );
        assert!(prompt.contains("wordmark logo with stylized text 'Acme'"));
        assert!(prompt.contains("Technology industry"));
        assert!(prompt.contains("energetic, vibrant, uplifting"));
        assert!(prompt.contains("#ffd6e8"));
        // Only the first three palette colors feed the prompt.
        assert!(!prompt.contains("#fff4e0"));
    }

    #[test]
    fn bundle_roundtrips_through_json() {
        let content = BrandContent {
            names: vec![NameCandidate {
                name: "Lumivale".into(),
                meaning: "light + valley".into(),
                taglines: vec!["Brighter every day".into()],
            }],
            palettes: vec![pastel()],
            ..BrandContent::default()
        };
        let json = serde_json::to_string(&content).unwrap();
        let restored: BrandContent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, content);
    }
}
