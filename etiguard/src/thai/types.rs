use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compliance::ComplianceLevel;

/// Outcome of validating one text field against the Thai broadcast
/// profile. Pure function output; carries no identity beyond the text it
/// was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterValidation {
    /// The byte sequence decoded as well-formed UTF-8.
    pub valid_encoding: bool,
    /// Every codepoint belongs to the TS 101 756 Thai profile.
    pub profile_compliant: bool,
    /// Every codepoint is drawable on DAB receiver displays.
    pub renderable: bool,
    pub invalid_chars: usize,
    /// Distinct problem categories, each reported once.
    pub issues: Vec<String>,
    /// 0-100; an empty field scores 100 by convention.
    pub compliance_score: f64,
}

impl CharacterValidation {
    /// Validation of an absent field: clean, score 100.
    pub fn empty() -> Self {
        Self {
            valid_encoding: true,
            profile_compliant: true,
            renderable: true,
            invalid_chars: 0,
            issues: Vec::new(),
            compliance_score: 100.0,
        }
    }
}

/// Cultural classification of one text field.
#[derive(Debug, Clone, Serialize)]
pub struct CulturalAnalysis {
    pub has_buddhist_content: bool,
    pub has_royal_content: bool,
    pub has_traditional_content: bool,
    /// Language register matches what the context expects.
    pub appropriate_language: bool,
    /// Highest-priority matching category: royal > buddhist >
    /// traditional > general.
    pub cultural_category: String,
    pub detected_keywords: Vec<String>,
    /// 0-100 cultural appropriateness score.
    pub cultural_compliance: f64,
}

/// Result of converting a UTF-8 string into the broadcast profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileConversion {
    /// Profile-encoded bytes; unmapped codepoints became the fallback
    /// symbol.
    pub encoded: Vec<u8>,
    /// Number of fallback substitutions performed.
    pub substitutions: usize,
}

/// Pre-extracted text fields of one broadcast item.
#[derive(Debug, Clone, Default)]
pub struct ThaiTextFields {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub station_name: String,
}

/// One broadcast item's Thai-language compliance record.
#[derive(Debug, Clone, Serialize)]
pub struct ThaiMetadata {
    pub title_thai: String,
    pub title_profile: Vec<u8>,
    pub artist_thai: String,
    pub artist_profile: Vec<u8>,
    pub album_thai: String,
    pub album_profile: Vec<u8>,
    pub genre_thai: String,
    pub station_name_thai: String,

    pub title_validation: CharacterValidation,
    pub artist_validation: CharacterValidation,
    pub album_validation: CharacterValidation,
    pub genre_validation: CharacterValidation,

    pub cultural_analysis: CulturalAnalysis,

    /// The item carries English alternatives alongside Thai text.
    pub has_english_fallback: bool,
    /// Weighted score: 0.6 character-set mean + 0.4 cultural score.
    /// Always derived; never set independently.
    pub overall_compliance: f64,
    pub timestamp: DateTime<Utc>,
}

impl ThaiMetadata {
    /// Compliance level recomputed from the overall score.
    pub fn compliance_level(&self) -> ComplianceLevel {
        ComplianceLevel::from_score(self.overall_compliance)
    }

    pub fn field_validations(&self) -> [&CharacterValidation; 4] {
        [
            &self.title_validation,
            &self.artist_validation,
            &self.album_validation,
            &self.genre_validation,
        ]
    }
}

/// A Dynamic Label Segment broken into script portions, with length
/// handling against the DAB dynamic-label limit.
#[derive(Debug, Clone, Serialize)]
pub struct DLSThaiAnalysis {
    pub original_text: String,
    pub thai_portion: String,
    pub english_portion: String,
    pub bilingual: bool,
    pub validation: CharacterValidation,
    pub cultural: CulturalAnalysis,
    /// Length of the original text in characters.
    pub segment_length: usize,
    /// True whenever the original text is over the limit, regardless of
    /// split success.
    pub exceeds_limit: bool,
    /// Length-aware sub-segments; a single element when within the limit.
    pub segments: Vec<String>,
}
