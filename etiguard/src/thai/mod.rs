//! Thai-Language Analysis Stack
//!
//! Character-set validation and conversion against the ETSI TS 101 756
//! Thai profile (0x0E), cultural content classification, Buddhist
//! calendar policy lookup, and the engine orchestrating them per
//! broadcast item.

pub mod analyzer;
pub mod calendar;
pub mod charset;
pub mod cultural;
pub mod engine;
pub mod types;

pub use analyzer::ThaiCharacterAnalyzer;
pub use calendar::{BuddhistCalendar, BUDDHIST_ERA_OFFSET};
pub use charset::CharacterProfileTable;
pub use cultural::{CulturalContentAnalyzer, CulturalScoringConfig};
pub use engine::{ThaiAnalysisEngine, DLS_MAX_CHARS};
pub use types::{
    CharacterValidation, CulturalAnalysis, DLSThaiAnalysis, ProfileConversion, ThaiMetadata,
    ThaiTextFields,
};
