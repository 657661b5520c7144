//! EtiGuard - ETSI DAB+ compliance validation library
//!
//! This library inspects extracted DAB+ multiplex data (ETI frames and
//! FIG structures) and scores it against the relevant ETSI broadcasting
//! standards, with a Thai-language analysis stack validating metadata
//! against the TS 101 756 Thai profile (0x0E) and national content
//! guidelines.
//!
//! # Quick Start
//!
//! ```no_run
//! use etiguard::{AnalyzerConfig, EtiGuardCore};
//!
//! let frame: Vec<u8> = vec![]; // one extracted ETI frame
//! let report = EtiGuardCore::analyze_frame(
//!     "ensemble.eti",
//!     &frame,
//!     AnalyzerConfig::default(),
//! ).unwrap();
//!
//! for (standard, results) in &report.standard_results {
//!     for result in results {
//!         println!("[{}] {}: {}", result.severity, standard.name(), result.details);
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - **Standards validation**: nine ETSI standards, one validator each
//! - **Thai character analysis**: profile 0x0E validation and conversion
//! - **Cultural content checks**: keyword classification and scoring
//! - **Buddhist calendar**: date conversion and broadcast-day guidelines

pub mod analyzer;
pub mod compliance;
pub mod core;
pub mod parser;
pub mod thai;

// Re-export main types
pub use crate::core::{AnalyzerConfig, ComplianceSink, EtiGuardCore, EtiGuardError};
pub use analyzer::{EtsiStandardsAnalyzer, StandardValidator, ValidationContext};
pub use compliance::{
    ComplianceLevel, ComplianceResult, ETIAnalysisReport, EtsiStandard, ReportAssembler, Severity,
};
pub use thai::{
    BuddhistCalendar, CharacterValidation, CulturalAnalysis, CulturalContentAnalyzer,
    DLSThaiAnalysis, ThaiAnalysisEngine, ThaiCharacterAnalyzer, ThaiMetadata, ThaiTextFields,
};

/// Parse the SYNC and FC fields of an ETI frame (convenience wrapper).
pub fn parse_frame_header(data: &[u8]) -> Option<parser::EtiFrameHeader> {
    parser::EtiFrameHeader::parse(data)
}

/// Parse a FIG 1 label payload (convenience wrapper).
pub fn parse_fig1_label(data: &[u8]) -> Option<parser::Fig1Label> {
    parser::Fig1Label::parse(data)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AnalyzerConfig, ComplianceLevel, ComplianceResult, ETIAnalysisReport, EtiGuardCore,
        EtiGuardError, EtsiStandard, EtsiStandardsAnalyzer, Severity, ThaiAnalysisEngine,
        ThaiTextFields,
    };
}
