//! Core configuration, error type and analysis facade.
//! No transport, CLI or serialization dependencies.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analyzer::EtsiStandardsAnalyzer;
use crate::compliance::{ComplianceResult, ETIAnalysisReport};
use crate::thai::ThaiTextFields;

#[derive(Debug, thiserror::Error)]
pub enum EtiGuardError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Analyzer configuration, supplied at construction and static for the
/// lifetime of an analyzer instance. Changing strictness means
/// reconstructing the analyzer, not mutating it mid-analysis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Strictness in [0, 1]: 0 is lenient, 1 is strict. Scales which
    /// borderline failures are treated as Error vs Warning; never
    /// changes whether a check structurally passes.
    pub validation_strictness: f64,
    pub thai_validation_enabled: bool,
    /// Forward individual serious violations to the attached sink for
    /// incident reporting.
    pub government_reporting_enabled: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            validation_strictness: 1.0,
            thai_validation_enabled: true,
            government_reporting_enabled: false,
        }
    }
}

impl AnalyzerConfig {
    /// Construction-time contract check.
    pub fn validate(&self) -> Result<(), EtiGuardError> {
        if !self.validation_strictness.is_finite()
            || !(0.0..=1.0).contains(&self.validation_strictness)
        {
            return Err(EtiGuardError::Configuration(format!(
                "validation_strictness must be within [0, 1], got {}",
                self.validation_strictness
            )));
        }
        Ok(())
    }
}

/// Fire-and-forget consumer of analysis output, e.g. a monitoring
/// service bridge. The core never retries or awaits acknowledgement.
pub trait ComplianceSink: Send + Sync {
    fn submit_result(&self, result: &ComplianceResult);
    fn submit_report(&self, report: &ETIAnalysisReport);
}

/// Convenience facade over the standards engine.
pub struct EtiGuardCore;

impl EtiGuardCore {
    /// Analyze one extracted ETI frame or FIG buffer.
    pub fn analyze_frame(
        source: &str,
        data: &[u8],
        config: AnalyzerConfig,
    ) -> Result<ETIAnalysisReport, EtiGuardError> {
        let analyzer = EtsiStandardsAnalyzer::new(config)?;
        Ok(analyzer.analyze_complete_eti(source, data))
    }

    /// Analyze a frame together with pre-extracted Thai text fields.
    pub fn analyze_frame_with_text(
        source: &str,
        data: &[u8],
        fields: &ThaiTextFields,
        config: AnalyzerConfig,
    ) -> Result<ETIAnalysisReport, EtiGuardError> {
        let analyzer = EtsiStandardsAnalyzer::new(config)?;
        Ok(analyzer.analyze_complete_eti_with_text(source, data, Some(fields)))
    }

    /// Analyze with an attached sink; the report is forwarded before it
    /// is returned.
    pub fn analyze_frame_with_sink(
        source: &str,
        data: &[u8],
        config: AnalyzerConfig,
        sink: Arc<dyn ComplianceSink>,
    ) -> Result<ETIAnalysisReport, EtiGuardError> {
        let analyzer = EtsiStandardsAnalyzer::new(config)?.with_sink(sink);
        Ok(analyzer.analyze_complete_eti(source, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_out_of_range_strictness() {
        let config = AnalyzerConfig {
            validation_strictness: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyzerConfig {
            validation_strictness: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }
}
