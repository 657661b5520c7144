//! ETSI Standards Validation Engine
//!
//! One [`StandardValidator`] per standard, selected by its
//! [`EtsiStandard`] tag and registered with the engine; adding a standard
//! never touches the aggregation logic.

pub mod validators;

use std::sync::Arc;
use std::time::Instant;

use crate::compliance::{
    ComplianceResult, ETIAnalysisReport, EtsiStandard, ReportAssembler, Severity,
};
use crate::core::{AnalyzerConfig, ComplianceSink, EtiGuardError};
use crate::parser::eti::ETI_NI_FRAME_SIZE;
use crate::thai::{ThaiAnalysisEngine, ThaiMetadata, ThaiTextFields};

/// Shared inputs for one validation pass.
pub struct ValidationContext<'a> {
    /// Strictness in [0, 1]; scales the Error/Warning boundary inside
    /// the 70-84 band, never structural pass/fail.
    pub strictness: f64,
    /// Thai engine for character-level label checks, when enabled.
    pub thai: Option<&'a ThaiAnalysisEngine>,
}

impl ValidationContext<'_> {
    /// Score-to-severity mapping with the strictness-scaled boundary:
    /// within 70-84 a finding is Error only when
    /// `score < 70 + 15 * strictness`.
    pub fn severity_for(&self, score: f64) -> Severity {
        if score >= 95.0 {
            Severity::Info
        } else if score >= 85.0 {
            Severity::Warning
        } else if score >= 70.0 {
            if score < 70.0 + 15.0 * self.strictness {
                Severity::Error
            } else {
                Severity::Warning
            }
        } else {
            Severity::Critical
        }
    }

    /// Build a finding with context-aware severity.
    pub fn result(
        &self,
        standard: EtsiStandard,
        check_name: &str,
        description: &str,
        passed: bool,
        score: f64,
        details: impl Into<String>,
    ) -> ComplianceResult {
        ComplianceResult::new(standard, check_name, description, passed, score, details)
            .with_severity(self.severity_for(score))
    }

    /// Dedicated finding for a buffer below the standard's structural
    /// minimum. Emitted instead of attempting partial parsing.
    pub fn insufficient_data(
        &self,
        standard: EtsiStandard,
        required: usize,
        actual: usize,
    ) -> ComplianceResult {
        ComplianceResult::new(
            standard,
            "insufficient_data",
            "Minimum structural length",
            false,
            0.0,
            format!(
                "buffer of {} bytes is shorter than the {} bytes required for {} checks",
                actual,
                required,
                standard.name()
            ),
        )
        .with_metadata("category", "insufficient_data")
        .with_recommendation("Supply a complete extracted frame or FIG structure")
    }
}

/// Structural validator for a single ETSI standard.
pub trait StandardValidator: Send + Sync {
    fn standard(&self) -> EtsiStandard;

    /// Minimum buffer length the standard's checks structurally require.
    fn min_buffer_len(&self) -> usize;

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult>;
}

/// Runs every registered standard validator over a buffer and assembles
/// the findings into one report.
pub struct EtsiStandardsAnalyzer {
    config: AnalyzerConfig,
    validators: Vec<Box<dyn StandardValidator>>,
    thai: Option<Arc<ThaiAnalysisEngine>>,
    sink: Option<Arc<dyn ComplianceSink>>,
}

impl EtsiStandardsAnalyzer {
    /// Build an analyzer with the default validator set. A Thai engine is
    /// constructed when the configuration enables Thai validation.
    pub fn new(config: AnalyzerConfig) -> Result<Self, EtiGuardError> {
        let thai = config
            .thai_validation_enabled
            .then(|| Arc::new(ThaiAnalysisEngine::new()));
        Self::with_thai_engine(config, thai)
    }

    /// Build an analyzer around an existing (possibly shared) Thai
    /// engine. Enabling Thai validation without supplying an engine is a
    /// contract violation surfaced at construction, never per analysis.
    pub fn with_thai_engine(
        config: AnalyzerConfig,
        thai: Option<Arc<ThaiAnalysisEngine>>,
    ) -> Result<Self, EtiGuardError> {
        config.validate()?;
        if config.thai_validation_enabled && thai.is_none() {
            return Err(EtiGuardError::Configuration(
                "Thai validation enabled but no Thai analysis engine supplied".to_string(),
            ));
        }

        Ok(Self {
            config,
            validators: Self::default_validators(),
            thai,
            sink: None,
        })
    }

    /// The nine standard validators, in report order.
    pub fn default_validators() -> Vec<Box<dyn StandardValidator>> {
        vec![
            Box::new(validators::En302077Validator),
            Box::new(validators::En300401Validator),
            Box::new(validators::Ts102563Validator),
            Box::new(validators::Ts101756Validator),
            Box::new(validators::Tr1014963Validator),
            Box::new(validators::Ts101499Validator),
            Box::new(validators::Ts102818Validator),
            Box::new(validators::Ts103551Validator),
            Box::new(validators::Ts103176Validator),
        ]
    }

    /// Attach a fire-and-forget result sink.
    pub fn with_sink(mut self, sink: Arc<dyn ComplianceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Register an additional validator. New standards extend the report
    /// without touching the aggregator.
    pub fn add_validator(&mut self, validator: Box<dyn StandardValidator>) {
        self.validators.push(validator);
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn thai_engine(&self) -> Option<&Arc<ThaiAnalysisEngine>> {
        self.thai.as_ref()
    }

    /// Run all registered validators over one extracted frame or FIG
    /// buffer.
    pub fn analyze_complete_eti(&self, source: &str, data: &[u8]) -> ETIAnalysisReport {
        self.analyze_complete_eti_with_text(source, data, None)
    }

    /// As [`Self::analyze_complete_eti`], with pre-extracted Thai text
    /// fields folded into the TS 101 756 result set.
    pub fn analyze_complete_eti_with_text(
        &self,
        source: &str,
        data: &[u8],
        text_fields: Option<&ThaiTextFields>,
    ) -> ETIAnalysisReport {
        let started = Instant::now();
        let ctx = ValidationContext {
            strictness: self.config.validation_strictness,
            thai: self.thai.as_deref(),
        };

        let mut standard_results = Vec::with_capacity(self.validators.len());
        for validator in &self.validators {
            let standard = validator.standard();
            let results = if data.len() < validator.min_buffer_len() {
                vec![ctx.insufficient_data(standard, validator.min_buffer_len(), data.len())]
            } else {
                validator.validate(data, &ctx)
            };
            standard_results.push((standard, results));
        }

        // Thai findings fold into the TS 101 756 result set.
        let thai_analysis = match (&self.thai, text_fields) {
            (Some(engine), Some(fields)) => {
                let metadata = engine.analyze_metadata(fields);
                let thai_results = self.thai_results(&ctx, &metadata);
                if let Some((_, results)) = standard_results
                    .iter_mut()
                    .find(|(s, _)| *s == EtsiStandard::Ts101756)
                {
                    results.extend(thai_results);
                }
                Some(metadata)
            }
            _ => None,
        };

        let frames = if data.is_empty() {
            0
        } else {
            (data.len() / ETI_NI_FRAME_SIZE).max(1) as u64
        };

        let report = ReportAssembler::assemble(
            source,
            standard_results,
            thai_analysis,
            frames,
            started.elapsed(),
        );

        tracing::debug!(
            source,
            overall = report.overall_compliance_score,
            violations = report.total_violations_found,
            "completed ETI compliance analysis"
        );

        self.forward_to_sink(&report);
        report
    }

    fn thai_results(
        &self,
        ctx: &ValidationContext<'_>,
        metadata: &ThaiMetadata,
    ) -> Vec<ComplianceResult> {
        let standard = EtsiStandard::Ts101756;
        let mut results = Vec::new();

        let character_mean = metadata
            .field_validations()
            .iter()
            .map(|v| v.compliance_score)
            .sum::<f64>()
            / 4.0;
        let character_ok = metadata
            .field_validations()
            .iter()
            .all(|v| v.profile_compliant && v.renderable);
        let issue_count: usize = metadata
            .field_validations()
            .iter()
            .map(|v| v.issues.len())
            .sum();
        results.push(
            ctx.result(
                standard,
                "thai_character_validation",
                "Metadata fields against the Thai profile 0x0E",
                character_ok,
                character_mean,
                format!(
                    "{} character issue(s) across title/artist/album/genre",
                    issue_count
                ),
            )
            .with_metadata("invalid_chars", issue_count.to_string()),
        );

        let cultural = &metadata.cultural_analysis;
        let mut cultural_result = ctx
            .result(
                standard,
                "thai_cultural_content",
                "Cultural appropriateness of metadata text",
                cultural.appropriate_language,
                cultural.cultural_compliance,
                format!("classified as {} content", cultural.cultural_category),
            )
            .with_metadata("category", cultural.cultural_category.clone());
        if let Some(engine) = &self.thai {
            if let Some(recommendation) = engine
                .cultural_analyzer()
                .content_recommendations(cultural)
                .into_iter()
                .next()
            {
                cultural_result = cultural_result.with_recommendation(recommendation);
            }
        }
        results.push(cultural_result);

        let level = metadata.compliance_level();
        results.push(
            ctx.result(
                standard,
                "thai_overall_compliance",
                "Weighted Thai metadata compliance",
                metadata.overall_compliance >= 70.0,
                metadata.overall_compliance,
                format!("overall Thai compliance level: {}", level),
            )
            .with_metadata("compliance_level", level.to_string()),
        );

        results
    }

    fn forward_to_sink(&self, report: &ETIAnalysisReport) {
        let Some(sink) = &self.sink else {
            return;
        };

        // Government incident reporting forwards each serious violation
        // individually; the full report always goes out.
        if self.config.government_reporting_enabled {
            for result in report
                .all_results()
                .filter(|r| r.is_violation() && r.severity >= Severity::Error)
            {
                sink.submit_result(result);
            }
        }
        sink.submit_report(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_boundary_scales_with_strictness() {
        let lenient = ValidationContext {
            strictness: 0.0,
            thai: None,
        };
        let strict = ValidationContext {
            strictness: 1.0,
            thai: None,
        };

        assert_eq!(lenient.severity_for(75.0), Severity::Warning);
        assert_eq!(strict.severity_for(75.0), Severity::Error);

        // Bands outside 70-84 are unaffected.
        assert_eq!(lenient.severity_for(69.9), Severity::Critical);
        assert_eq!(strict.severity_for(69.9), Severity::Critical);
        assert_eq!(lenient.severity_for(85.0), Severity::Warning);
        assert_eq!(strict.severity_for(96.0), Severity::Info);
    }

    #[test]
    fn test_insufficient_data_finding_shape() {
        let ctx = ValidationContext {
            strictness: 1.0,
            thai: None,
        };
        let finding = ctx.insufficient_data(EtsiStandard::En300401, 8, 0);
        assert_eq!(finding.check_name, "insufficient_data");
        assert!(!finding.passed);
        assert_eq!(finding.score, 0.0);
        assert_eq!(finding.severity, Severity::Critical);
    }
}
