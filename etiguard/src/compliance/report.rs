//! Analysis report assembly.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compliance::types::{ComplianceLevel, ComplianceResult, EtsiStandard, Severity};
use crate::thai::ThaiMetadata;

/// Aggregate over one analyzed buffer. Constructed once per analysis run
/// and never mutated after assembly.
///
/// `standard_results` is an ordered collection of per-standard finding
/// lists: standards appear in enumeration order, findings within a
/// standard in check-execution order.
#[derive(Debug, Clone, Serialize)]
pub struct ETIAnalysisReport {
    /// Source identifier (filename, stream id, ...).
    pub source: String,
    pub analysis_time: DateTime<Utc>,
    /// Simple mean of all per-standard mean scores; each standard
    /// contributes equally regardless of how many checks it ran.
    pub overall_compliance_score: f64,
    pub standard_results: Vec<(EtsiStandard, Vec<ComplianceResult>)>,
    pub thai_analysis: Option<ThaiMetadata>,
    pub thai_compliance_level: Option<ComplianceLevel>,
    pub total_frames_analyzed: u64,
    pub total_violations_found: u64,
    pub analysis_duration: Duration,
    pub critical_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub executive_summary: String,
}

impl ETIAnalysisReport {
    pub fn results_for(&self, standard: EtsiStandard) -> Option<&[ComplianceResult]> {
        self.standard_results
            .iter()
            .find(|(s, _)| *s == standard)
            .map(|(_, results)| results.as_slice())
    }

    pub fn all_results(&self) -> impl Iterator<Item = &ComplianceResult> {
        self.standard_results
            .iter()
            .flat_map(|(_, results)| results.iter())
    }

    pub fn total_checks(&self) -> usize {
        self.standard_results.iter().map(|(_, r)| r.len()).sum()
    }

    pub fn has_critical(&self) -> bool {
        !self.critical_issues.is_empty()
    }

    pub fn compliance_level(&self) -> ComplianceLevel {
        ComplianceLevel::from_score(self.overall_compliance_score)
    }
}

/// Merges per-standard findings and the Thai record into one report.
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn assemble(
        source: &str,
        standard_results: Vec<(EtsiStandard, Vec<ComplianceResult>)>,
        thai_analysis: Option<ThaiMetadata>,
        total_frames_analyzed: u64,
        analysis_duration: Duration,
    ) -> ETIAnalysisReport {
        let overall_compliance_score = overall_score(&standard_results);

        let mut total_violations_found = 0u64;
        let mut critical_issues = Vec::new();
        let mut recommendations = Vec::new();

        for (standard, results) in &standard_results {
            for result in results {
                if result.is_violation() {
                    total_violations_found += 1;
                }
                if result.severity == Severity::Critical {
                    critical_issues.push(format!(
                        "{} {}: {}",
                        standard.name(),
                        result.check_name,
                        result.details
                    ));
                }
                if let Some(recommendation) = &result.recommendation {
                    if !recommendations.contains(recommendation) {
                        recommendations.push(recommendation.clone());
                    }
                }
            }
        }

        let thai_compliance_level = thai_analysis.as_ref().map(|m| m.compliance_level());

        let executive_summary = executive_summary(
            source,
            overall_compliance_score,
            &standard_results,
            total_violations_found,
            &critical_issues,
            thai_compliance_level,
        );

        ETIAnalysisReport {
            source: source.to_string(),
            analysis_time: Utc::now(),
            overall_compliance_score,
            standard_results,
            thai_analysis,
            thai_compliance_level,
            total_frames_analyzed,
            total_violations_found,
            analysis_duration,
            critical_issues,
            recommendations,
            executive_summary,
        }
    }
}

/// Mean of per-standard mean scores. A standard that produced no findings
/// is excluded rather than counted as zero.
fn overall_score(standard_results: &[(EtsiStandard, Vec<ComplianceResult>)]) -> f64 {
    let means: Vec<f64> = standard_results
        .iter()
        .filter(|(_, results)| !results.is_empty())
        .map(|(_, results)| {
            results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
        })
        .collect();

    if means.is_empty() {
        0.0
    } else {
        means.iter().sum::<f64>() / means.len() as f64
    }
}

fn executive_summary(
    source: &str,
    overall: f64,
    standard_results: &[(EtsiStandard, Vec<ComplianceResult>)],
    violations: u64,
    critical_issues: &[String],
    thai_level: Option<ComplianceLevel>,
) -> String {
    let total_checks: usize = standard_results.iter().map(|(_, r)| r.len()).sum();
    let level = ComplianceLevel::from_score(overall);

    let mut summary = format!(
        "ETI analysis of {}: overall compliance {:.1}% ({}) across {} standards, \
         {} of {} checks failed.",
        source,
        overall,
        level,
        standard_results.len(),
        violations,
        total_checks,
    );

    if let Some(first) = critical_issues.first() {
        summary.push_str(&format!(
            " {} critical issue(s), most severe: {}.",
            critical_issues.len(),
            first
        ));
    }

    if let Some(thai_level) = thai_level {
        summary.push_str(&format!(" Thai-language compliance: {}.", thai_level));
    }

    summary
}
