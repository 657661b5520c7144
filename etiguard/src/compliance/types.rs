use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ETSI standards checked by the validation engine.
///
/// Declaration order is the order standards appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EtsiStandard {
    /// EN 302 077 - Transmitting equipment for the DAB service
    En302077,
    /// EN 300 401 - Core DAB standard (ETI frame and FIC structure)
    En300401,
    /// TS 102 563 - DAB+ audio coding
    Ts102563,
    /// TS 101 756 - Character sets (Thai profile 0x0E)
    Ts101756,
    /// TR 101 496-3 - Broadcast network implementation guidelines
    Tr1014963,
    /// TS 101 499 - SlideShow user application
    Ts101499,
    /// TS 102 818 - Service and Programme Information
    Ts102818,
    /// TS 103 551 - TPEG services
    Ts103551,
    /// TS 103 176 - Service information features
    Ts103176,
}

impl EtsiStandard {
    /// All standards, in report order.
    pub const ALL: [EtsiStandard; 9] = [
        EtsiStandard::En302077,
        EtsiStandard::En300401,
        EtsiStandard::Ts102563,
        EtsiStandard::Ts101756,
        EtsiStandard::Tr1014963,
        EtsiStandard::Ts101499,
        EtsiStandard::Ts102818,
        EtsiStandard::Ts103551,
        EtsiStandard::Ts103176,
    ];

    /// Official document number, e.g. `"EN 300 401"`.
    pub fn name(&self) -> &'static str {
        match self {
            EtsiStandard::En302077 => "EN 302 077",
            EtsiStandard::En300401 => "EN 300 401",
            EtsiStandard::Ts102563 => "TS 102 563",
            EtsiStandard::Ts101756 => "TS 101 756",
            EtsiStandard::Tr1014963 => "TR 101 496-3",
            EtsiStandard::Ts101499 => "TS 101 499",
            EtsiStandard::Ts102818 => "TS 102 818",
            EtsiStandard::Ts103551 => "TS 103 551",
            EtsiStandard::Ts103176 => "TS 103 176",
        }
    }

    /// Short subject line of the standard.
    pub fn title(&self) -> &'static str {
        match self {
            EtsiStandard::En302077 => "RF Transmitting Equipment",
            EtsiStandard::En300401 => "Core DAB Standard",
            EtsiStandard::Ts102563 => "DAB+ Audio Coding",
            EtsiStandard::Ts101756 => "Character Sets (Thai Profile)",
            EtsiStandard::Tr1014963 => "Broadcast Network Implementation",
            EtsiStandard::Ts101499 => "SlideShow User Application",
            EtsiStandard::Ts102818 => "Service Programme Information",
            EtsiStandard::Ts103551 => "TPEG Services",
            EtsiStandard::Ts103176 => "Service Information Features",
        }
    }
}

impl fmt::Display for EtsiStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.title())
    }
}

/// Severity of an individual compliance finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Base score-to-severity band mapping: >=95 Info, 85-94 Warning,
    /// 70-84 Error, <70 Critical. Strictness-aware adjustment of the
    /// Error/Warning boundary lives in the validation context.
    pub fn for_score(score: f64) -> Severity {
        if score >= 95.0 {
            Severity::Info
        } else if score >= 85.0 {
            Severity::Warning
        } else if score >= 70.0 {
            Severity::Error
        } else {
            Severity::Critical
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Four-band classification derived from a 0-100 compliance score.
///
/// Always recomputed from the score via [`ComplianceLevel::from_score`];
/// never stored independently of the score that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceLevel {
    /// 95-100
    Compliant,
    /// 85-94
    Warning,
    /// 70-84
    NonCompliant,
    /// Below 70
    Critical,
}

impl ComplianceLevel {
    /// Band boundaries are inclusive of the lower bound of each band.
    pub fn from_score(score: f64) -> ComplianceLevel {
        if score >= 95.0 {
            ComplianceLevel::Compliant
        } else if score >= 85.0 {
            ComplianceLevel::Warning
        } else if score >= 70.0 {
            ComplianceLevel::NonCompliant
        } else {
            ComplianceLevel::Critical
        }
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplianceLevel::Compliant => "Compliant",
            ComplianceLevel::Warning => "Warning",
            ComplianceLevel::NonCompliant => "Non-Compliant",
            ComplianceLevel::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// One atomic compliance finding. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceResult {
    pub id: String,
    pub standard: EtsiStandard,
    pub check_name: String,
    pub description: String,
    pub severity: Severity,
    pub passed: bool,
    /// 0-100 compliance score for this check.
    pub score: f64,
    pub details: String,
    pub recommendation: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Open string-to-string bag for check-specific extras.
    pub metadata: HashMap<String, String>,
}

impl ComplianceResult {
    /// Build a finding with severity derived from the score bands.
    pub fn new(
        standard: EtsiStandard,
        check_name: &str,
        description: &str,
        passed: bool,
        score: f64,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            standard,
            check_name: check_name.to_string(),
            description: description.to_string(),
            severity: Severity::for_score(score),
            passed,
            score,
            details: details.into(),
            recommendation: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn is_violation(&self) -> bool {
        !self.passed
    }
}
