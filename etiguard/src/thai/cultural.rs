//! Cultural content classification and appropriateness scoring.
//!
//! Keyword sets load once from an embedded JSON table and are immutable
//! thereafter.

use serde::{Deserialize, Serialize};

use crate::thai::types::CulturalAnalysis;

// Embedded keyword table compiled into the binary.
const EMBEDDED_KEYWORDS: &str = include_str!("../../data/cultural_keywords.json");

#[derive(Debug, Clone, Default, Deserialize)]
struct KeywordTable {
    buddhist: Vec<String>,
    royal: Vec<String>,
    traditional: Vec<String>,
    inappropriate: Vec<String>,
    formal_indicators: Vec<String>,
}

/// Penalty constants for cultural scoring.
///
/// The government-mandated values are not published; these defaults place
/// one inappropriate term in a formal announcement in the Warning band
/// and three terms in the Critical band. Override per deployment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CulturalScoringConfig {
    /// Deduction per detected inappropriate-term occurrence.
    pub inappropriate_penalty: f64,
    /// Deduction when informal register appears where formal register is
    /// expected.
    pub informal_penalty: f64,
}

impl Default for CulturalScoringConfig {
    fn default() -> Self {
        Self {
            inappropriate_penalty: 25.0,
            informal_penalty: 15.0,
        }
    }
}

/// Keyword/heuristic classifier for Thai broadcast text.
#[derive(Debug, Clone)]
pub struct CulturalContentAnalyzer {
    keywords: KeywordTable,
    scoring: CulturalScoringConfig,
}

impl CulturalContentAnalyzer {
    pub fn new() -> Self {
        Self::with_scoring(CulturalScoringConfig::default())
    }

    pub fn with_scoring(scoring: CulturalScoringConfig) -> Self {
        let keywords = match serde_json::from_str::<KeywordTable>(EMBEDDED_KEYWORDS) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Failed to parse embedded cultural keyword table: {}", e);
                KeywordTable::default()
            }
        };
        Self { keywords, scoring }
    }

    pub fn scoring(&self) -> CulturalScoringConfig {
        self.scoring
    }

    /// Classify one text field. Formality expectation is supplied by the
    /// caller, not inferred.
    pub fn analyze(&self, text: &str, expects_formal: bool) -> CulturalAnalysis {
        let has_buddhist_content = self.detect_buddhist_content(text);
        let has_royal_content = self.detect_royal_content(text);
        let has_traditional_content = self.detect_traditional_content(text);
        let inappropriate = self.detect_inappropriate_content(text);
        let formal = self.check_formal_language(text);

        let mut detected_keywords = Vec::new();
        for set in [
            &self.keywords.royal,
            &self.keywords.buddhist,
            &self.keywords.traditional,
        ] {
            detected_keywords.extend(matched_keywords(text, set));
        }

        CulturalAnalysis {
            has_buddhist_content,
            has_royal_content,
            has_traditional_content,
            appropriate_language: inappropriate.is_empty() && (!expects_formal || formal),
            cultural_category: self.classify_content_type(text).to_string(),
            detected_keywords,
            cultural_compliance: self.calculate_cultural_compliance(text, expects_formal),
        }
    }

    pub fn detect_buddhist_content(&self, text: &str) -> bool {
        contains_any(text, &self.keywords.buddhist)
    }

    pub fn detect_royal_content(&self, text: &str) -> bool {
        contains_any(text, &self.keywords.royal)
    }

    pub fn detect_traditional_content(&self, text: &str) -> bool {
        contains_any(text, &self.keywords.traditional)
    }

    /// All inappropriate terms occurring in the text.
    pub fn detect_inappropriate_content(&self, text: &str) -> Vec<String> {
        matched_keywords(text, &self.keywords.inappropriate)
    }

    /// True when at least one formal-register indicator occurs.
    pub fn check_formal_language(&self, text: &str) -> bool {
        contains_any(text, &self.keywords.formal_indicators)
    }

    /// Single highest-priority matching category, fixed precedence:
    /// royal > buddhist > traditional > general.
    pub fn classify_content_type(&self, text: &str) -> &'static str {
        if self.detect_royal_content(text) {
            "royal"
        } else if self.detect_buddhist_content(text) {
            "buddhist"
        } else if self.detect_traditional_content(text) {
            "traditional"
        } else {
            "general"
        }
    }

    /// 100 minus a penalty per inappropriate-term occurrence (floored at
    /// 0), further reduced when informal register appears where formal
    /// register is expected.
    pub fn calculate_cultural_compliance(&self, text: &str, expects_formal: bool) -> f64 {
        let occurrences: usize = self
            .keywords
            .inappropriate
            .iter()
            .map(|term| count_occurrences(text, term))
            .sum();

        let mut score = 100.0 - occurrences as f64 * self.scoring.inappropriate_penalty;
        if expects_formal && !text.is_empty() && !self.check_formal_language(text) {
            score -= self.scoring.informal_penalty;
        }
        score.max(0.0)
    }

    /// Deterministic recommendations from a static lookup keyed by the
    /// analysis flags.
    pub fn content_recommendations(&self, analysis: &CulturalAnalysis) -> Vec<String> {
        let mut recommendations = Vec::new();

        if !analysis.appropriate_language {
            recommendations.push(
                "Review language register; use formal Thai for broadcast announcements"
                    .to_string(),
            );
        }
        if analysis.has_royal_content {
            recommendations.push(
                "Royal content detected; apply royal vocabulary (ratchasap) conventions"
                    .to_string(),
            );
        }
        if analysis.has_buddhist_content {
            recommendations.push(
                "Buddhist content detected; verify scheduling against holy-day guidelines"
                    .to_string(),
            );
        }
        if analysis.cultural_compliance < 70.0 {
            recommendations
                .push("Cultural compliance is critical; withhold until reviewed".to_string());
        }

        recommendations
    }
}

impl Default for CulturalContentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-aware containment: ASCII keywords match case-insensitively, Thai
/// keywords match as-is (Thai script has no case).
fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_ascii() {
        text.to_lowercase().contains(&keyword.to_lowercase())
    } else {
        text.contains(keyword)
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| contains_keyword(text, k))
}

fn matched_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|k| contains_keyword(text, k))
        .cloned()
        .collect()
}

fn count_occurrences(text: &str, term: &str) -> usize {
    if term.is_ascii() {
        text.to_lowercase().matches(&term.to_lowercase()).count()
    } else {
        text.matches(term).count()
    }
}
