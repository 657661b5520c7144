//! Thai analysis orchestration and running compliance statistics.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

use crate::compliance::ComplianceLevel;
use crate::parser::fig::Fig1Label;
use crate::thai::analyzer::ThaiCharacterAnalyzer;
use crate::thai::calendar::BuddhistCalendar;
use crate::thai::cultural::{CulturalContentAnalyzer, CulturalScoringConfig};
use crate::thai::types::{
    CharacterValidation, DLSThaiAnalysis, ThaiMetadata, ThaiTextFields,
};

/// DAB dynamic-label maximum length in characters.
pub const DLS_MAX_CHARS: usize = 128;

/// Weight of the character-set mean in the overall compliance score.
/// Character-set correctness dominates because it gates renderability.
const CHARACTER_WEIGHT: f64 = 0.6;

/// Weight of the cultural score in the overall compliance score.
const CULTURAL_WEIGHT: f64 = 0.4;

#[derive(Debug, Default)]
struct RunningStats {
    total_analyzed: u64,
    score_sum: f64,
    issue_frequency: HashMap<String, u64>,
}

/// Orchestrates character, cultural and calendar analysis per broadcast
/// item, and keeps running aggregate statistics across calls.
///
/// Immutable after construction apart from the statistics block, which is
/// guarded by a single mutex so count and score sum always advance
/// together.
#[derive(Debug)]
pub struct ThaiAnalysisEngine {
    character: ThaiCharacterAnalyzer,
    cultural: CulturalContentAnalyzer,
    calendar: BuddhistCalendar,
    stats: Mutex<RunningStats>,
}

impl ThaiAnalysisEngine {
    pub fn new() -> Self {
        Self::with_cultural_scoring(CulturalScoringConfig::default())
    }

    pub fn with_cultural_scoring(scoring: CulturalScoringConfig) -> Self {
        Self {
            character: ThaiCharacterAnalyzer::new(),
            cultural: CulturalContentAnalyzer::with_scoring(scoring),
            calendar: BuddhistCalendar::new(),
            stats: Mutex::new(RunningStats::default()),
        }
    }

    pub fn character_analyzer(&self) -> &ThaiCharacterAnalyzer {
        &self.character
    }

    pub fn cultural_analyzer(&self) -> &CulturalContentAnalyzer {
        &self.cultural
    }

    pub fn calendar(&self) -> &BuddhistCalendar {
        &self.calendar
    }

    /// Analyze one broadcast item's metadata fields and record the
    /// outcome in the running statistics.
    pub fn analyze_metadata(&self, fields: &ThaiTextFields) -> ThaiMetadata {
        let title_validation = self.character.validate(&fields.title);
        let artist_validation = self.character.validate(&fields.artist);
        let album_validation = self.character.validate(&fields.album);
        let genre_validation = self.character.validate(&fields.genre);

        let combined = [
            fields.title.as_str(),
            fields.artist.as_str(),
            fields.album.as_str(),
            fields.genre.as_str(),
        ]
        .join(" ");
        // Broadcast metadata is announcement text; formal register is
        // expected.
        let cultural_analysis = self.cultural.analyze(combined.trim(), true);

        let character_mean = [
            &title_validation,
            &artist_validation,
            &album_validation,
            &genre_validation,
        ]
        .iter()
        .map(|v| v.compliance_score)
        .sum::<f64>()
            / 4.0;

        let overall_compliance = CHARACTER_WEIGHT * character_mean
            + CULTURAL_WEIGHT * cultural_analysis.cultural_compliance;

        let metadata = ThaiMetadata {
            title_profile: self.character.convert_to_profile(&fields.title).encoded,
            artist_profile: self.character.convert_to_profile(&fields.artist).encoded,
            album_profile: self.character.convert_to_profile(&fields.album).encoded,
            title_thai: fields.title.clone(),
            artist_thai: fields.artist.clone(),
            album_thai: fields.album.clone(),
            genre_thai: fields.genre.clone(),
            station_name_thai: fields.station_name.clone(),
            title_validation,
            artist_validation,
            album_validation,
            genre_validation,
            cultural_analysis,
            has_english_fallback: self.character.detect_mixed_scripts(&combined),
            overall_compliance,
            timestamp: Utc::now(),
        };

        self.update_compliance_statistics(&metadata);
        metadata
    }

    /// Analyze a parsed FIG 1 label. The label text is taken as the
    /// station identification; byte decoding fails soft.
    pub fn analyze_fig1_label(&self, label: &Fig1Label) -> ThaiMetadata {
        let text = String::from_utf8_lossy(label.label_bytes()).into_owned();
        let validation = self.character.validate_bytes(label.label_bytes());
        let cultural_analysis = self.cultural.analyze(&text, true);

        let overall_compliance = CHARACTER_WEIGHT * validation.compliance_score
            + CULTURAL_WEIGHT * cultural_analysis.cultural_compliance;

        let metadata = ThaiMetadata {
            title_thai: text.clone(),
            title_profile: self.character.convert_to_profile(&text).encoded,
            artist_thai: String::new(),
            artist_profile: Vec::new(),
            album_thai: String::new(),
            album_profile: Vec::new(),
            genre_thai: String::new(),
            station_name_thai: text.clone(),
            title_validation: validation,
            artist_validation: CharacterValidation::empty(),
            album_validation: CharacterValidation::empty(),
            genre_validation: CharacterValidation::empty(),
            cultural_analysis,
            has_english_fallback: self.character.detect_mixed_scripts(&text),
            overall_compliance,
            timestamp: Utc::now(),
        };

        self.update_compliance_statistics(&metadata);
        metadata
    }

    /// Analyze a Dynamic Label Segment, splitting text over the DAB
    /// length limit into independently analyzable sub-segments.
    pub fn analyze_dls_content(&self, text: &str) -> DLSThaiAnalysis {
        let (thai_portion, english_portion) = self.character.separate_thai_english(text);
        let validation = self.character.validate(text);
        let cultural = self.cultural.analyze(text, false);

        let segment_length = text.chars().count();
        let exceeds_limit = segment_length > DLS_MAX_CHARS;
        let segments = if exceeds_limit {
            split_dls_text(text, DLS_MAX_CHARS)
        } else {
            vec![text.to_string()]
        };

        let score = CHARACTER_WEIGHT * validation.compliance_score
            + CULTURAL_WEIGHT * cultural.cultural_compliance;
        self.record_analysis(score, &validation.issues);

        DLSThaiAnalysis {
            original_text: text.to_string(),
            bilingual: self.character.detect_mixed_scripts(text),
            thai_portion,
            english_portion,
            validation,
            cultural,
            segment_length,
            exceeds_limit,
            segments,
        }
    }

    /// Compliance level for a score, via the fixed threshold bands.
    pub fn compliance_level(score: f64) -> ComplianceLevel {
        ComplianceLevel::from_score(score)
    }

    /// Fold one completed analysis into the running statistics. Count,
    /// score sum and issue frequencies advance under one lock so
    /// concurrent analyses never observe a partial update.
    pub fn update_compliance_statistics(&self, metadata: &ThaiMetadata) {
        let issues: Vec<String> = metadata
            .field_validations()
            .iter()
            .flat_map(|v| v.issues.iter().cloned())
            .collect();
        self.record_analysis(metadata.overall_compliance, &issues);
    }

    fn record_analysis(&self, score: f64, issues: &[String]) {
        let mut stats = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        stats.total_analyzed += 1;
        stats.score_sum += score;
        for issue in issues {
            *stats.issue_frequency.entry(issue.clone()).or_insert(0) += 1;
        }
    }

    /// Arithmetic mean of all recorded compliance scores; 0 before the
    /// first analysis.
    pub fn running_compliance_average(&self) -> f64 {
        let stats = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        if stats.total_analyzed == 0 {
            0.0
        } else {
            stats.score_sum / stats.total_analyzed as f64
        }
    }

    pub fn total_analyzed_count(&self) -> u64 {
        self.stats
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .total_analyzed
    }

    pub fn issue_frequency(&self) -> HashMap<String, u64> {
        self.stats
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .issue_frequency
            .clone()
    }

    /// Explicit reset, not exposed to analysis callers.
    pub fn reset_statistics(&self) {
        let mut stats = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        *stats = RunningStats::default();
    }

    /// True when the date's designation calls for stricter content
    /// validation.
    pub fn should_use_special_validation(&self, date: NaiveDate) -> bool {
        self.calendar.requires_special_handling(date)
    }

    pub fn date_specific_guidelines(&self, date: NaiveDate) -> Vec<String> {
        self.calendar.content_guidelines(date).to_vec()
    }
}

impl Default for ThaiAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into chunks of at most `limit` characters. Cuts land on
/// `char` boundaries by construction; when a cut would land mid-token the
/// split backs off to the last whitespace inside the chunk.
fn split_dls_text(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let mut end = (start + limit).min(chars.len());

        if end < chars.len() && !chars[end].is_whitespace() && !chars[end - 1].is_whitespace() {
            if let Some(pos) = chars[start..end].iter().rposition(|c| c.is_whitespace()) {
                end = start + pos + 1;
            }
        }

        segments.push(chars[start..end].iter().collect());
        start = end;
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_continuous_text_into_even_chunks() {
        let text: String = std::iter::repeat('ก').take(300).collect();
        let segments = split_dls_text(&text, DLS_MAX_CHARS);
        assert_eq!(segments.len(), 3); // ceil(300 / 128)
        assert_eq!(segments.concat(), text);
        assert!(segments
            .iter()
            .all(|s| s.chars().count() <= DLS_MAX_CHARS));
    }

    #[test]
    fn test_split_backs_off_to_whitespace() {
        // 120 Thai chars, a space, then 60 more: the second cut would
        // land mid-token without the backoff.
        let mut text: String = std::iter::repeat('ก').take(120).collect();
        text.push(' ');
        text.extend(std::iter::repeat('ข').take(60));

        let segments = split_dls_text(&text, DLS_MAX_CHARS);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].ends_with(' '));
        assert!(segments[1].chars().all(|c| c == 'ข'));
        assert_eq!(segments.concat(), text);
    }

    #[test]
    fn test_overall_compliance_weighting() {
        let engine = ThaiAnalysisEngine::new();
        let fields = ThaiTextFields {
            title: "สวัสดี".to_string(),
            artist: "นักร้อง".to_string(),
            album: "อัลบั้ม".to_string(),
            genre: "ลูกทุ่ง".to_string(),
            station_name: "สถานีไทย".to_string(),
        };
        let metadata = engine.analyze_metadata(&fields);
        // All fields are clean profile text with formal register absent:
        // character mean 100, cultural 85.
        assert_eq!(metadata.overall_compliance, 0.6 * 100.0 + 0.4 * 85.0);
    }

    #[test]
    fn test_statistics_advance_together() {
        let engine = ThaiAnalysisEngine::new();
        let fields = ThaiTextFields {
            title: "เพลงไทย".to_string(),
            ..Default::default()
        };
        engine.analyze_metadata(&fields);
        engine.analyze_metadata(&fields);

        assert_eq!(engine.total_analyzed_count(), 2);
        assert!(engine.running_compliance_average() > 0.0);

        engine.reset_statistics();
        assert_eq!(engine.total_analyzed_count(), 0);
        assert_eq!(engine.running_compliance_average(), 0.0);
    }
}
