//! Buddhist-calendar date conversion and broadcast-day lookup.
//!
//! Holy days and festivals come from an embedded table keyed by calendar
//! day. Lunar observances recur on the traditional calendar; their table
//! entries carry the currently observed dates and are refreshed by data
//! updates, never derived astronomically.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// Buddhist Era year offset used in Thai official contexts.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

const EMBEDDED_CALENDAR: &str = include_str!("../../data/buddhist_calendar.json");

const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

#[derive(Debug, Clone, Deserialize)]
struct CalendarEntry {
    month: u32,
    day: u32,
    name: String,
    #[serde(default)]
    name_thai: Option<String>,
    holy_day: bool,
    major_festival: bool,
    #[serde(default)]
    guidelines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CalendarTable {
    entries: Vec<CalendarEntry>,
}

/// Gregorian to Buddhist-Era conversion plus the broadcast-day table.
#[derive(Debug, Clone)]
pub struct BuddhistCalendar {
    entries: HashMap<(u32, u32), CalendarEntry>,
}

impl BuddhistCalendar {
    pub fn new() -> Self {
        let entries = match serde_json::from_str::<CalendarTable>(EMBEDDED_CALENDAR) {
            Ok(table) => table
                .entries
                .into_iter()
                .map(|e| ((e.month, e.day), e))
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to parse embedded Buddhist calendar table: {}", e);
                HashMap::new()
            }
        };
        Self { entries }
    }

    pub fn to_buddhist_year(gregorian_year: i32) -> i32 {
        gregorian_year + BUDDHIST_ERA_OFFSET
    }

    /// Render a date in Thai official style, e.g.
    /// `5 ธันวาคม พ.ศ. 2569`.
    pub fn format_buddhist_date(&self, date: NaiveDate) -> String {
        let month = THAI_MONTHS[(date.month0()) as usize];
        format!(
            "{} {} พ.ศ. {}",
            date.day(),
            month,
            Self::to_buddhist_year(date.year())
        )
    }

    pub fn is_holy_day(&self, date: NaiveDate) -> bool {
        self.entry_for(date).map(|e| e.holy_day).unwrap_or(false)
    }

    pub fn is_major_festival(&self, date: NaiveDate) -> bool {
        self.entry_for(date)
            .map(|e| e.major_festival)
            .unwrap_or(false)
    }

    pub fn festival_name(&self, date: NaiveDate) -> Option<&str> {
        self.entry_for(date).map(|e| e.name.as_str())
    }

    pub fn festival_name_thai(&self, date: NaiveDate) -> Option<&str> {
        self.entry_for(date).and_then(|e| e.name_thai.as_deref())
    }

    /// Content guidelines attached to the date, or empty when the date
    /// has no special designation.
    pub fn content_guidelines(&self, date: NaiveDate) -> &[String] {
        self.entry_for(date)
            .map(|e| e.guidelines.as_slice())
            .unwrap_or(&[])
    }

    /// True iff the date is a holy day or a major festival.
    pub fn requires_special_handling(&self, date: NaiveDate) -> bool {
        self.is_holy_day(date) || self.is_major_festival(date)
    }

    fn entry_for(&self, date: NaiveDate) -> Option<&CalendarEntry> {
        self.entries.get(&(date.month(), date.day()))
    }
}

impl Default for BuddhistCalendar {
    fn default() -> Self {
        Self::new()
    }
}
