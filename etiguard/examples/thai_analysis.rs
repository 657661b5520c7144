//! Example: using the Thai analysis engine directly (without the
//! standards analyzer).
//! Run with: cargo run --example thai_analysis

use chrono::{Datelike, NaiveDate};
use etiguard::prelude::*;
use etiguard::BuddhistCalendar;

fn main() {
    let engine = ThaiAnalysisEngine::new();

    let fields = ThaiTextFields {
        title: "รายการธรรมะรับอรุณ".to_string(),
        artist: "พระมหาสมปอง".to_string(),
        album: "ธรรมะยามเช้า".to_string(),
        genre: "ศาสนา".to_string(),
        station_name: "สถานีวิทยุพระพุทธศาสนา".to_string(),
    };

    let metadata = engine.analyze_metadata(&fields);
    println!("Title: {}", metadata.title_thai);
    println!("Category: {}", metadata.cultural_analysis.cultural_category);
    println!(
        "Overall compliance: {:.1}% ({})",
        metadata.overall_compliance,
        metadata.compliance_level()
    );

    let dls = engine.analyze_dls_content("ขณะนี้รับฟังรายการธรรมะ Now playing: Morning Dharma");
    println!();
    println!("DLS bilingual: {}", dls.bilingual);
    println!("Thai portion: {}", dls.thai_portion);
    println!("English portion: {}", dls.english_portion);

    if let Some(date) = NaiveDate::from_ymd_opt(2026, 5, 31) {
        println!();
        println!(
            "{} ({} special handling)",
            engine.calendar().format_buddhist_date(date),
            if engine.should_use_special_validation(date) {
                "requires"
            } else {
                "no"
            }
        );
        for guideline in engine.date_specific_guidelines(date) {
            println!("  - {}", guideline);
        }
        println!(
            "Buddhist Era year: {}",
            BuddhistCalendar::to_buddhist_year(date.year())
        );
    }

    println!();
    println!(
        "Running average after {} analyses: {:.1}%",
        engine.total_analyzed_count(),
        engine.running_compliance_average()
    );
}
