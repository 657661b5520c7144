//! Integration tests for the EtiGuard library

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use etiguard::parser::fig::{crc16_ccitt, FIB_DATA_SIZE};
use etiguard::prelude::*;
use etiguard::{ComplianceSink, EtsiStandardsAnalyzer};

fn build_fib(fig_bytes: &[u8]) -> Vec<u8> {
    let mut fib = fig_bytes.to_vec();
    fib.resize(FIB_DATA_SIZE, 0xFF);
    let crc = crc16_ccitt(&fib) ^ 0xFFFF;
    fib.push((crc >> 8) as u8);
    fib.push((crc & 0xFF) as u8);
    fib
}

fn build_valid_frame() -> Vec<u8> {
    let mut frame = vec![0u8; 6144];
    frame[0] = 0xFF;
    frame[1..4].copy_from_slice(&[0x07, 0x3A, 0xB6]);
    frame[5] = 0x80; // FICF=1, NST=0
    let fl: u16 = ((6144 - 8) / 4) as u16;
    frame[6] = (1 << 3) | ((fl >> 8) as u8 & 0x07);
    frame[7] = (fl & 0xFF) as u8;

    let mut figs = vec![0x05, 0x00, 0x4F, 0xFF, 0x00, 0x37];
    figs.push(0x35);
    figs.push(0xE0);
    figs.extend_from_slice(&[0x4F, 0xFF]);
    figs.extend_from_slice(b"THAI RADIO      ");
    figs.extend_from_slice(&[0x00, 0x00]);
    frame[12..44].copy_from_slice(&build_fib(&figs));
    let padding = build_fib(&[]);
    frame[44..76].copy_from_slice(&padding);
    frame[76..108].copy_from_slice(&padding);

    frame[6140..6144].copy_from_slice(&[0x00, 0x00, 0x10, 0x00]);
    frame
}

#[test]
fn test_zero_length_buffer_reports_insufficient_data_everywhere() {
    let report = EtiGuardCore::analyze_frame("empty.eti", &[], AnalyzerConfig::default())
        .expect("default configuration is valid");

    assert_eq!(report.standard_results.len(), 9);
    for (standard, results) in &report.standard_results {
        assert!(
            results.iter().any(|r| r.check_name == "insufficient_data"),
            "{} lacks an insufficient-data finding",
            standard
        );
    }
    assert_eq!(report.overall_compliance_score, 0.0);
    assert_eq!(report.total_frames_analyzed, 0);
}

#[test]
fn test_standards_appear_in_enumeration_order() {
    let report =
        EtiGuardCore::analyze_frame("order.eti", &build_valid_frame(), AnalyzerConfig::default())
            .expect("default configuration is valid");

    let order: Vec<EtsiStandard> = report
        .standard_results
        .iter()
        .map(|(standard, _)| *standard)
        .collect();
    assert_eq!(order, EtsiStandard::ALL.to_vec());
}

#[test]
fn test_thai_fields_fold_into_character_standard() {
    let fields = ThaiTextFields {
        title: "รายการเพลงไทยสากล".to_string(),
        artist: "วงดนตรีกรุงเทพ".to_string(),
        album: "ชุดที่หนึ่ง".to_string(),
        genre: "ลูกกรุง".to_string(),
        station_name: "สถานีวิทยุไทย".to_string(),
    };

    let report = EtiGuardCore::analyze_frame_with_text(
        "thai.eti",
        &build_valid_frame(),
        &fields,
        AnalyzerConfig::default(),
    )
    .expect("default configuration is valid");

    let metadata = report.thai_analysis.as_ref().expect("Thai record present");
    assert_eq!(metadata.title_thai, fields.title);
    assert!(report.thai_compliance_level.is_some());

    let charset_results = report.results_for(EtsiStandard::Ts101756).unwrap();
    for check in [
        "thai_character_validation",
        "thai_cultural_content",
        "thai_overall_compliance",
    ] {
        assert!(
            charset_results.iter().any(|r| r.check_name == check),
            "missing folded Thai finding {}",
            check
        );
    }
}

#[test]
fn test_thai_disabled_produces_no_thai_record() {
    let config = AnalyzerConfig {
        thai_validation_enabled: false,
        ..Default::default()
    };
    let fields = ThaiTextFields {
        title: "เพลงไทย".to_string(),
        ..Default::default()
    };

    let analyzer = EtsiStandardsAnalyzer::new(config).unwrap();
    let report =
        analyzer.analyze_complete_eti_with_text("plain.eti", &build_valid_frame(), Some(&fields));

    assert!(report.thai_analysis.is_none());
    assert!(report.thai_compliance_level.is_none());
}

#[test]
fn test_invalid_strictness_is_a_construction_error() {
    let config = AnalyzerConfig {
        validation_strictness: 2.0,
        ..Default::default()
    };
    assert!(matches!(
        EtsiStandardsAnalyzer::new(config),
        Err(EtiGuardError::Configuration(_))
    ));
}

#[test]
fn test_thai_enabled_without_engine_is_a_construction_error() {
    let config = AnalyzerConfig {
        thai_validation_enabled: true,
        ..Default::default()
    };
    assert!(matches!(
        EtsiStandardsAnalyzer::with_thai_engine(config, None),
        Err(EtiGuardError::Configuration(_))
    ));
}

struct CountingSink {
    results: AtomicUsize,
    reports: AtomicUsize,
}

impl ComplianceSink for CountingSink {
    fn submit_result(&self, _result: &ComplianceResult) {
        self.results.fetch_add(1, Ordering::SeqCst);
    }

    fn submit_report(&self, _report: &ETIAnalysisReport) {
        self.reports.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_sink_receives_report_fire_and_forget() {
    let sink = Arc::new(CountingSink {
        results: AtomicUsize::new(0),
        reports: AtomicUsize::new(0),
    });

    let analyzer = EtsiStandardsAnalyzer::new(AnalyzerConfig::default())
        .unwrap()
        .with_sink(sink.clone());
    analyzer.analyze_complete_eti("sink.eti", &build_valid_frame());

    assert_eq!(sink.reports.load(Ordering::SeqCst), 1);
    // No incident forwarding without government reporting.
    assert_eq!(sink.results.load(Ordering::SeqCst), 0);
}

#[test]
fn test_government_reporting_forwards_serious_violations() {
    let sink = Arc::new(CountingSink {
        results: AtomicUsize::new(0),
        reports: AtomicUsize::new(0),
    });

    let config = AnalyzerConfig {
        government_reporting_enabled: true,
        ..Default::default()
    };
    let analyzer = EtsiStandardsAnalyzer::new(config)
        .unwrap()
        .with_sink(sink.clone());

    // A zero-length buffer fails every standard critically.
    analyzer.analyze_complete_eti("violations.eti", &[]);

    assert_eq!(sink.reports.load(Ordering::SeqCst), 1);
    assert_eq!(sink.results.load(Ordering::SeqCst), 9);
}

#[test]
fn test_concurrent_frame_analyses_are_independent() {
    let analyzer = Arc::new(EtsiStandardsAnalyzer::new(AnalyzerConfig::default()).unwrap());
    let frame = Arc::new(build_valid_frame());
    let threads = 8;

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let analyzer = Arc::clone(&analyzer);
            let frame = Arc::clone(&frame);
            std::thread::spawn(move || {
                analyzer.analyze_complete_eti(&format!("frame-{}.eti", i), &frame)
            })
        })
        .collect();

    for handle in handles {
        let report = handle.join().expect("analysis thread panicked");
        assert_eq!(report.overall_compliance_score, 100.0);
    }
}

#[test]
fn test_report_is_self_consistent() {
    let report = EtiGuardCore::analyze_frame(
        "consistency.eti",
        &build_valid_frame(),
        AnalyzerConfig::default(),
    )
    .unwrap();

    let violations = report.all_results().filter(|r| r.is_violation()).count();
    assert_eq!(violations as u64, report.total_violations_found);
    assert_eq!(report.total_checks(), report.all_results().count());
    assert!(report.executive_summary.contains("consistency.eti"));
    assert_eq!(report.compliance_level(), ComplianceLevel::Compliant);
}
