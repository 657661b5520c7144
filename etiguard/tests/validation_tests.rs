//! Tests for the per-standard validators

use etiguard::parser::fig::{crc16_ccitt, FIB_DATA_SIZE, FIB_SIZE};
use etiguard::prelude::*;

/// One FIB: FIG payload bytes padded with 0xFF, inverted CRC-16 appended.
fn build_fib(fig_bytes: &[u8]) -> Vec<u8> {
    assert!(fig_bytes.len() <= FIB_DATA_SIZE);
    let mut fib = fig_bytes.to_vec();
    fib.resize(FIB_DATA_SIZE, 0xFF);
    let crc = crc16_ccitt(&fib) ^ 0xFFFF;
    fib.push((crc >> 8) as u8);
    fib.push((crc & 0xFF) as u8);
    fib
}

/// FIG 0/0 (ensemble information, EId 0x4FFF) and a FIG 1/0 ensemble
/// label announcing the Thai profile.
fn fib_with_labels() -> Vec<u8> {
    let mut figs = vec![0x05, 0x00, 0x4F, 0xFF, 0x00, 0x37];
    figs.push(0x35); // FIG type 1, length 21
    figs.push(0xE0); // charset 0x0E, extension 0
    figs.extend_from_slice(&[0x4F, 0xFF]);
    figs.extend_from_slice(b"THAI RADIO      ");
    figs.extend_from_slice(&[0x00, 0x00]);
    build_fib(&figs)
}

/// A structurally clean 6144-byte ETI(NI) frame: no streams, FIC with
/// one populated FIB and two padding FIBs, TIST present.
fn build_valid_frame() -> Vec<u8> {
    let mut frame = vec![0u8; 6144];
    frame[0] = 0xFF; // ERR: no error
    frame[1..4].copy_from_slice(&[0x07, 0x3A, 0xB6]); // FSYNC
    frame[4] = 0; // FCT
    frame[5] = 0x80; // FICF=1, NST=0
    let fl: u16 = ((6144 - 8) / 4) as u16;
    frame[6] = (1 << 3) | ((fl >> 8) as u8 & 0x07); // FP=0, MID=1
    frame[7] = (fl & 0xFF) as u8;

    // EOH at 8..12 left zero; FIC follows with three FIBs.
    frame[12..44].copy_from_slice(&fib_with_labels());
    let padding = build_fib(&[]);
    frame[44..76].copy_from_slice(&padding);
    frame[76..108].copy_from_slice(&padding);

    frame[6140..6144].copy_from_slice(&[0x00, 0x00, 0x10, 0x00]); // TIST
    frame
}

fn analyzer(strictness: f64) -> EtsiStandardsAnalyzer {
    EtsiStandardsAnalyzer::new(AnalyzerConfig {
        validation_strictness: strictness,
        ..Default::default()
    })
    .expect("valid configuration")
}

#[test]
fn test_valid_frame_passes_every_standard() {
    let report = analyzer(1.0).analyze_complete_eti("clean.eti", &build_valid_frame());

    for (standard, results) in &report.standard_results {
        assert!(!results.is_empty(), "{} produced no findings", standard);
        for result in results {
            assert!(
                result.passed,
                "{} {} failed: {}",
                standard,
                result.check_name,
                result.details
            );
        }
    }
    assert_eq!(report.overall_compliance_score, 100.0);
    assert_eq!(report.total_violations_found, 0);
}

#[test]
fn test_bad_sync_word_is_critical() {
    let mut frame = build_valid_frame();
    frame[1..4].copy_from_slice(&[0x00, 0x00, 0x00]);

    let report = analyzer(1.0).analyze_complete_eti("nosync.eti", &frame);
    let core = report.results_for(EtsiStandard::En300401).unwrap();

    // Without synchronisation the buffer is judged as FIG data and
    // fails structurally.
    assert!(core.iter().any(|r| !r.passed));
    assert!(report.overall_compliance_score < 100.0);
}

#[test]
fn test_corrupted_fib_crc_detected() {
    let mut frame = build_valid_frame();
    frame[13] ^= 0x01; // flip a bit inside the first FIB

    let report = analyzer(1.0).analyze_complete_eti("badfib.eti", &frame);
    let core = report.results_for(EtsiStandard::En300401).unwrap();
    let fib_check = core
        .iter()
        .find(|r| r.check_name == "fib_integrity")
        .expect("fib integrity check present");

    assert!(!fib_check.passed);
    assert!(fib_check.score < 100.0);
}

#[test]
fn test_missing_tist_flagged_by_rf_standard() {
    let mut frame = build_valid_frame();
    frame[6140..6144].copy_from_slice(&[0x00, 0xFF, 0xFF, 0xFF]);

    let report = analyzer(1.0).analyze_complete_eti("notist.eti", &frame);
    let rf = report.results_for(EtsiStandard::En302077).unwrap();
    let tist = rf
        .iter()
        .find(|r| r.check_name == "rf_timestamp")
        .expect("timestamp check present");

    assert!(!tist.passed);
    assert!(tist.recommendation.is_some());
}

#[test]
fn test_strictness_scales_borderline_severity() {
    // A frame with a trailing partial frame: alignment fails at score
    // 75, inside the strictness-scaled band.
    let mut data = build_valid_frame();
    data.extend_from_slice(&[0u8; 10]);

    let strict_report = analyzer(1.0).analyze_complete_eti("ragged.eti", &data);
    let lenient_report = analyzer(0.0).analyze_complete_eti("ragged.eti", &data);

    let severity_of = |report: &ETIAnalysisReport| {
        report
            .results_for(EtsiStandard::En302077)
            .unwrap()
            .iter()
            .find(|r| r.check_name == "rf_frame_alignment")
            .map(|r| r.severity)
            .expect("alignment check present")
    };

    assert_eq!(severity_of(&strict_report), Severity::Error);
    assert_eq!(severity_of(&lenient_report), Severity::Warning);

    // Structural pass/fail never changes with strictness.
    assert_eq!(
        strict_report.total_violations_found,
        lenient_report.total_violations_found
    );
}

#[test]
fn test_short_buffer_yields_insufficient_data() {
    let report = analyzer(1.0).analyze_complete_eti("short.eti", &[0xFF, 0x07, 0x3A, 0xB6]);

    let core = report.results_for(EtsiStandard::En300401).unwrap();
    assert!(core.iter().any(|r| r.check_name == "insufficient_data"));

    let rf = report.results_for(EtsiStandard::En302077).unwrap();
    assert!(rf.iter().any(|r| r.check_name == "insufficient_data"));
}

#[test]
fn test_fib_buffer_validates_thai_labels() {
    let report = analyzer(1.0).analyze_complete_eti("labels.fib", &fib_with_labels());

    let charset = report.results_for(EtsiStandard::Ts101756).unwrap();
    let label_check = charset
        .iter()
        .find(|r| r.check_name == "thai_label_encoding")
        .expect("Thai label validation runs on profile-0x0E labels");
    assert!(label_check.passed);
    assert_eq!(label_check.score, 100.0);

    let si = report.results_for(EtsiStandard::Ts103176).unwrap();
    assert!(si
        .iter()
        .any(|r| r.check_name == "ensemble_identification" && r.passed));
}

#[test]
fn test_unknown_charset_fails_character_standard() {
    // Same label FIB but with an unassigned charset value.
    let mut figs = vec![0x35, 0x50, 0x4F, 0xFF]; // charset 0x05 is unassigned
    figs.extend_from_slice(b"SOME RADIO      ");
    figs.extend_from_slice(&[0x00, 0x00]);
    let fib = build_fib(&figs);

    let report = analyzer(1.0).analyze_complete_eti("badcharset.fib", &fib);
    let charset = report.results_for(EtsiStandard::Ts101756).unwrap();
    let check = charset
        .iter()
        .find(|r| r.check_name == "label_charsets")
        .unwrap();
    assert!(!check.passed);
}

#[test]
fn test_garbage_buffer_degrades_not_panics() {
    let garbage: Vec<u8> = (0..997u32).map(|i| (i * 31 % 251) as u8).collect();
    let report = analyzer(1.0).analyze_complete_eti("garbage.bin", &garbage);

    assert!(report.overall_compliance_score < 100.0);
    assert!(report.total_violations_found > 0);
}

#[test]
fn test_fib_size_constants_consistent() {
    assert_eq!(FIB_SIZE, FIB_DATA_SIZE + 2);
    assert_eq!(build_fib(&[]).len(), FIB_SIZE);
}
