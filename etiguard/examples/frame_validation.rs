//! Example: full standards analysis of a synthetic ETI frame.
//! Run with: cargo run --example frame_validation

use etiguard::parser::fig::{crc16_ccitt, FIB_DATA_SIZE};
use etiguard::prelude::*;

fn build_fib(fig_bytes: &[u8]) -> Vec<u8> {
    let mut fib = fig_bytes.to_vec();
    fib.resize(FIB_DATA_SIZE, 0xFF);
    let crc = crc16_ccitt(&fib) ^ 0xFFFF;
    fib.push((crc >> 8) as u8);
    fib.push((crc & 0xFF) as u8);
    fib
}

fn main() -> Result<(), EtiGuardError> {
    // A minimal ETI(NI) frame: FIC with an ensemble label in the Thai
    // profile, no sub-channel streams, TIST present.
    let mut frame = vec![0u8; 6144];
    frame[0] = 0xFF;
    frame[1..4].copy_from_slice(&[0x07, 0x3A, 0xB6]);
    frame[5] = 0x80;
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

    let fields = ThaiTextFields {
        title: "เพลงพระราชนิพนธ์ แสงเทียน".to_string(),
        artist: "วงดนตรีสากล".to_string(),
        album: "รวมบทเพลง".to_string(),
        genre: "คลาสสิก".to_string(),
        station_name: "สถานีวิทยุไทย".to_string(),
    };

    let report = EtiGuardCore::analyze_frame_with_text(
        "example.eti",
        &frame,
        &fields,
        AnalyzerConfig::default(),
    )?;

    println!("{}", report.executive_summary);
    println!();

    for (standard, results) in &report.standard_results {
        println!("{}", standard);
        for result in results {
            println!(
                "  [{}] {} ({:.1}%): {}",
                result.severity, result.check_name, result.score, result.details
            );
            if let Some(ref recommendation) = result.recommendation {
                println!("      -> {}", recommendation);
            }
        }
    }

    if let Some(level) = report.thai_compliance_level {
        println!();
        println!("Thai metadata compliance: {}", level);
    }

    Ok(())
}
