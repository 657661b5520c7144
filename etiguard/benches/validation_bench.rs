use criterion::{black_box, criterion_group, criterion_main, Criterion};
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

fn build_frame() -> Vec<u8> {
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
    frame
}

fn bench_analyze_complete_eti(c: &mut Criterion) {
    let analyzer = EtsiStandardsAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let frame = build_frame();

    c.bench_function("analyze_complete_eti", |b| {
        b.iter(|| analyzer.analyze_complete_eti(black_box("bench.eti"), black_box(&frame)));
    });
}

fn bench_thai_metadata_analysis(c: &mut Criterion) {
    let engine = ThaiAnalysisEngine::new();
    let fields = ThaiTextFields {
        title: "รายการเพลงไทยสากลยามเย็น".to_string(),
        artist: "วงดนตรีกรุงเทพมหานคร".to_string(),
        album: "บทเพลงพระราชนิพนธ์".to_string(),
        genre: "ลูกกรุง".to_string(),
        station_name: "สถานีวิทยุกระจายเสียงแห่งประเทศไทย".to_string(),
    };

    c.bench_function("thai_metadata_analysis", |b| {
        b.iter(|| engine.analyze_metadata(black_box(&fields)));
    });
}

criterion_group!(
    benches,
    bench_analyze_complete_eti,
    bench_thai_metadata_analysis
);
criterion_main!(benches);
