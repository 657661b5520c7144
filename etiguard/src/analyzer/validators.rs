//! Concrete validators, one per ETSI standard.
//!
//! Each validator performs structural checks specific to its standard's
//! binary layout and returns findings in check-execution order. Malformed
//! input degrades to failed findings; nothing here aborts an analysis.

use crate::analyzer::{StandardValidator, ValidationContext};
use crate::compliance::{ComplianceResult, EtsiStandard};
use crate::parser::eti::{
    parse_stc_entries, EtiFrameHeader, ETI_NI_FRAME_SIZE, FCT_MODULUS, MAX_STREAMS,
    MIN_HEADER_LEN,
};
use crate::parser::fig::{
    fib_crc_valid, iterate_figs, Fig, Fig1Label, FIB_DATA_SIZE, FIB_SIZE, KNOWN_CHARSETS,
};

/// MOT SlideShow user application type (TS 101 756 table 16).
const USER_APP_SLIDESHOW: u16 = 0x002;

/// TPEG user application type.
const USER_APP_TPEG: u16 = 0x004;

/// SPI / EPG user application type.
const USER_APP_SPI: u16 = 0x007;

/// Reserved transport protection level value.
const TPL_RESERVED: u8 = 0x3F;

/// Locate the FIC bytes of a frame: after the FC word, the STC entries
/// and the 4-byte EOH. Modes I, II and IV carry 3 FIBs, mode III 4.
fn fic_region<'a>(data: &'a [u8], header: &EtiFrameHeader) -> Option<&'a [u8]> {
    if !header.ficf {
        return None;
    }
    let offset = header.stc_offset() + header.nst as usize * 4 + 4;
    let len = if header.mid == 3 { 4 * FIB_SIZE } else { 3 * FIB_SIZE };
    data.get(offset..offset + len)
}

/// Parse a buffer's FIGs whether it is a full frame, a raw FIB sequence
/// or bare FIG data.
fn collect_figs(data: &[u8]) -> Vec<Fig<'_>> {
    if let Some(header) = EtiFrameHeader::parse(data) {
        if header.sync_valid() {
            return fic_region(data, &header)
                .map(|fic| {
                    fic.chunks_exact(FIB_SIZE)
                        .flat_map(|fib| iterate_figs(&fib[..FIB_DATA_SIZE]))
                        .collect()
                })
                .unwrap_or_default();
        }
    }

    if data.len() >= FIB_SIZE && data.len() % FIB_SIZE == 0 {
        data.chunks_exact(FIB_SIZE)
            .flat_map(|fib| iterate_figs(&fib[..FIB_DATA_SIZE]))
            .collect()
    } else {
        iterate_figs(data)
    }
}

fn parsed_frame(data: &[u8]) -> Option<EtiFrameHeader> {
    EtiFrameHeader::parse(data).filter(|h| h.sync_valid())
}

/// User applications announced by FIG 0/13: (application type, SId).
fn user_applications(figs: &[Fig<'_>]) -> Vec<(u16, u32)> {
    let mut apps = Vec::new();

    for fig in figs {
        if fig.header.fig_type != 0 || fig.data.is_empty() {
            continue;
        }
        let extension = fig.data[0] & 0x1F;
        if extension != 13 {
            continue;
        }

        let pd = fig.data[0] & 0x20 != 0;
        let sid_len = if pd { 4 } else { 2 };
        let mut idx = 1usize;

        while idx + sid_len + 1 <= fig.data.len() {
            let sid = fig.data[idx..idx + sid_len]
                .iter()
                .fold(0u32, |acc, &b| (acc << 8) | b as u32);
            idx += sid_len;
            let num_apps = (fig.data[idx] & 0x0F) as usize;
            idx += 1;

            for _ in 0..num_apps {
                if idx + 2 > fig.data.len() {
                    return apps;
                }
                let app_type =
                    ((fig.data[idx] as u16) << 3) | ((fig.data[idx + 1] as u16) >> 5);
                let app_data_len = (fig.data[idx + 1] & 0x1F) as usize;
                apps.push((app_type, sid));
                idx += 2 + app_data_len;
            }
        }
    }

    apps
}

fn fig1_labels(figs: &[Fig<'_>]) -> Vec<Fig1Label> {
    figs.iter()
        .filter(|fig| fig.header.fig_type == 1)
        .filter_map(|fig| Fig1Label::parse(fig.data))
        .collect()
}

// ---------------------------------------------------------------------
// EN 302 077 - RF transmitting equipment
// ---------------------------------------------------------------------

pub struct En302077Validator;

impl StandardValidator for En302077Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::En302077
    }

    fn min_buffer_len(&self) -> usize {
        ETI_NI_FRAME_SIZE
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        let standard = self.standard();
        let mut results = Vec::new();

        let aligned = data.len() % ETI_NI_FRAME_SIZE == 0;
        results.push(
            ctx.result(
                standard,
                "rf_frame_alignment",
                "Transmitter input framing",
                aligned,
                if aligned { 100.0 } else { 75.0 },
                format!("{} bytes supplied; transmitters consume whole 24 ms frames", data.len()),
            )
            .with_recommendation_if(
                !aligned,
                "Align the transport to 6144-byte ETI(NI) frames",
            ),
        );

        // TIST occupies the last 4 bytes of the frame; an all-ones
        // 24-bit value means no timestamp is available.
        let tist = data[ETI_NI_FRAME_SIZE - 4..ETI_NI_FRAME_SIZE]
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32);
        let timestamped = tist & 0x00FF_FFFF != 0x00FF_FFFF;
        results.push(
            ctx.result(
                standard,
                "rf_timestamp",
                "Transmitter timestamp (TIST)",
                timestamped,
                if timestamped { 100.0 } else { 80.0 },
                if timestamped {
                    format!("TIST present: 0x{:08X}", tist)
                } else {
                    "TIST carries no timestamp; SFN operation is impossible".to_string()
                },
            )
            .with_recommendation_if(
                !timestamped,
                "Enable timestamping at the ensemble multiplexer",
            ),
        );

        results
    }
}

// ---------------------------------------------------------------------
// EN 300 401 - core DAB structure
// ---------------------------------------------------------------------

pub struct En300401Validator;

impl StandardValidator for En300401Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::En300401
    }

    fn min_buffer_len(&self) -> usize {
        MIN_HEADER_LEN
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        match parsed_frame(data) {
            Some(header) => self.validate_frame(data, &header, ctx),
            None => self.validate_fig_buffer(data, ctx),
        }
    }
}

impl En300401Validator {
    fn validate_frame(
        &self,
        data: &[u8],
        header: &EtiFrameHeader,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ComplianceResult> {
        let standard = EtsiStandard::En300401;
        let mut results = Vec::new();

        results.push(ctx.result(
            standard,
            "frame_sync",
            "ETI frame synchronisation word",
            true,
            100.0,
            format!("FSYNC 0x{:06X}", header.fsync),
        ));

        let error_free = header.error_free();
        results.push(
            ctx.result(
                standard,
                "frame_error_field",
                "ERR transport error indication",
                error_free,
                if error_free { 100.0 } else { 50.0 },
                if error_free {
                    "no transport error reported".to_string()
                } else {
                    format!("ERR field reports transport error 0x{:02X}", header.err)
                },
            )
            .with_recommendation_if(!error_free, "Inspect the contribution link for errors"),
        );

        let streams_ok = header.nst <= MAX_STREAMS;
        results.push(ctx.result(
            standard,
            "stream_count",
            "Number of sub-channel streams",
            streams_ok,
            if streams_ok { 100.0 } else { 70.0 },
            format!("NST = {}", header.nst),
        ));

        results.push(
            ctx.result(
                standard,
                "fic_presence",
                "Fast Information Channel carriage",
                header.ficf,
                if header.ficf { 100.0 } else { 80.0 },
                if header.ficf {
                    "FIC present".to_string()
                } else {
                    "frame carries no FIC; receivers cannot acquire services".to_string()
                },
            )
            .with_recommendation_if(!header.ficf, "Enable FIC insertion at the multiplexer"),
        );

        let announced = header.stc_offset() + header.announced_body_len();
        let length_ok = announced <= data.len();
        results.push(ctx.result(
            standard,
            "frame_length_consistency",
            "FL field against buffer length",
            length_ok,
            if length_ok { 100.0 } else { 60.0 },
            format!(
                "FL announces {} bytes, buffer holds {}",
                announced,
                data.len()
            ),
        ));

        let nominal = data.len() == ETI_NI_FRAME_SIZE;
        results.push(ctx.result(
            standard,
            "frame_size",
            "Nominal ETI(NI) frame size",
            nominal,
            if nominal { 100.0 } else { 82.0 },
            format!("{} bytes (nominal {})", data.len(), ETI_NI_FRAME_SIZE),
        ));

        if let Some(fic) = fic_region(data, header) {
            let fibs: Vec<&[u8]> = fic.chunks_exact(FIB_SIZE).collect();
            let valid = fibs.iter().filter(|fib| fib_crc_valid(fib)).count();
            let all_valid = valid == fibs.len();
            let score = if fibs.is_empty() {
                0.0
            } else {
                100.0 * valid as f64 / fibs.len() as f64
            };
            results.push(
                ctx.result(
                    standard,
                    "fib_integrity",
                    "FIB CRC check",
                    all_valid,
                    score,
                    format!("{}/{} FIBs carry a valid CRC", valid, fibs.len()),
                )
                .with_recommendation_if(
                    !all_valid,
                    "Regenerate the FIC; FIB CRC failures corrupt service information",
                ),
            );
        }

        results
    }

    fn validate_fig_buffer(
        &self,
        data: &[u8],
        ctx: &ValidationContext<'_>,
    ) -> Vec<ComplianceResult> {
        let standard = EtsiStandard::En300401;
        let mut results = Vec::new();

        let figs = collect_figs(data);
        if figs.is_empty() {
            results.push(
                ctx.result(
                    standard,
                    "fig_structure",
                    "FIG type/length headers",
                    false,
                    40.0,
                    "no parseable FIG structure in buffer",
                )
                .with_metadata("category", "malformed_structure"),
            );
        } else {
            let valid = figs
                .iter()
                .filter(|fig| matches!(fig.header.fig_type, 0 | 1 | 2 | 5 | 6))
                .count();
            let all_valid = valid == figs.len();
            results.push(ctx.result(
                standard,
                "fig_structure",
                "FIG type/length headers",
                all_valid,
                100.0 * valid as f64 / figs.len() as f64,
                format!("{}/{} FIGs carry a defined type", valid, figs.len()),
            ));
        }

        if data.len() >= FIB_SIZE {
            let crc_ok = fib_crc_valid(&data[..FIB_SIZE]);
            results.push(ctx.result(
                standard,
                "fib_crc",
                "Leading FIB CRC check",
                crc_ok,
                if crc_ok { 100.0 } else { 70.0 },
                if crc_ok {
                    "leading FIB CRC valid".to_string()
                } else {
                    "leading FIB fails its CRC".to_string()
                },
            ));
        }

        results
    }
}

// ---------------------------------------------------------------------
// TS 102 563 - DAB+ audio coding
// ---------------------------------------------------------------------

pub struct Ts102563Validator;

impl StandardValidator for Ts102563Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::Ts102563
    }

    fn min_buffer_len(&self) -> usize {
        12
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        let standard = self.standard();

        let Some(header) = parsed_frame(data) else {
            return vec![ctx
                .result(
                    standard,
                    "audio_transport",
                    "ETI audio transport structure",
                    false,
                    60.0,
                    "buffer does not carry an ETI audio transport frame",
                )
                .with_recommendation("Supply a complete ETI frame for audio-coding checks")];
        };

        let mut results = Vec::new();
        let entries = parse_stc_entries(data, &header);

        let count_ok = entries.len() == header.nst as usize;
        results.push(ctx.result(
            standard,
            "stream_characterization",
            "STC entry count against NST",
            count_ok,
            if count_ok { 100.0 } else { 70.0 },
            format!("{} STC entries, NST = {}", entries.len(), header.nst),
        ));

        let zero_len = entries.iter().filter(|e| e.stl == 0).count();
        let lengths_ok = zero_len == 0;
        results.push(ctx.result(
            standard,
            "audio_stream_lengths",
            "Sub-channel stream lengths",
            lengths_ok,
            if lengths_ok { 100.0 } else { 65.0 },
            format!("{} of {} sub-channels have zero length", zero_len, entries.len()),
        ));

        let reserved_tpl = entries.iter().filter(|e| e.tpl == TPL_RESERVED).count();
        let protection_ok = reserved_tpl == 0;
        results.push(ctx.result(
            standard,
            "protection_profile",
            "Transport protection levels",
            protection_ok,
            if protection_ok { 100.0 } else { 72.0 },
            format!("{} sub-channels use a reserved protection level", reserved_tpl),
        ));

        results
    }
}

// ---------------------------------------------------------------------
// TS 101 756 - character sets (Thai profile)
// ---------------------------------------------------------------------

pub struct Ts101756Validator;

impl StandardValidator for Ts101756Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::Ts101756
    }

    fn min_buffer_len(&self) -> usize {
        2
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        let standard = self.standard();
        let mut results = Vec::new();

        let figs = collect_figs(data);
        let labels = fig1_labels(&figs);

        if labels.is_empty() {
            results.push(ctx.result(
                standard,
                "label_charsets",
                "FIG 1 charset signalling",
                true,
                100.0,
                "no labels present in buffer",
            ));
            return results;
        }

        let unknown: Vec<u8> = labels
            .iter()
            .map(|l| l.charset)
            .filter(|c| !KNOWN_CHARSETS.contains(c))
            .collect();
        let charsets_ok = unknown.is_empty();
        results.push(ctx.result(
            standard,
            "label_charsets",
            "FIG 1 charset signalling",
            charsets_ok,
            if charsets_ok { 100.0 } else { 60.0 },
            if charsets_ok {
                format!("{} label(s), all charsets assigned by TS 101 756", labels.len())
            } else {
                format!("unassigned charset value(s): {:?}", unknown)
            },
        ));

        let thai_labels: Vec<&Fig1Label> =
            labels.iter().filter(|l| l.is_thai_profile()).collect();

        match ctx.thai {
            Some(engine) => {
                for (index, label) in thai_labels.iter().enumerate() {
                    let validation =
                        engine.character_analyzer().validate_bytes(label.label_bytes());
                    let passed = validation.valid_encoding && validation.profile_compliant;
                    results.push(
                        ctx.result(
                            standard,
                            "thai_label_encoding",
                            "Thai-profile label character validation",
                            passed,
                            validation.compliance_score,
                            format!(
                                "label {}: {} invalid character(s); {}",
                                index,
                                validation.invalid_chars,
                                if validation.issues.is_empty() {
                                    "clean".to_string()
                                } else {
                                    validation.issues.join("; ")
                                }
                            ),
                        )
                        .with_recommendation_if(
                            !passed,
                            "Re-encode the label within the Thai profile 0x0E repertoire",
                        ),
                    );
                }
            }
            None => {
                if !thai_labels.is_empty() {
                    results.push(ctx.result(
                        standard,
                        "thai_profile_signalled",
                        "Thai profile usage",
                        true,
                        100.0,
                        format!(
                            "{} label(s) signal the Thai profile; Thai validation disabled",
                            thai_labels.len()
                        ),
                    ));
                }
            }
        }

        results
    }
}

// ---------------------------------------------------------------------
// TR 101 496-3 - broadcast network implementation
// ---------------------------------------------------------------------

pub struct Tr1014963Validator;

impl StandardValidator for Tr1014963Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::Tr1014963
    }

    fn min_buffer_len(&self) -> usize {
        8
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        let standard = self.standard();

        let Some(header) = parsed_frame(data) else {
            return vec![ctx.result(
                standard,
                "network_framing",
                "ETI network frame structure",
                false,
                55.0,
                "buffer is not an ETI network frame",
            )];
        };

        let mut results = Vec::new();

        let fct_ok = header.fct < FCT_MODULUS;
        results.push(ctx.result(
            standard,
            "frame_count_field",
            "FCT modulo-250 range",
            fct_ok,
            if fct_ok { 100.0 } else { 70.0 },
            format!("FCT = {}", header.fct),
        ));

        let phase_ok = header.fp == header.fct % 8;
        results.push(ctx.result(
            standard,
            "frame_phase_alignment",
            "Frame phase against frame count",
            phase_ok,
            if phase_ok { 100.0 } else { 78.0 },
            format!("FP = {}, FCT mod 8 = {}", header.fp, header.fct % 8),
        ));

        results.push(
            ctx.result(
                standard,
                "fic_carriage",
                "Network-side FIC carriage",
                header.ficf,
                if header.ficf { 100.0 } else { 75.0 },
                if header.ficf {
                    "FIC carried end-to-end".to_string()
                } else {
                    "FIC absent at the network interface".to_string()
                },
            )
            .with_recommendation_if(
                !header.ficf,
                "Carry the FIC through the distribution network unmodified",
            ),
        );

        results
    }
}

// ---------------------------------------------------------------------
// User-application standards: TS 101 499, TS 102 818, TS 103 551
// ---------------------------------------------------------------------

fn validate_user_application(
    data: &[u8],
    ctx: &ValidationContext<'_>,
    standard: EtsiStandard,
    app_type: u16,
    app_name: &str,
    check_prefix: &str,
) -> Vec<ComplianceResult> {
    let figs = collect_figs(data);
    let apps = user_applications(&figs);
    let matching: Vec<&(u16, u32)> = apps.iter().filter(|(t, _)| *t == app_type).collect();

    let mut results = Vec::new();

    if matching.is_empty() {
        results.push(ctx.result(
            standard,
            &format!("{}_signalling", check_prefix),
            "FIG 0/13 user application signalling",
            true,
            100.0,
            format!("no {} application signalled in this buffer", app_name),
        ));
        return results;
    }

    results.push(ctx.result(
        standard,
        &format!("{}_signalling", check_prefix),
        "FIG 0/13 user application signalling",
        true,
        100.0,
        format!("{} service(s) signal {}", matching.len(), app_name),
    ));

    let zero_sid = matching.iter().filter(|(_, sid)| *sid == 0).count();
    let sids_ok = zero_sid == 0;
    results.push(ctx.result(
        standard,
        &format!("{}_service_reference", check_prefix),
        "Service identifier of the announcing service",
        sids_ok,
        if sids_ok { 100.0 } else { 65.0 },
        format!("{} announcement(s) carry a zero SId", zero_sid),
    ));

    results
}

pub struct Ts101499Validator;

impl StandardValidator for Ts101499Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::Ts101499
    }

    fn min_buffer_len(&self) -> usize {
        2
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        validate_user_application(
            data,
            ctx,
            self.standard(),
            USER_APP_SLIDESHOW,
            "MOT SlideShow",
            "slideshow",
        )
    }
}

pub struct Ts102818Validator;

impl StandardValidator for Ts102818Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::Ts102818
    }

    fn min_buffer_len(&self) -> usize {
        2
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        validate_user_application(
            data,
            ctx,
            self.standard(),
            USER_APP_SPI,
            "Service and Programme Information",
            "spi",
        )
    }
}

pub struct Ts103551Validator;

impl StandardValidator for Ts103551Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::Ts103551
    }

    fn min_buffer_len(&self) -> usize {
        2
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        validate_user_application(data, ctx, self.standard(), USER_APP_TPEG, "TPEG", "tpeg")
    }
}

// ---------------------------------------------------------------------
// TS 103 176 - service information features
// ---------------------------------------------------------------------

pub struct Ts103176Validator;

impl StandardValidator for Ts103176Validator {
    fn standard(&self) -> EtsiStandard {
        EtsiStandard::Ts103176
    }

    fn min_buffer_len(&self) -> usize {
        2
    }

    fn validate(&self, data: &[u8], ctx: &ValidationContext<'_>) -> Vec<ComplianceResult> {
        let standard = self.standard();
        let mut results = Vec::new();

        let figs = collect_figs(data);

        // FIG 0/0 carries the ensemble information.
        let ensemble_info = figs.iter().find(|fig| {
            fig.header.fig_type == 0
                && !fig.data.is_empty()
                && fig.data[0] & 0x1F == 0
                && fig.data.len() >= 3
        });
        match ensemble_info {
            Some(fig) => {
                let eid = ((fig.data[1] as u16) << 8) | fig.data[2] as u16;
                let eid_ok = eid != 0;
                results.push(ctx.result(
                    standard,
                    "ensemble_identification",
                    "FIG 0/0 ensemble information",
                    eid_ok,
                    if eid_ok { 100.0 } else { 60.0 },
                    format!("EId = 0x{:04X}", eid),
                ));
            }
            None => {
                results.push(
                    ctx.result(
                        standard,
                        "ensemble_identification",
                        "FIG 0/0 ensemble information",
                        false,
                        72.0,
                        "no ensemble information FIG in buffer",
                    )
                    .with_recommendation(
                        "Transmit FIG 0/0 at the repetition rate required for acquisition",
                    ),
                );
            }
        }

        let label_count = figs.iter().filter(|fig| fig.header.fig_type == 1).count();
        let labels_ok = label_count > 0;
        results.push(
            ctx.result(
                standard,
                "service_labels",
                "FIG 1 label presence",
                labels_ok,
                if labels_ok { 100.0 } else { 80.0 },
                format!("{} FIG 1 label(s) in buffer", label_count),
            )
            .with_recommendation_if(
                !labels_ok,
                "Transmit FIG 1 service labels at the required repetition rate",
            ),
        );

        results
    }
}

/// Conditional recommendation attachment used across the validators.
trait WithRecommendationIf {
    fn with_recommendation_if(self, condition: bool, recommendation: &str) -> Self;
}

impl WithRecommendationIf for ComplianceResult {
    fn with_recommendation_if(self, condition: bool, recommendation: &str) -> Self {
        if condition {
            self.with_recommendation(recommendation)
        } else {
            self
        }
    }
}
