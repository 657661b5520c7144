//! Thai character-set validation and conversion.

use std::collections::BTreeSet;

use crate::thai::charset::{CharacterProfileTable, PROFILE_FALLBACK};
use crate::thai::types::{CharacterValidation, ProfileConversion};

/// Validates and converts Thai text against the TS 101 756 profile.
///
/// Stateless apart from its immutable character table; safe to share
/// across threads once constructed.
#[derive(Debug, Clone, Default)]
pub struct ThaiCharacterAnalyzer {
    table: CharacterProfileTable,
}

impl ThaiCharacterAnalyzer {
    pub fn new() -> Self {
        Self {
            table: CharacterProfileTable::new(),
        }
    }

    pub fn table(&self) -> &CharacterProfileTable {
        &self.table
    }

    /// Validate a text field. Empty text scores 100 by convention, since
    /// an absent field cannot be non-compliant.
    pub fn validate(&self, text: &str) -> CharacterValidation {
        self.validate_codepoints(text.chars(), 0)
    }

    /// Validate label bytes straight out of a FIG. Decoding fails soft:
    /// each invalid UTF-8 sequence counts as one invalid character and
    /// decoding resumes at the next byte boundary.
    pub fn validate_bytes(&self, bytes: &[u8]) -> CharacterValidation {
        let mut invalid_sequences = 0usize;
        let mut decoded = String::new();
        let mut rest = bytes;

        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    decoded.push_str(valid);
                    break;
                }
                Err(error) => {
                    let valid_up_to = error.valid_up_to();
                    // Safe: from_utf8 vouched for this prefix.
                    decoded.push_str(std::str::from_utf8(&rest[..valid_up_to]).unwrap_or(""));
                    invalid_sequences += 1;
                    let skip = valid_up_to + error.error_len().unwrap_or(1);
                    rest = &rest[skip.min(rest.len())..];
                }
            }
        }

        let mut validation = self.validate_codepoints(decoded.chars(), invalid_sequences);
        if invalid_sequences > 0 {
            validation.valid_encoding = false;
            validation
                .issues
                .insert(0, "invalid UTF-8 byte sequence".to_string());
        }
        validation
    }

    fn validate_codepoints(
        &self,
        chars: impl Iterator<Item = char>,
        extra_invalid: usize,
    ) -> CharacterValidation {
        let mut total = extra_invalid;
        let mut invalid = extra_invalid;
        let mut profile_compliant = true;
        let mut renderable = true;
        let mut issues = BTreeSet::new();

        for c in chars {
            total += 1;
            let in_profile = self.table.to_profile(c).is_some();
            let drawable = self.table.is_renderable(c);

            if !in_profile {
                profile_compliant = false;
                issues.insert(format!(
                    "contains non-Thai-profile codepoint U+{:04X}",
                    c as u32
                ));
            } else if !drawable {
                renderable = false;
                issues.insert(format!(
                    "codepoint U+{:04X} is not renderable on DAB displays",
                    c as u32
                ));
            }

            if !in_profile || !drawable {
                invalid += 1;
            }
        }

        let compliance_score = if total == 0 {
            100.0
        } else {
            100.0 * (total - invalid) as f64 / total as f64
        };

        CharacterValidation {
            valid_encoding: extra_invalid == 0,
            profile_compliant,
            renderable,
            invalid_chars: invalid,
            issues: issues.into_iter().collect(),
            compliance_score,
        }
    }

    /// Map each codepoint through the profile table. Unmapped codepoints
    /// become the fallback symbol and are counted, so the caller can
    /// decide whether to reject the conversion.
    pub fn convert_to_profile(&self, text: &str) -> ProfileConversion {
        let mut encoded = Vec::with_capacity(text.len());
        let mut substitutions = 0usize;

        for c in text.chars() {
            match self.table.to_profile(c) {
                Some(byte) => encoded.push(byte),
                None => {
                    encoded.push(PROFILE_FALLBACK);
                    substitutions += 1;
                }
            }
        }

        ProfileConversion {
            encoded,
            substitutions,
        }
    }

    /// True when the text contains at least one Thai-block codepoint.
    pub fn detect_thai_script(&self, text: &str) -> bool {
        text.chars().any(CharacterProfileTable::in_thai_block)
    }

    /// True iff the text mixes Thai-range and Latin-range characters.
    pub fn detect_mixed_scripts(&self, text: &str) -> bool {
        let has_thai = self.detect_thai_script(text);
        let has_latin = text.chars().any(|c| c.is_ascii_alphabetic());
        has_thai && has_latin
    }

    /// Greedy script segmentation: each codepoint run goes to the script
    /// it belongs to, runs of punctuation/whitespace attach to the
    /// preceding run. Order-preserving within each portion.
    pub fn separate_thai_english(&self, text: &str) -> (String, String) {
        #[derive(Clone, Copy, PartialEq)]
        enum Script {
            Thai,
            English,
        }

        let mut thai = String::new();
        let mut english = String::new();
        let mut current: Option<Script> = None;
        let mut pending = String::new();

        for c in text.chars() {
            let script = if CharacterProfileTable::in_thai_block(c) {
                Some(Script::Thai)
            } else if c.is_ascii_alphabetic() {
                Some(Script::English)
            } else {
                None
            };

            match script {
                Some(script) => {
                    let target = match script {
                        Script::Thai => &mut thai,
                        Script::English => &mut english,
                    };
                    // Neutral characters seen before any scripted run
                    // attach to the run that follows them.
                    if current.is_none() && !pending.is_empty() {
                        target.push_str(&pending);
                        pending.clear();
                    }
                    target.push(c);
                    current = Some(script);
                }
                None => match current {
                    Some(Script::Thai) => thai.push(c),
                    Some(Script::English) => english.push(c),
                    None => pending.push(c),
                },
            }
        }

        // Text with no scripted characters at all lands in the English
        // portion unchanged.
        if current.is_none() && !pending.is_empty() {
            english.push_str(&pending);
        }

        (thai, english)
    }
}
