//! ETSI TS 101 756 Thai profile (0x0E) character table.
//!
//! Bidirectional mapping between Unicode codepoints and the 8-bit DAB
//! broadcast profile, which follows the TIS-620 layout: ASCII 0x20-0x7E
//! maps identically, the Thai block maps into 0xA1-0xFB.

use std::collections::{HashMap, HashSet};

/// Substitution byte emitted for codepoints outside the profile.
pub const PROFILE_FALLBACK: u8 = b'?';

/// First codepoint of the Unicode Thai block.
pub const THAI_BLOCK_START: u32 = 0x0E00;

/// Last codepoint of the Unicode Thai block.
pub const THAI_BLOCK_END: u32 = 0x0E7F;

/// Profile codepoints DAB receivers commonly cannot draw: YAMAKKAN,
/// ANGKHANKHU and KHOMUT.
const NON_RENDERABLE: [u32; 3] = [0x0E4E, 0x0E5A, 0x0E5B];

/// Static bidirectional mapping between Unicode and the broadcast profile.
///
/// Built once at construction from the fixed specification table and
/// read-only thereafter. Unmapped codepoints report `None`/`false`; there
/// is no error path.
#[derive(Debug, Clone)]
pub struct CharacterProfileTable {
    to_profile: HashMap<u32, u8>,
    valid_thai: HashSet<u32>,
    renderable: HashSet<u32>,
}

impl CharacterProfileTable {
    pub fn new() -> Self {
        let mut to_profile = HashMap::new();
        let mut valid_thai = HashSet::new();

        // ASCII printable range maps identically.
        for cp in 0x20u32..=0x7E {
            to_profile.insert(cp, cp as u8);
        }

        // U+0E01 (KO KAI) .. U+0E3A (PHINTHU) -> 0xA1 .. 0xDA
        for (i, cp) in (0x0E01u32..=0x0E3A).enumerate() {
            to_profile.insert(cp, 0xA1 + i as u8);
            valid_thai.insert(cp);
        }

        // U+0E3F (BAHT) .. U+0E5B (KHOMUT) -> 0xDF .. 0xFB
        for (i, cp) in (0x0E3Fu32..=0x0E5B).enumerate() {
            to_profile.insert(cp, 0xDF + i as u8);
            valid_thai.insert(cp);
        }

        let renderable = to_profile
            .keys()
            .copied()
            .filter(|cp| !NON_RENDERABLE.contains(cp))
            .collect();

        Self {
            to_profile,
            valid_thai,
            renderable,
        }
    }

    /// Profile byte for a codepoint, or `None` when outside the profile.
    pub fn to_profile(&self, c: char) -> Option<u8> {
        self.to_profile.get(&(c as u32)).copied()
    }

    /// True when the codepoint is a Thai-script character of the profile.
    pub fn is_valid_thai(&self, c: char) -> bool {
        self.valid_thai.contains(&(c as u32))
    }

    /// True when the codepoint is drawable on DAB receiver displays.
    pub fn is_renderable(&self, c: char) -> bool {
        self.renderable.contains(&(c as u32))
    }

    /// True for any codepoint in the Unicode Thai block, mapped or not.
    pub fn in_thai_block(c: char) -> bool {
        (THAI_BLOCK_START..=THAI_BLOCK_END).contains(&(c as u32))
    }
}

impl Default for CharacterProfileTable {
    fn default() -> Self {
        Self::new()
    }
}
