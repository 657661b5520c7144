//! ETI / FIG Binary Structure Parsing
//!
//! Slice-based field extraction for ETI(NI) frames and Fast Information
//! Group structures. Parsers never abort analysis: malformed input simply
//! yields `None`, which the validators turn into failed findings.

pub mod eti;
pub mod fig;

pub use eti::{EtiFrameHeader, StreamCharacterization};
pub use fig::{Fig, Fig1Label, FigHeader};
