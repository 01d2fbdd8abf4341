//! RxNorm concept file parser.
//!
//! Parses RXNCONSO.RRF rows.

use csv::StringRecord;
use rxnorm_types::{ConsoRow, TermType};

use crate::parser::{parse, RrfRecord};
use crate::types::{RrfConfig, RrfResult, RrfTable};

/// RXNCONSO column positions.
mod col {
    pub const RXCUI: usize = 0;
    pub const LAT: usize = 1;
    pub const TS: usize = 2;
    pub const SAB: usize = 11;
    pub const TTY: usize = 12;
    pub const CODE: usize = 13;
    pub const STR: usize = 14;
    pub const SUPPRESS: usize = 16;
}

impl RrfRecord for ConsoRow {
    const TABLE: RrfTable = RrfTable::Concepts;
    const MIN_FIELDS: usize = 18;

    fn from_record(record: &StringRecord) -> RrfResult<Self> {
        Ok(ConsoRow {
            rxcui: parse::rxcui(parse::field(record, col::RXCUI))?,
            language: parse::field(record, col::LAT).to_string(),
            term_status: parse::field(record, col::TS).to_string(),
            sab: parse::field(record, col::SAB).to_string(),
            tty: parse::field(record, col::TTY).to_string(),
            code: parse::field(record, col::CODE).to_string(),
            name: parse::field(record, col::STR).to_string(),
            suppress: parse::suppress(parse::field(record, col::SUPPRESS))?,
        })
    }
}

/// Filters for concept rows.
pub trait ConceptFilter {
    /// Returns the term type if this row names a hierarchy concept under
    /// the given config.
    fn hierarchy_term_type(&self, config: &RrfConfig) -> Option<TermType>;

    /// Returns true if this row carries a normalized identifier (UNII).
    fn is_normalized_id(&self, config: &RrfConfig) -> bool;
}

impl ConceptFilter for ConsoRow {
    fn hierarchy_term_type(&self, config: &RrfConfig) -> Option<TermType> {
        if self.sab != config.target_sab {
            return None;
        }
        if !config.accepts_suppress(self.suppress) || !config.accepts_language(&self.language) {
            return None;
        }
        self.term_type().filter(|tty| config.term_types.contains(tty))
    }

    fn is_normalized_id(&self, config: &RrfConfig) -> bool {
        self.sab == config.normalized_id_sab
            && self.term_type() == Some(config.normalized_id_tty)
            && config.accepts_suppress(self.suppress)
            && !self.code.is_empty()
    }
}
